use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::batch::GeometryAccumulator;
use crate::coords::Color;
use crate::shader::{FsSourceLoader, ProgramSet, ProgramSources, ProgramVariant, ReloadReport};
use crate::sync::{SyncStats, draw, sync};

use super::backend::WgpuBackend;
use super::frame::WgpuFrame;

/// Renderer construction parameters.
#[derive(Debug, Clone, Default)]
pub struct RendererConfig {
    /// Stage source paths per variant.
    pub sources: ProgramSources,

    /// Directory relative shader paths are resolved against.
    ///
    /// `None` resolves against the process working directory.
    pub shader_root: Option<PathBuf>,

    /// Optional hard bounds `(max_vertices, max_indices)` for the accumulator.
    ///
    /// `None` lets both buffers grow without limit.
    pub geometry_limits: Option<(usize, usize)>,
}

/// Rendering context handed to every application callback.
///
/// Owns the accumulated geometry, the program set and the GPU backend. There
/// is exactly one per window; nothing here is global.
pub struct Renderer {
    backend: WgpuBackend,
    geometry: GeometryAccumulator,
    programs: ProgramSet<wgpu::RenderPipeline>,
    loader: FsSourceLoader,
    active: ProgramVariant,
}

impl Renderer {
    /// Creates GPU resources and loads every program variant.
    ///
    /// A variant that fails to build here is fatal: there is no previous
    /// program to fall back to.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        config: RendererConfig,
    ) -> Result<Self> {
        let mut backend = WgpuBackend::new(device, queue, surface_format);

        let loader = match config.shader_root {
            Some(root) => FsSourceLoader::with_root(root),
            None => FsSourceLoader::new(),
        };

        let programs = ProgramSet::load(&mut backend, &loader, &config.sources)
            .context("failed to load shader programs")?;

        let geometry = match config.geometry_limits {
            Some((max_vertices, max_indices)) => {
                GeometryAccumulator::with_limits(max_vertices, max_indices)
            }
            None => GeometryAccumulator::new(),
        };

        Ok(Self {
            backend,
            geometry,
            programs,
            loader,
            active: ProgramVariant::Basic,
        })
    }

    pub fn geometry(&self) -> &GeometryAccumulator {
        &self.geometry
    }

    pub fn geometry_mut(&mut self) -> &mut GeometryAccumulator {
        &mut self.geometry
    }

    pub fn programs(&self) -> &ProgramSet<wgpu::RenderPipeline> {
        &self.programs
    }

    /// Variant used by [`render_frame`](Self::render_frame).
    pub fn active(&self) -> ProgramVariant {
        self.active
    }

    pub fn set_active(&mut self, variant: ProgramVariant) {
        if self.active != variant {
            log::info!("drawing with `{variant}` program");
            self.active = variant;
        }
    }

    /// Switches between filled and wireframe drawing.
    pub fn toggle_wireframe(&mut self) {
        let next = match self.active {
            ProgramVariant::Wireframe => ProgramVariant::Basic,
            _ => ProgramVariant::Wireframe,
        };
        self.set_active(next);
    }

    /// Switches between textured and filled drawing.
    pub fn toggle_texture(&mut self) {
        let next = match self.active {
            ProgramVariant::Texture => ProgramVariant::Basic,
            _ => ProgramVariant::Texture,
        };
        self.set_active(next);
    }

    /// Recompiles every variant from disk. Variants that fail keep drawing
    /// with their previous program.
    ///
    /// Must not be called while a frame is being recorded.
    pub fn reload_shaders(&mut self) -> ReloadReport {
        let report = self.programs.reload_all(&mut self.backend, &self.loader);
        if report.is_ok() {
            log::info!("successfully reloaded shaders");
        } else {
            log::warn!(
                "{} of {} shader programs failed to reload",
                report.failed.len(),
                ProgramVariant::ALL.len()
            );
        }
        report
    }

    /// Replaces the texture sampled by the textured variant (RGBA8, sRGB).
    pub fn set_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        self.backend.set_texture(width, height, rgba)
    }

    /// Uploads the accumulated geometry and draws it once with the active
    /// variant, clearing the target to `clear` first.
    pub fn render_frame(
        &mut self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        clear: Color,
    ) -> SyncStats {
        let mut frame = WgpuFrame::new(&mut self.backend, encoder, view, clear);
        let stats = sync(&mut frame, &self.geometry);

        match u32::try_from(self.geometry.index_count()) {
            Ok(count) => draw(&mut frame, self.programs.handle(self.active), count),
            Err(_) => log::error!(
                "{} indices exceed a single draw; frame skipped",
                self.geometry.index_count()
            ),
        }

        frame.finish();
        stats
    }
}

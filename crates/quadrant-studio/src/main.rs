use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use quadrant_engine::coords::{Color, Vec2};
use quadrant_engine::core::{App, AppControl, FrameCtx};
use quadrant_engine::input::Key;
use quadrant_engine::logging::{LoggingConfig, init_logging};
use quadrant_engine::render::{Renderer, RendererConfig};
use quadrant_engine::window::{Runtime, RuntimeConfig};

const CLEAR: Color = Color::rgba(0.2, 0.3, 0.3, 1.0);
const TEXTURE: &str = "resources/textures/checker.png";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "quadrant studio".to_string(),
        renderer: RendererConfig {
            shader_root: Some(resource_root()),
            ..RendererConfig::default()
        },
        ..RuntimeConfig::default()
    };

    Runtime::run(config, Studio)
}

/// Resources ship next to the crate manifest.
fn resource_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

struct Studio;

impl App for Studio {
    fn on_start(&mut self, renderer: &mut Renderer) -> Result<()> {
        let geometry = renderer.geometry_mut();
        geometry.push_quad_by_corners(
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Color::MAGENTA,
        )?;
        geometry.push_quad_by_center(Vec2::zero(), Vec2::splat(0.1), Color::RED)?;

        let path = resource_root().join(TEXTURE);
        let texture = load_rgba(&path)
            .and_then(|(width, height, pixels)| renderer.set_texture(width, height, &pixels));
        if let Err(e) = texture {
            log::error!("{e:#}; textured program samples white");
        }

        log::info!("controls: F5 reload shaders, Z wireframe, T texture, Q quit");
        Ok(())
    }

    fn on_key(&mut self, key: Key, renderer: &mut Renderer) -> AppControl {
        match key {
            Key::Q | Key::Escape => return AppControl::Exit,
            Key::F5 => {
                renderer.reload_shaders();
            }
            Key::Z => renderer.toggle_wireframe(),
            Key::T => renderer.toggle_texture(),
            _ => {}
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        ctx.render(CLEAR)
    }
}

fn load_rgba(path: &Path) -> Result<(u32, u32, Vec<u8>)> {
    let img = image::open(path)
        .with_context(|| format!("failed to load texture {}", path.display()))?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok((width, height, img.into_raw()))
}

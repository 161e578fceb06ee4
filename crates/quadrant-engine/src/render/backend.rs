use anyhow::{Result, bail, ensure};

use crate::batch::{BASE_CAP, Vertex};
use crate::shader::{ShaderBackend, StageKind};

use super::gpu_buffer::GpuBuffer;

/// wgpu implementation of the shader and geometry backends.
///
/// - a stage is a WGSL `ShaderModule`, a program is a `RenderPipeline`
/// - all pipelines share one layout: group 0 = texture (binding 0) + sampler (binding 1)
/// - vertex/index storage grows to the next power of two and never shrinks
///
/// Compile and link diagnostics are captured with validation error scopes so a
/// bad shader surfaces as an `Err` instead of an uncaptured device error.
pub struct WgpuBackend {
    pub(super) device: wgpu::Device,
    pub(super) queue: wgpu::Queue,
    surface_format: wgpu::TextureFormat,

    bind_group_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,
    sampler: wgpu::Sampler,
    pub(super) bind_group: wgpu::BindGroup,

    pub(super) vertices: GpuBuffer,
    pub(super) indices: GpuBuffer,
}

impl WgpuBackend {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quadrant texture bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quadrant pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quadrant sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::MipmapFilterMode::Nearest,
            ..Default::default()
        });

        let white = create_texture(device, queue, 1, 1, &[255, 255, 255, 255]);
        let bind_group = create_bind_group(device, &bind_group_layout, &white, &sampler);

        let vertex_bytes = (BASE_CAP * std::mem::size_of::<Vertex>()) as u64;
        let index_bytes = (BASE_CAP * std::mem::size_of::<u32>()) as u64;

        Self {
            device: device.clone(),
            queue: queue.clone(),
            surface_format,
            bind_group_layout,
            pipeline_layout,
            sampler,
            bind_group,
            vertices: GpuBuffer::new("quadrant vbo", wgpu::BufferUsages::VERTEX, vertex_bytes),
            indices: GpuBuffer::new("quadrant ibo", wgpu::BufferUsages::INDEX, index_bytes),
        }
    }

    /// Replaces the texture sampled by the textured variant.
    ///
    /// `rgba` is tightly packed RGBA8 (sRGB), `width * height * 4` bytes.
    pub fn set_texture(&mut self, width: u32, height: u32, rgba: &[u8]) -> Result<()> {
        let max_dim = self.device.limits().max_texture_dimension_2d;
        check_texture(width, height, rgba.len(), max_dim)?;

        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let texture = create_texture(&self.device, &self.queue, width, height, rgba);
        let bind_group =
            create_bind_group(&self.device, &self.bind_group_layout, &texture, &self.sampler);
        if let Some(err) = pollster::block_on(scope.pop()) {
            bail!("texture ({width}x{height}) rejected by the device: {err}");
        }

        self.bind_group = bind_group;
        log::debug!("texture set ({width}x{height})");
        Ok(())
    }

    pub(super) fn write_vertices(&mut self, bytes: &[u8]) {
        self.vertices.write(&self.device, &self.queue, bytes);
    }

    pub(super) fn write_indices(&mut self, bytes: &[u8]) {
        self.indices.write(&self.device, &self.queue, bytes);
    }
}

impl ShaderBackend for WgpuBackend {
    type Stage = wgpu::ShaderModule;
    type Program = wgpu::RenderPipeline;

    fn compile(
        &mut self,
        source: &str,
        kind: StageKind,
        label: &str,
    ) -> Result<wgpu::ShaderModule, String> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        match pollster::block_on(scope.pop()) {
            Some(err) => Err(err.to_string()),
            None => {
                log::trace!("compiled {kind} stage {label}");
                Ok(module)
            }
        }
    }

    fn link(
        &mut self,
        vertex: &wgpu::ShaderModule,
        fragment: &wgpu::ShaderModule,
        label: &str,
    ) -> Result<wgpu::RenderPipeline, String> {
        let scope = self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = self.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&self.pipeline_layout),

            vertex: wgpu::VertexState {
                module: vertex,
                entry_point: Some(StageKind::Vertex.entry_point()),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: fragment,
                entry_point: Some(StageKind::Fragment.entry_point()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        match pollster::block_on(scope.pop()) {
            Some(err) => Err(err.to_string()),
            None => Ok(pipeline),
        }
    }
}

/// Rejects pixel data the device could not hold as one RGBA8 texture.
fn check_texture(width: u32, height: u32, len: usize, max_dim: u32) -> Result<()> {
    ensure!(width > 0 && height > 0, "texture has zero size");
    ensure!(
        width <= max_dim && height <= max_dim,
        "texture is {width}x{height}, device limit is {max_dim}x{max_dim}"
    );
    ensure!(
        len as u64 == u64::from(width) * u64::from(height) * 4,
        "texture data is {len} bytes, expected {width}x{height}x4"
    );
    Ok(())
}

fn create_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("quadrant texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        rgba,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );

    texture
}

fn create_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &wgpu::Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("quadrant texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

//! wgpu rendering backend and the per-window [`Renderer`] context.
//!
//! [`WgpuBackend`] implements [`crate::shader::ShaderBackend`]; [`WgpuFrame`]
//! implements [`crate::sync::GeometryBackend`] for the duration of one frame.

mod backend;
mod frame;
mod gpu_buffer;
mod renderer;

pub use backend::WgpuBackend;
pub use frame::WgpuFrame;
pub use renderer::{Renderer, RendererConfig};

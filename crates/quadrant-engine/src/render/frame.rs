use crate::coords::Color;
use crate::sync::GeometryBackend;

use super::backend::WgpuBackend;

/// Geometry backend for one frame: uploads go through the queue, each draw
/// records its own render pass into the frame's encoder.
///
/// The first pass clears the target; later passes load. Call
/// [`finish`](Self::finish) so a frame without draws is still cleared.
pub struct WgpuFrame<'a> {
    backend: &'a mut WgpuBackend,
    encoder: &'a mut wgpu::CommandEncoder,
    view: &'a wgpu::TextureView,
    pending_clear: Option<Color>,
}

impl<'a> WgpuFrame<'a> {
    pub fn new(
        backend: &'a mut WgpuBackend,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        clear: Color,
    ) -> Self {
        Self {
            backend,
            encoder,
            view,
            pending_clear: Some(clear),
        }
    }

    /// Clears the target if no draw did.
    pub fn finish(mut self) {
        if self.pending_clear.is_some() {
            let _rpass = self.begin_pass("quadrant clear");
        }
    }

    fn begin_pass(&mut self, label: &str) -> wgpu::RenderPass<'_> {
        let load = next_load_op(&mut self.pending_clear);

        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

impl GeometryBackend for WgpuFrame<'_> {
    type Program = wgpu::RenderPipeline;

    fn upload_vertices(&mut self, bytes: &[u8]) {
        self.backend.write_vertices(bytes);
    }

    fn upload_indices(&mut self, bytes: &[u8]) {
        self.backend.write_indices(bytes);
    }

    fn draw_indexed(&mut self, program: &wgpu::RenderPipeline, index_count: u32) {
        if index_count == 0 {
            return;
        }

        // Clone the cheap handles so the pass can borrow the encoder.
        let (Some(vbo), Some(ibo)) = (
            self.backend.vertices.get().cloned(),
            self.backend.indices.get().cloned(),
        ) else {
            log::warn!("draw of {index_count} indices before any geometry upload; skipped");
            return;
        };
        let bind_group = self.backend.bind_group.clone();

        let mut rpass = self.begin_pass("quadrant draw");
        rpass.set_pipeline(program);
        rpass.set_bind_group(0, &bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint32);
        rpass.draw_indexed(0..index_count, 0, 0..1);
    }
}

/// Clear on the first pass of a frame, load on every later one.
fn next_load_op(pending_clear: &mut Option<Color>) -> wgpu::LoadOp<wgpu::Color> {
    match pending_clear.take() {
        Some(c) => wgpu::LoadOp::Clear(c.to_wgpu()),
        None => wgpu::LoadOp::Load,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_pass_clears_then_later_passes_load() {
        let clear = Color::rgba(0.2, 0.3, 0.3, 1.0);
        let mut pending = Some(clear);

        match next_load_op(&mut pending) {
            wgpu::LoadOp::Clear(c) => assert_eq!(c, clear.to_wgpu()),
            other => panic!("expected clear, got {other:?}"),
        }
        assert!(pending.is_none());
        assert!(matches!(next_load_op(&mut pending), wgpu::LoadOp::Load));
        assert!(matches!(next_load_op(&mut pending), wgpu::LoadOp::Load));
    }
}

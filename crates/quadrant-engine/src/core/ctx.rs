use winit::window::Window;

use crate::coords::Color;
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::Renderer;

use super::app::AppControl;

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: &'a Window,
    pub gpu: &'a mut Gpu<'w>,
    pub renderer: &'a mut Renderer,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Syncs the accumulated geometry, draws it with the active program on a
    /// surface cleared to `clear`, and presents.
    ///
    /// Surface errors skip the frame; only a fatal one returns `Exit`.
    pub fn render(&mut self, clear: Color) -> AppControl {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                log::debug!("surface unavailable: {err}");
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => {
                        log::error!("surface lost irrecoverably");
                        AppControl::Exit
                    }
                    _ => AppControl::Continue,
                };
            }
        };

        let stats = self
            .renderer
            .render_frame(&mut frame.encoder, &frame.view, clear);
        log::trace!(
            "frame synced {} vertex bytes, {} index bytes",
            stats.vertex_bytes,
            stats.index_bytes
        );

        self.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

use crate::input::Key;
use crate::render::Renderer;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
pub trait App {
    /// Called once after the GPU and renderer exist, before the first frame.
    ///
    /// An error here aborts the runtime.
    fn on_start(&mut self, renderer: &mut Renderer) -> anyhow::Result<()> {
        let _ = renderer;
        Ok(())
    }

    /// Called for each fresh key press.
    fn on_key(&mut self, key: Key, renderer: &mut Renderer) -> AppControl {
        let _ = (key, renderer);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

//! Keyboard input.
//!
//! Public API is platform-agnostic and does not expose winit types; the runtime
//! translates key presses into [`Key`] before calling the application.

mod key;
mod platform;

pub use key::Key;
pub(crate) use platform::translate_key_press;

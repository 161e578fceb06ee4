//! Coordinate and color value types used when emitting geometry.
//!
//! Positions are passed through to the vertex stage untouched; the shipped
//! shaders treat them as normalized device coordinates (+Y up).

mod color;
mod vec2;

pub use color::Color;
pub use vec2::Vec2;

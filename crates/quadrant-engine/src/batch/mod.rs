//! CPU-side geometry batching.
//!
//! Application code pushes vertices and quads into a [`GeometryAccumulator`];
//! the used prefix of its buffers is what [`crate::sync`] uploads each frame.

mod accumulator;
mod error;
mod growable;
mod vertex;

pub use accumulator::GeometryAccumulator;
pub use error::{BufferKind, CapacityExceeded};
pub use growable::{BASE_CAP, GrowableBuffer};
pub use vertex::Vertex;

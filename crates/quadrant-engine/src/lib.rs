//! Quadrant engine crate.
//!
//! Batches 2D quads on the CPU, uploads them once per frame and draws them
//! with one of a small set of hot-reloadable shader programs.

pub mod batch;
pub mod coords;
pub mod shader;
pub mod sync;

pub mod device;
pub mod render;
pub mod window;
pub mod input;
pub mod core;

pub mod logging;

#[cfg(test)]
mod testing;

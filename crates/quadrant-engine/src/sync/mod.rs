//! Per-frame upload of accumulated geometry and indexed draws.
//!
//! Ordering within a frame: every push completes, then [`sync`], then one
//! [`draw`] per program variant that should appear.

mod frame;

pub use frame::{GeometryBackend, SyncStats, draw, sync};

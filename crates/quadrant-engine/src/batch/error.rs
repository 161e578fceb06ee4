use std::fmt;

/// Which accumulator buffer refused a push.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferKind {
    Vertex,
    Index,
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferKind::Vertex => f.write_str("vertex"),
            BufferKind::Index => f.write_str("index"),
        }
    }
}

/// A push would have exceeded a bounded buffer.
///
/// Nothing was written; the caller may clear the accumulator, raise the limit,
/// or drop the request.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CapacityExceeded {
    pub buffer: BufferKind,
    /// Elements in use before the push.
    pub used: usize,
    /// Elements the push needed.
    pub requested: usize,
    pub limit: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} buffer capacity exceeded: {} used + {} requested > limit {}",
            self.buffer, self.used, self.requested, self.limit
        )
    }
}

impl std::error::Error for CapacityExceeded {}

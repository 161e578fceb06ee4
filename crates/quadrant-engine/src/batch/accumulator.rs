use crate::coords::{Color, Vec2};

use super::error::{BufferKind, CapacityExceeded};
use super::growable::GrowableBuffer;
use super::vertex::Vertex;

/// Texture corners assigned to quad vertices, in emission order.
const QUAD_UVS: [Vec2; 4] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(1.0, 1.0),
];

/// Two triangles sharing the bottom-right / top-left diagonal.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 2, 3];

/// Largest vertex count addressable by a `u32` index.
const MAX_INDEXABLE_VERTICES: usize = u32::MAX as usize;

/// Immediate-mode geometry sink.
///
/// Owns a vertex and an index buffer. Every index written refers to a vertex
/// already present, and indices are always written in whole triangles.
///
/// Both buffers grow on demand. [`with_limits`](Self::with_limits) installs
/// hard upper bounds; a push that would cross one returns
/// [`CapacityExceeded`] and leaves the accumulator untouched.
#[derive(Debug, Default)]
pub struct GeometryAccumulator {
    vertices: GrowableBuffer<Vertex>,
    indices: GrowableBuffer<u32>,
    max_vertices: Option<usize>,
    max_indices: Option<usize>,
}

impl GeometryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator refusing to hold more than the given element counts.
    pub fn with_limits(max_vertices: usize, max_indices: usize) -> Self {
        Self {
            max_vertices: Some(max_vertices),
            max_indices: Some(max_indices),
            ..Self::default()
        }
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        self.vertices.as_slice()
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        self.indices.as_slice()
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_buffer(&self) -> &GrowableBuffer<Vertex> {
        &self.vertices
    }

    pub fn index_buffer(&self) -> &GrowableBuffer<u32> {
        &self.indices
    }

    /// Drops all geometry, keeping allocations for the next frame.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends one vertex and returns its slot.
    pub fn push_vertex(&mut self, v: Vertex) -> Result<u32, CapacityExceeded> {
        self.check_room(1, 0)?;
        Ok(self.emit_vertex(v))
    }

    /// Emits an axis-aligned quad spanning `p1` and the opposite corner `p2`.
    ///
    /// Vertex order is `p1`, `(p2.x, p1.y)`, `(p1.x, p2.y)`, `p2` with uvs
    /// `(0,0) (1,0) (0,1) (1,1)`; indices are `base + [0,1,2, 1,2,3]`.
    pub fn push_quad_by_corners(
        &mut self,
        p1: Vec2,
        p2: Vec2,
        color: Color,
    ) -> Result<(), CapacityExceeded> {
        self.check_room(4, 6)?;

        let corners = [
            p1,                    // bottom left
            Vec2::new(p2.x, p1.y), // bottom right
            Vec2::new(p1.x, p2.y), // top left
            p2,                    // top right
        ];

        let base = self.vertices.len() as u32;
        for (pos, uv) in corners.into_iter().zip(QUAD_UVS) {
            self.emit_vertex(Vertex::new(pos, uv, color));
        }
        self.indices.append_many(&QUAD_INDICES.map(|i| base + i));
        Ok(())
    }

    /// Emits the quad `[center - radius, center + radius]`.
    pub fn push_quad_by_center(
        &mut self,
        center: Vec2,
        radius: Vec2,
        color: Color,
    ) -> Result<(), CapacityExceeded> {
        self.push_quad_by_corners(center - radius, center + radius, color)
    }

    fn emit_vertex(&mut self, v: Vertex) -> u32 {
        let slot = self.vertices.len() as u32;
        self.vertices.append(v);
        slot
    }

    fn check_room(&self, vertices: usize, indices: usize) -> Result<(), CapacityExceeded> {
        let vertex_limit = self
            .max_vertices
            .map_or(MAX_INDEXABLE_VERTICES, |m| m.min(MAX_INDEXABLE_VERTICES));
        check(BufferKind::Vertex, self.vertices.len(), vertices, Some(vertex_limit))?;
        check(BufferKind::Index, self.indices.len(), indices, self.max_indices)
    }
}

fn check(
    buffer: BufferKind,
    used: usize,
    requested: usize,
    limit: Option<usize>,
) -> Result<(), CapacityExceeded> {
    match limit {
        Some(limit) if used + requested > limit => Err(CapacityExceeded {
            buffer,
            used,
            requested,
            limit,
        }),
        _ => Ok(()),
    }
}

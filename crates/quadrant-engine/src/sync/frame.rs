use crate::batch::GeometryAccumulator;

/// Backend-resident geometry storage plus the indexed draw.
pub trait GeometryBackend {
    /// Program handle bound for a draw.
    type Program;

    /// Replaces the start of the vertex storage with `bytes`.
    fn upload_vertices(&mut self, bytes: &[u8]);

    /// Replaces the start of the index storage with `bytes` (`u32` indices).
    fn upload_indices(&mut self, bytes: &[u8]);

    /// Binds `program` and draws `index_count` indices as a triangle list.
    fn draw_indexed(&mut self, program: &Self::Program, index_count: u32);
}

/// Bytes sent by one [`sync`].
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct SyncStats {
    pub vertex_bytes: usize,
    pub index_bytes: usize,
}

/// Uploads the used prefix of both accumulator buffers.
///
/// Only `count` elements are sent, never the allocated capacity.
pub fn sync<B>(backend: &mut B, geometry: &GeometryAccumulator) -> SyncStats
where
    B: GeometryBackend + ?Sized,
{
    let vertices: &[u8] = bytemuck::cast_slice(geometry.vertices());
    let indices: &[u8] = bytemuck::cast_slice(geometry.indices());

    backend.upload_vertices(vertices);
    backend.upload_indices(indices);

    SyncStats {
        vertex_bytes: vertices.len(),
        index_bytes: indices.len(),
    }
}

/// Issues one indexed triangle-list draw with `program`.
///
/// `index_count` must be a multiple of 3 and must not exceed the indices
/// uploaded by the preceding [`sync`].
pub fn draw<B>(backend: &mut B, program: &B::Program, index_count: u32)
where
    B: GeometryBackend + ?Sized,
{
    debug_assert!(
        index_count % 3 == 0,
        "draw: index_count {index_count} is not a whole number of triangles"
    );
    backend.draw_indexed(program, index_count);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::{BASE_CAP, Vertex};
    use crate::coords::{Color, Vec2};
    use crate::testing::RecordingBackend;

    #[test]
    fn sync_uploads_only_used_prefix() {
        let mut geometry = GeometryAccumulator::new();
        geometry
            .push_quad_by_corners(Vec2::zero(), Vec2::splat(1.0), Color::WHITE)
            .unwrap();
        assert!(geometry.vertex_buffer().capacity() >= BASE_CAP);

        let mut backend = RecordingBackend::default();
        let stats = sync(&mut backend, &geometry);

        assert_eq!(stats.vertex_bytes, 4 * std::mem::size_of::<Vertex>());
        assert_eq!(stats.index_bytes, 6 * 4);
        assert_eq!(backend.vertex_uploads(), &[128]);
        assert_eq!(backend.index_uploads(), &[24]);
    }

    #[test]
    fn sync_upload_matches_vertex_bytes() {
        let mut geometry = GeometryAccumulator::new();
        geometry
            .push_quad_by_center(Vec2::splat(0.5), Vec2::splat(0.5), Color::RED)
            .unwrap();

        let mut backend = RecordingBackend::default();
        sync(&mut backend, &geometry);

        let expected: &[u8] = bytemuck::cast_slice(geometry.vertices());
        assert_eq!(backend.last_vertex_bytes(), expected);
        let expected: &[u8] = bytemuck::cast_slice(&[0u32, 1, 2, 1, 2, 3]);
        assert_eq!(backend.last_index_bytes(), expected);
    }

    #[test]
    fn sync_of_empty_accumulator_sends_nothing() {
        let geometry = GeometryAccumulator::new();
        let mut backend = RecordingBackend::default();
        let stats = sync(&mut backend, &geometry);
        assert_eq!(stats, SyncStats::default());
    }

    #[test]
    fn sync_after_clear_shrinks_upload_but_not_capacity() {
        let mut geometry = GeometryAccumulator::new();
        for i in 0..100 {
            geometry
                .push_quad_by_center(Vec2::splat(i as f32), Vec2::splat(0.1), Color::WHITE)
                .unwrap();
        }
        geometry.clear();
        geometry
            .push_quad_by_center(Vec2::zero(), Vec2::splat(0.1), Color::WHITE)
            .unwrap();

        let mut backend = RecordingBackend::default();
        let stats = sync(&mut backend, &geometry);
        assert_eq!(stats.vertex_bytes, 4 * 32);
        assert_eq!(geometry.vertex_buffer().capacity(), 512);
    }

    #[test]
    fn draw_binds_program_with_index_count() {
        let mut backend = RecordingBackend::default();
        let program = backend.live_program();
        draw(&mut backend, &program, 12);
        assert_eq!(backend.draws(), &[(program, 12)]);
    }
}

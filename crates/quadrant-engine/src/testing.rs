//! Recording backend shared by unit tests.

use std::collections::HashSet;

use crate::shader::{ShaderBackend, StageKind};
use crate::sync::GeometryBackend;

/// Compiles cleanly.
pub(crate) const GOOD_VERTEX: &str = "@vertex fn vs_main() {}";
/// Compiles cleanly.
pub(crate) const GOOD_FRAGMENT: &str = "@fragment fn fs_main() {}";
/// Rejected by `compile`.
pub(crate) const BAD_COMPILE: &str = "@fragment fn fs_main( #error";
/// Compiles but is rejected by `link`.
pub(crate) const BAD_LINK: &str = "@fragment fn fs_main() {} // #nolink";

#[derive(Debug)]
pub(crate) struct RecordingStage {
    id: u32,
    kind: StageKind,
    source: String,
}

/// Hands out integer handles and records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    next_id: u32,
    compiled: Vec<StageKind>,
    live_stages: HashSet<u32>,
    released_stages: usize,
    live_programs: HashSet<u32>,
    vertex_uploads: Vec<usize>,
    index_uploads: Vec<usize>,
    last_vertex_bytes: Vec<u8>,
    last_index_bytes: Vec<u8>,
    draws: Vec<(u32, u32)>,
}

impl RecordingBackend {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    /// A program handle that did not go through compile/link.
    pub(crate) fn live_program(&mut self) -> u32 {
        let id = self.next();
        self.live_programs.insert(id);
        id
    }

    pub(crate) fn is_live(&self, program: u32) -> bool {
        self.live_programs.contains(&program)
    }

    pub(crate) fn live_program_count(&self) -> usize {
        self.live_programs.len()
    }

    pub(crate) fn live_stage_count(&self) -> usize {
        self.live_stages.len()
    }

    pub(crate) fn released_stage_count(&self) -> usize {
        self.released_stages
    }

    pub(crate) fn compiled_kinds(&self) -> Vec<StageKind> {
        self.compiled.clone()
    }

    pub(crate) fn vertex_uploads(&self) -> &[usize] {
        &self.vertex_uploads
    }

    pub(crate) fn index_uploads(&self) -> &[usize] {
        &self.index_uploads
    }

    pub(crate) fn last_vertex_bytes(&self) -> &[u8] {
        &self.last_vertex_bytes
    }

    pub(crate) fn last_index_bytes(&self) -> &[u8] {
        &self.last_index_bytes
    }

    pub(crate) fn draws(&self) -> &[(u32, u32)] {
        &self.draws
    }
}

impl ShaderBackend for RecordingBackend {
    type Stage = RecordingStage;
    type Program = u32;

    fn compile(
        &mut self,
        source: &str,
        kind: StageKind,
        label: &str,
    ) -> Result<RecordingStage, String> {
        self.compiled.push(kind);
        if source.contains("#error") {
            return Err(format!("{label}:1:1: syntax error: unexpected `#`"));
        }
        let id = self.next();
        self.live_stages.insert(id);
        Ok(RecordingStage {
            id,
            kind,
            source: source.to_string(),
        })
    }

    fn link(
        &mut self,
        vertex: &RecordingStage,
        fragment: &RecordingStage,
        label: &str,
    ) -> Result<u32, String> {
        assert_eq!(vertex.kind, StageKind::Vertex);
        assert_eq!(fragment.kind, StageKind::Fragment);
        assert!(self.live_stages.contains(&vertex.id) && self.live_stages.contains(&fragment.id));
        if vertex.source.contains("#nolink") || fragment.source.contains("#nolink") {
            return Err(format!("{label}: interface mismatch"));
        }
        Ok(self.live_program())
    }

    fn release_stage(&mut self, stage: RecordingStage) {
        assert!(self.live_stages.remove(&stage.id), "stage {} released twice", stage.id);
        self.released_stages += 1;
    }

    fn release_program(&mut self, program: u32) {
        assert!(self.live_programs.remove(&program), "program {program} released twice");
    }
}

impl GeometryBackend for RecordingBackend {
    type Program = u32;

    fn upload_vertices(&mut self, bytes: &[u8]) {
        self.vertex_uploads.push(bytes.len());
        self.last_vertex_bytes = bytes.to_vec();
    }

    fn upload_indices(&mut self, bytes: &[u8]) {
        self.index_uploads.push(bytes.len());
        self.last_index_bytes = bytes.to_vec();
    }

    fn draw_indexed(&mut self, program: &u32, index_count: u32) {
        assert!(self.is_live(*program), "draw with released program {program}");
        self.draws.push((*program, index_count));
    }
}

use std::fmt;
use std::path::PathBuf;

use super::backend::ShaderBackend;
use super::error::ShaderError;
use super::program::{ShaderProgram, load_program};
use super::source::SourceLoader;

/// Named program variants. The set is closed; every variant is always loaded.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ProgramVariant {
    /// Flat vertex-color fill.
    Basic,
    /// Quad edges highlighted from interpolated uvs.
    Wireframe,
    /// Bound texture modulated by vertex color.
    Texture,
}

impl ProgramVariant {
    pub const ALL: [ProgramVariant; 3] = [
        ProgramVariant::Basic,
        ProgramVariant::Wireframe,
        ProgramVariant::Texture,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            ProgramVariant::Basic => "basic",
            ProgramVariant::Wireframe => "wireframe",
            ProgramVariant::Texture => "texture",
        }
    }

    #[inline]
    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ProgramVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Vertex + fragment source paths for one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

/// Where each variant's stage sources live.
///
/// Defaults share one vertex stage across all fragment stages under
/// `resources/shaders/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSources {
    paths: [StagePaths; 3],
}

impl Default for ProgramSources {
    fn default() -> Self {
        Self::shared_vertex(
            "resources/shaders/screen.vert.wgsl",
            "resources/shaders/basic.frag.wgsl",
            "resources/shaders/wireframe.frag.wgsl",
            "resources/shaders/texture.frag.wgsl",
        )
    }
}

impl ProgramSources {
    /// One vertex stage reused by the basic, wireframe and texture fragments.
    pub fn shared_vertex(
        vertex: impl Into<PathBuf>,
        basic: impl Into<PathBuf>,
        wireframe: impl Into<PathBuf>,
        texture: impl Into<PathBuf>,
    ) -> Self {
        let vertex = vertex.into();
        let pair = |fragment: PathBuf| StagePaths {
            vertex: vertex.clone(),
            fragment,
        };
        Self {
            paths: [pair(basic.into()), pair(wireframe.into()), pair(texture.into())],
        }
    }

    /// Overrides the stage paths of a single variant.
    pub fn with_variant(
        mut self,
        variant: ProgramVariant,
        vertex: impl Into<PathBuf>,
        fragment: impl Into<PathBuf>,
    ) -> Self {
        self.paths[variant.index()] = StagePaths {
            vertex: vertex.into(),
            fragment: fragment.into(),
        };
        self
    }

    pub fn paths(&self, variant: ProgramVariant) -> &StagePaths {
        &self.paths[variant.index()]
    }
}

/// Health of a variant after the most recent load or reload.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ProgramStatus {
    /// Handle was built from the current sources.
    Linked,
    /// Last reload failed; the previous handle is still in use.
    Stale,
}

/// Outcome of [`ProgramSet::reload_all`].
#[derive(Debug, Default)]
pub struct ReloadReport {
    pub reloaded: Vec<ProgramVariant>,
    pub failed: Vec<(ProgramVariant, ShaderError)>,
}

impl ReloadReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

#[derive(Debug)]
struct Entry<P> {
    program: ShaderProgram<P>,
    status: ProgramStatus,
}

/// One linked program per [`ProgramVariant`].
///
/// Owns every handle. Handles are only released through
/// [`reload_all`](Self::reload_all) (after a replacement linked) or
/// [`release_all`](Self::release_all).
#[derive(Debug)]
pub struct ProgramSet<P> {
    entries: Vec<Entry<P>>,
}

impl<P> ProgramSet<P> {
    /// Loads every variant. Fails on the first variant that does not build,
    /// releasing any programs already linked.
    pub fn load<B, L>(
        backend: &mut B,
        loader: &L,
        sources: &ProgramSources,
    ) -> Result<Self, ShaderError>
    where
        B: ShaderBackend<Program = P>,
        L: SourceLoader + ?Sized,
    {
        let mut entries = Vec::with_capacity(ProgramVariant::ALL.len());
        for variant in ProgramVariant::ALL {
            let StagePaths { vertex, fragment } = sources.paths(variant);
            match load_program(backend, loader, vertex, fragment) {
                Ok(program) => entries.push(Entry {
                    program,
                    status: ProgramStatus::Linked,
                }),
                Err(e) => {
                    log::error!("failed to load `{variant}` program: {e}");
                    for entry in entries {
                        backend.release_program(entry.program.into_handle());
                    }
                    return Err(e);
                }
            }
        }

        log::info!("loaded {} shader programs", entries.len());
        Ok(Self { entries })
    }

    pub fn get(&self, variant: ProgramVariant) -> &ShaderProgram<P> {
        &self.entries[variant.index()].program
    }

    #[inline]
    pub fn handle(&self, variant: ProgramVariant) -> &P {
        self.get(variant).handle()
    }

    pub fn status(&self, variant: ProgramVariant) -> ProgramStatus {
        self.entries[variant.index()].status
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProgramVariant, &ShaderProgram<P>)> {
        ProgramVariant::ALL
            .into_iter()
            .zip(self.entries.iter().map(|e| &e.program))
    }

    /// Rebuilds every variant from the paths it was loaded from.
    ///
    /// Variants are independent: one that fails keeps its previous handle and
    /// is marked [`ProgramStatus::Stale`]; the rest are swapped to their new
    /// handles and the old ones released.
    pub fn reload_all<B, L>(&mut self, backend: &mut B, loader: &L) -> ReloadReport
    where
        B: ShaderBackend<Program = P>,
        L: SourceLoader + ?Sized,
    {
        let mut report = ReloadReport::default();

        for (variant, entry) in ProgramVariant::ALL.into_iter().zip(self.entries.iter_mut()) {
            let (vertex, fragment) = (
                entry.program.vertex_path().to_path_buf(),
                entry.program.fragment_path().to_path_buf(),
            );

            match load_program(backend, loader, &vertex, &fragment) {
                Ok(fresh) => {
                    let generation = entry.program.generation() + 1;
                    let old =
                        std::mem::replace(&mut entry.program, fresh.with_generation(generation));
                    backend.release_program(old.into_handle());
                    entry.status = ProgramStatus::Linked;
                    report.reloaded.push(variant);
                }
                Err(e) => {
                    log::error!("reload of `{variant}` failed, keeping previous program: {e}");
                    entry.status = ProgramStatus::Stale;
                    report.failed.push((variant, e));
                }
            }
        }

        if report.is_ok() {
            log::debug!("reloaded {} shader programs", report.reloaded.len());
        }
        report
    }

    /// Releases every handle through the backend.
    pub fn release_all<B>(self, backend: &mut B)
    where
        B: ShaderBackend<Program = P>,
    {
        for entry in self.entries {
            backend.release_program(entry.program.into_handle());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shader::MemorySources;
    use crate::testing::{BAD_COMPILE, GOOD_FRAGMENT, GOOD_VERTEX, RecordingBackend};
    use std::path::Path;

    fn sources() -> ProgramSources {
        ProgramSources::shared_vertex("v", "basic", "wire", "tex")
    }

    fn files() -> MemorySources {
        MemorySources::new()
            .with("v", GOOD_VERTEX)
            .with("basic", GOOD_FRAGMENT)
            .with("wire", GOOD_FRAGMENT)
            .with("tex", GOOD_FRAGMENT)
    }

    // ── load ──────────────────────────────────────────────────────────────

    #[test]
    fn load_builds_every_variant() {
        let mut backend = RecordingBackend::default();
        let set = ProgramSet::load(&mut backend, &files(), &sources()).unwrap();

        for variant in ProgramVariant::ALL {
            assert!(backend.is_live(*set.handle(variant)));
            assert_eq!(set.status(variant), ProgramStatus::Linked);
        }
        assert_eq!(backend.live_program_count(), 3);
        let texture = set.get(ProgramVariant::Texture);
        assert_eq!(texture.vertex_path(), Path::new("v"));
        assert_eq!(texture.fragment_path(), Path::new("tex"));
    }

    #[test]
    fn load_failure_releases_already_linked_variants() {
        let mut backend = RecordingBackend::default();
        let mut f = files();
        f.insert("tex", BAD_COMPILE);

        let err = ProgramSet::load(&mut backend, &f, &sources()).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
        assert_eq!(backend.live_program_count(), 0);
    }

    #[test]
    fn per_variant_override_is_used() {
        let mut backend = RecordingBackend::default();
        let f = files().with("other.vert", GOOD_VERTEX);
        let src = sources().with_variant(ProgramVariant::Wireframe, "other.vert", "wire");

        let set = ProgramSet::load(&mut backend, &f, &src).unwrap();
        assert_eq!(
            set.get(ProgramVariant::Wireframe).vertex_path(),
            Path::new("other.vert")
        );
    }

    // ── reload_all ────────────────────────────────────────────────────────

    #[test]
    fn reload_replaces_all_handles_when_sources_are_valid() {
        let mut backend = RecordingBackend::default();
        let f = files();
        let mut set = ProgramSet::load(&mut backend, &f, &sources()).unwrap();
        let before: Vec<u32> = ProgramVariant::ALL.iter().map(|v| *set.handle(*v)).collect();

        let report = set.reload_all(&mut backend, &f);

        assert!(report.is_ok());
        assert_eq!(report.reloaded, ProgramVariant::ALL.to_vec());
        for (variant, old) in ProgramVariant::ALL.into_iter().zip(before) {
            assert_ne!(*set.handle(variant), old);
            assert!(!backend.is_live(old));
            assert_eq!(set.get(variant).generation(), 1);
        }
        assert_eq!(backend.live_program_count(), 3);
    }

    #[test]
    fn failed_variant_keeps_previous_handle_while_others_update() {
        let mut backend = RecordingBackend::default();
        let mut f = files();
        let mut set = ProgramSet::load(&mut backend, &f, &sources()).unwrap();
        let old_basic = *set.handle(ProgramVariant::Basic);
        let old_wire = *set.handle(ProgramVariant::Wireframe);
        let old_tex = *set.handle(ProgramVariant::Texture);

        f.insert("wire", BAD_COMPILE);
        let report = set.reload_all(&mut backend, &f);

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, ProgramVariant::Wireframe);
        assert!(matches!(report.failed[0].1, ShaderError::Compile { .. }));
        assert_eq!(report.reloaded, vec![ProgramVariant::Basic, ProgramVariant::Texture]);

        // Failing variant: same handle, still live, still drawable.
        assert_eq!(*set.handle(ProgramVariant::Wireframe), old_wire);
        assert!(backend.is_live(old_wire));
        assert_eq!(set.status(ProgramVariant::Wireframe), ProgramStatus::Stale);
        assert_eq!(set.get(ProgramVariant::Wireframe).generation(), 0);
        crate::sync::draw(&mut backend, set.handle(ProgramVariant::Wireframe), 6);
        assert_eq!(backend.draws(), &[(old_wire, 6)]);

        // Others swapped to new handles.
        assert_ne!(*set.handle(ProgramVariant::Basic), old_basic);
        assert_ne!(*set.handle(ProgramVariant::Texture), old_tex);
        assert!(!backend.is_live(old_basic));
        assert!(!backend.is_live(old_tex));
        assert_eq!(backend.live_program_count(), 3);
        assert_eq!(backend.live_stage_count(), 0);
    }

    #[test]
    fn stale_variant_recovers_on_next_good_reload() {
        let mut backend = RecordingBackend::default();
        let mut f = files();
        let mut set = ProgramSet::load(&mut backend, &f, &sources()).unwrap();

        f.remove("tex");
        let report = set.reload_all(&mut backend, &f);
        assert!(matches!(report.failed[0].1, ShaderError::FileRead { .. }));
        assert_eq!(set.status(ProgramVariant::Texture), ProgramStatus::Stale);

        f.insert("tex", GOOD_FRAGMENT);
        let report = set.reload_all(&mut backend, &f);
        assert!(report.is_ok());
        assert_eq!(set.status(ProgramVariant::Texture), ProgramStatus::Linked);
        assert_eq!(set.get(ProgramVariant::Texture).generation(), 1);
    }

    #[test]
    fn release_all_frees_every_handle() {
        let mut backend = RecordingBackend::default();
        let set = ProgramSet::load(&mut backend, &files(), &sources()).unwrap();
        set.release_all(&mut backend);
        assert_eq!(backend.live_program_count(), 0);
    }

    #[test]
    fn reload_failure_message_names_file_and_diagnostics() {
        let mut backend = RecordingBackend::default();
        let mut f = files();
        let mut set = ProgramSet::load(&mut backend, &f, &sources()).unwrap();

        f.insert("tex", BAD_COMPILE);
        let report = set.reload_all(&mut backend, &f);

        let (variant, err) = &report.failed[0];
        assert_eq!(*variant, ProgramVariant::Texture);
        let msg = err.to_string();
        assert!(msg.contains("`tex`"), "{msg}");
        assert!(msg.contains("syntax error"), "{msg}");
    }
}

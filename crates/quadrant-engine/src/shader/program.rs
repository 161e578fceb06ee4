use std::path::{Path, PathBuf};

use super::backend::ShaderBackend;
use super::error::ShaderError;
use super::source::SourceLoader;
use super::stage::StageKind;

/// A linked program and the stage sources it was built from.
///
/// Never mutated in place: a reload builds a new `ShaderProgram` and the old
/// one is released.
#[derive(Debug)]
pub struct ShaderProgram<P> {
    handle: P,
    vertex_path: PathBuf,
    fragment_path: PathBuf,
    generation: u32,
}

impl<P> ShaderProgram<P> {
    #[inline]
    pub fn handle(&self) -> &P {
        &self.handle
    }

    pub fn vertex_path(&self) -> &Path {
        &self.vertex_path
    }

    pub fn fragment_path(&self) -> &Path {
        &self.fragment_path
    }

    /// Number of successful reloads since the program was first loaded.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub(crate) fn into_handle(self) -> P {
        self.handle
    }

    pub(crate) fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }
}

/// Reads, compiles and links a vertex + fragment pair.
///
/// Stage objects are released whether or not linking succeeds. The first
/// failure is returned with the offending path and the backend log.
pub fn load_program<B, L>(
    backend: &mut B,
    loader: &L,
    vertex_path: &Path,
    fragment_path: &Path,
) -> Result<ShaderProgram<B::Program>, ShaderError>
where
    B: ShaderBackend,
    L: SourceLoader + ?Sized,
{
    let vertex = compile_file(backend, loader, vertex_path, StageKind::Vertex)?;
    let fragment = match compile_file(backend, loader, fragment_path, StageKind::Fragment) {
        Ok(stage) => stage,
        Err(e) => {
            backend.release_stage(vertex);
            return Err(e);
        }
    };

    let label = format!("{} + {}", vertex_path.display(), fragment_path.display());
    let linked = backend.link(&vertex, &fragment, &label);

    backend.release_stage(vertex);
    backend.release_stage(fragment);

    match linked {
        Ok(handle) => {
            log::debug!("linked shader program {label}");
            Ok(ShaderProgram {
                handle,
                vertex_path: vertex_path.to_path_buf(),
                fragment_path: fragment_path.to_path_buf(),
                generation: 0,
            })
        }
        Err(diagnostics) => {
            log::debug!("link failed for {label}");
            Err(ShaderError::Link {
                vertex_path: vertex_path.to_path_buf(),
                fragment_path: fragment_path.to_path_buf(),
                log: diagnostics,
            })
        }
    }
}

fn compile_file<B, L>(
    backend: &mut B,
    loader: &L,
    path: &Path,
    kind: StageKind,
) -> Result<B::Stage, ShaderError>
where
    B: ShaderBackend,
    L: SourceLoader + ?Sized,
{
    let source = loader.read(path).map_err(|source| {
        log::debug!("read failed for `{}`", path.display());
        ShaderError::FileRead {
            path: path.to_path_buf(),
            source,
        }
    })?;

    backend
        .compile(&source, kind, &path.display().to_string())
        .map_err(|diagnostics| {
            log::debug!("{kind} compile failed for `{}`", path.display());
            ShaderError::Compile {
                path: path.to_path_buf(),
                stage: kind,
                log: diagnostics,
            }
        })
}

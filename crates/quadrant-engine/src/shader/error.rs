use std::fmt;
use std::io;
use std::path::PathBuf;

use super::stage::StageKind;

/// Failure while building a shader program.
#[derive(Debug)]
pub enum ShaderError {
    /// A stage source could not be read.
    FileRead { path: PathBuf, source: io::Error },
    /// The backend rejected a stage; `log` is its diagnostic output.
    Compile {
        path: PathBuf,
        stage: StageKind,
        log: String,
    },
    /// Both stages compiled but could not be combined.
    Link {
        vertex_path: PathBuf,
        fragment_path: PathBuf,
        log: String,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::FileRead { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
            ShaderError::Compile { path, stage, log } => {
                write!(
                    f,
                    "failed to compile {stage} shader `{}`:\n{log}",
                    path.display()
                )
            }
            ShaderError::Link {
                vertex_path,
                fragment_path,
                log,
            } => write!(
                f,
                "failed to link `{}` + `{}`:\n{log}",
                vertex_path.display(),
                fragment_path.display()
            ),
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::FileRead { source, .. } => Some(source),
            _ => None,
        }
    }
}

//! Shader program lifecycle: compile, link and hot-reload.
//!
//! The manager is generic over a [`ShaderBackend`] (compile/link/release) and a
//! [`SourceLoader`] (file reads). Programs are grouped in a [`ProgramSet`], one
//! per [`ProgramVariant`]; reloading isolates failures per variant.

mod backend;
mod error;
mod program;
mod set;
mod source;
mod stage;

pub use backend::ShaderBackend;
pub use error::ShaderError;
pub use program::{ShaderProgram, load_program};
pub use set::{ProgramSet, ProgramSources, ProgramStatus, ProgramVariant, ReloadReport, StagePaths};
pub use source::{FsSourceLoader, MemorySources, SourceLoader};
pub use stage::StageKind;

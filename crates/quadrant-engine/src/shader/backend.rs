use super::stage::StageKind;

/// Backend operations the program manager needs: compile a stage, link two
/// stages into a program, and release either.
///
/// Errors are the backend's diagnostic text.
pub trait ShaderBackend {
    /// A compiled, not yet linked stage.
    type Stage;
    /// A linked program ready to be bound for drawing.
    type Program;

    fn compile(
        &mut self,
        source: &str,
        kind: StageKind,
        label: &str,
    ) -> Result<Self::Stage, String>;

    fn link(
        &mut self,
        vertex: &Self::Stage,
        fragment: &Self::Stage,
        label: &str,
    ) -> Result<Self::Program, String>;

    fn release_stage(&mut self, stage: Self::Stage) {
        drop(stage);
    }

    fn release_program(&mut self, program: Self::Program) {
        drop(program);
    }
}

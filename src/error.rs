use crate::render::debug::GlError;
use crate::render::shaders::{CompileError, ShaderError};

/// Coarse failure classes, each with its own process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Other,
    Source,
    Compile,
    Link,
    Assertion,
}

impl FailureKind {
    /// Classifies an error by the first shader or GL error in its chain.
    pub fn of(err: &anyhow::Error) -> Self {
        err.chain()
            .find_map(|cause| {
                if let Some(shader) = cause.downcast_ref::<ShaderError>() {
                    Some(Self::from_shader_error(shader))
                } else if cause.is::<CompileError>() {
                    Some(FailureKind::Compile)
                } else if cause.is::<GlError>() {
                    Some(FailureKind::Assertion)
                } else {
                    None
                }
            })
            .unwrap_or(FailureKind::Other)
    }

    pub fn from_shader_error(err: &ShaderError) -> Self {
        match err {
            ShaderError::Io { .. } | ShaderError::UnknownSection { .. } => FailureKind::Source,
            ShaderError::Compilation(_) | ShaderError::Nul(_) => FailureKind::Compile,
            ShaderError::Linking(_) | ShaderError::Validation(_) | ShaderError::ObjectCreation(_) => {
                FailureKind::Link
            }
            ShaderError::UniformNotFound(_) => FailureKind::Assertion,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            FailureKind::Other => 1,
            FailureKind::Source => 2,
            FailureKind::Compile => 3,
            FailureKind::Link => 4,
            FailureKind::Assertion => 5,
        }
    }
}

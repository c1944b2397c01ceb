pub mod backend;
pub mod debug;
#[cfg(test)]
pub(crate) mod fake;
pub mod mesh;
pub mod program;
pub mod pulse;
pub mod renderer;
pub mod shaders;

pub use backend::{Gl, ShaderBackend};
pub use debug::GlError;
pub use mesh::QuadMesh;
pub use program::{ProgramBinding, Shader, ShaderProgram, UniformLocation};
pub use pulse::ColorPulse;
pub use renderer::Renderer;
pub use shaders::{CompileError, MarkerSyntax, ShaderError, ShaderKind, ShaderProgramSource};

pub mod app;
pub mod config;
pub mod error;
pub mod render;

// Re-export commonly used types
pub use config::AppConfig;
pub use error::FailureKind;
pub use render::program::ShaderProgram;
pub use render::shaders::{MarkerSyntax, ShaderError, ShaderProgramSource};

// program.rs - Shader stage compilation and program linking

use super::backend::ShaderBackend;
use super::shaders::{CompileError, ShaderError, ShaderKind, ShaderProgramSource};
use gl::types::*;
use glam::Vec4;
use std::collections::HashMap;
use std::ffi::CString;

/// One compiled stage. The GL object is deleted on drop.
#[derive(Debug)]
pub struct Shader<B: ShaderBackend> {
    backend: B,
    id: GLuint,
    kind: ShaderKind,
}

impl<B: ShaderBackend> Shader<B> {
    /// Compiles `source` as a `kind` stage.
    ///
    /// On failure the driver log is reported through `log::error!` and the
    /// partially created object is released before the error is returned.
    pub fn compile(backend: &B, kind: ShaderKind, source: &str) -> Result<Self, CompileError> {
        let source = CString::new(source).map_err(|err| CompileError {
            kind,
            log: format!("source contains a NUL byte at offset {}", err.nul_position()),
        })?;

        let id = backend.create_shader(kind);
        if id == 0 {
            return Err(CompileError {
                kind,
                log: "driver returned no shader object".to_string(),
            });
        }
        let shader = Shader {
            backend: backend.clone(),
            id,
            kind,
        };

        backend.compile_shader(id, &source);
        if !backend.compile_status(id) {
            let mut log = backend.shader_info_log(id);
            if log.trim().is_empty() {
                log = "driver reported no diagnostics".to_string();
            }
            log::error!("Failed to compile {} shader!\n{}", kind, log.trim_end());
            return Err(CompileError { kind, log });
        }

        Ok(shader)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn kind(&self) -> ShaderKind {
        self.kind
    }
}

impl<B: ShaderBackend> Drop for Shader<B> {
    fn drop(&mut self) {
        self.backend.delete_shader(self.id);
    }
}

/// Location of an active uniform in a specific program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UniformLocation {
    program: GLuint,
    location: GLint,
}

impl UniformLocation {
    pub fn location(&self) -> GLint {
        self.location
    }
}

/// A linked and validated program. Deleted on drop.
#[derive(Debug)]
pub struct ShaderProgram<B: ShaderBackend> {
    backend: B,
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl<B: ShaderBackend> ShaderProgram<B> {
    pub fn from_source(backend: &B, source: &ShaderProgramSource) -> Result<Self, ShaderError> {
        Self::new_from_source(backend, &source.vertex, &source.fragment)
    }

    /// Builds a program from vertex and fragment source text.
    ///
    /// Both stages are always attempted so that every compile log is
    /// reported. The stage objects are released before returning, whether
    /// or not linking succeeded.
    pub fn new_from_source(
        backend: &B,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<Self, ShaderError> {
        let id = backend.create_program();
        if id == 0 {
            return Err(ShaderError::ObjectCreation("program"));
        }
        let program = ShaderProgram {
            backend: backend.clone(),
            id,
            uniforms: HashMap::new(),
        };

        let vertex = Shader::compile(backend, ShaderKind::Vertex, vertex_source);
        let fragment = Shader::compile(backend, ShaderKind::Fragment, fragment_source);
        let (vertex, fragment) = match (vertex, fragment) {
            (Ok(vertex), Ok(fragment)) => (vertex, fragment),
            (vertex, fragment) => {
                let failures = [vertex.err(), fragment.err()].into_iter().flatten().collect();
                return Err(ShaderError::Compilation(failures));
            }
        };

        backend.attach_shader(id, vertex.id());
        backend.attach_shader(id, fragment.id());
        backend.link_program(id);
        let linked = program.check_status(B::link_status).map_err(ShaderError::Linking);
        let validated = linked.and_then(|()| {
            backend.validate_program(id);
            program.check_status(B::validate_status).map_err(ShaderError::Validation)
        });

        drop(vertex);
        drop(fragment);
        validated?;

        log::info!("Linked shader program {}", id);
        Ok(program)
    }

    fn check_status(&self, status: fn(&B, GLuint) -> bool) -> Result<(), String> {
        if status(&self.backend, self.id) {
            return Ok(());
        }
        let log = self.backend.program_info_log(self.id);
        log::error!("Shader program {} failed: {}", self.id, log.trim_end());
        Err(log)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    /// Looks up an active uniform. A missing uniform is an error, since a
    /// program without it cannot be driven.
    pub fn uniform_location(&mut self, name: &str) -> Result<UniformLocation, ShaderError> {
        let location = match self.uniforms.get(name) {
            Some(location) => *location,
            None => {
                let cname = CString::new(name)?;
                let location = self.backend.uniform_location(self.id, &cname);
                if location == -1 {
                    return Err(ShaderError::UniformNotFound(name.to_string()));
                }
                self.uniforms.insert(name.to_string(), location);
                location
            }
        };

        Ok(UniformLocation {
            program: self.id,
            location,
        })
    }

    /// Makes this the active program until the returned guard is dropped.
    pub fn bind(&self) -> ProgramBinding<'_, B> {
        self.backend.use_program(self.id);
        ProgramBinding { program: self }
    }
}

impl<B: ShaderBackend> Drop for ShaderProgram<B> {
    fn drop(&mut self) {
        self.backend.delete_program(self.id);
    }
}

/// The program currently in use. Uniform writes go through this guard.
pub struct ProgramBinding<'a, B: ShaderBackend> {
    program: &'a ShaderProgram<B>,
}

impl<'a, B: ShaderBackend> ProgramBinding<'a, B> {
    pub fn program(&self) -> &'a ShaderProgram<B> {
        self.program
    }

    pub fn set_uniform_4f(&self, uniform: UniformLocation, value: Vec4) {
        debug_assert_eq!(uniform.program, self.program.id, "uniform belongs to another program");
        self.program.backend.uniform_4f(uniform.location, value.to_array());
    }
}

impl<B: ShaderBackend> Drop for ProgramBinding<'_, B> {
    fn drop(&mut self) {
        self.program.backend.use_program(0);
    }
}

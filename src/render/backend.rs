// backend.rs - The driver calls the shader pipeline depends on

use super::shaders::ShaderKind;
use gl::types::*;
use std::ffi::{c_void, CStr};
use std::ptr;

/// Shader and program object calls of an OpenGL driver.
///
/// Object names are plain GL names; `0` means the driver could not create
/// the object. Every method must be called from the thread that owns the
/// context.
pub trait ShaderBackend: Clone {
    fn create_shader(&self, kind: ShaderKind) -> GLuint;
    fn compile_shader(&self, shader: GLuint, source: &CStr);
    fn compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn link_program(&self, program: GLuint);
    fn link_status(&self, program: GLuint) -> bool;
    fn validate_program(&self, program: GLuint);
    fn validate_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn delete_program(&self, program: GLuint);

    /// Returns `-1` when the program has no active uniform of that name.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn use_program(&self, program: GLuint);
    fn uniform_4f(&self, location: GLint, value: [f32; 4]);
}

/// Proof that the global GL function table has been loaded for the current
/// context. GL-touching constructors take it so nothing can run before load.
#[derive(Debug, Clone, Copy)]
pub struct Gl {
    _loaded: (),
}

impl Gl {
    /// Loads every GL entry point through `loader`.
    ///
    /// Returns `None` when the entry points this crate needs are missing.
    pub fn load_with<F>(loader: F) -> Option<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);

        let loaded = gl::CreateShader::is_loaded()
            && gl::CreateProgram::is_loaded()
            && gl::GenVertexArrays::is_loaded()
            && gl::DrawElements::is_loaded();
        loaded.then_some(Gl { _loaded: () })
    }

    /// Reads a driver string such as `gl::VERSION` or `gl::RENDERER`.
    pub fn get_string(&self, name: GLenum) -> Option<String> {
        let raw = unsafe { gl::GetString(name) };
        if raw.is_null() {
            return None;
        }
        let text = unsafe { CStr::from_ptr(raw as *const std::os::raw::c_char) };
        Some(text.to_string_lossy().into_owned())
    }
}

fn read_info_log<F>(len: GLint, read: F) -> String
where
    F: FnOnce(GLsizei, *mut GLsizei, *mut GLchar),
{
    if len <= 0 {
        return String::new();
    }
    let mut buffer: Vec<u8> = vec![0; len as usize];
    let mut written: GLsizei = 0;
    read(len, &mut written, buffer.as_mut_ptr() as *mut GLchar);
    buffer.truncate(written.clamp(0, len) as usize);
    String::from_utf8_lossy(&buffer).into_owned()
}

impl ShaderBackend for Gl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        unsafe { gl::CreateShader(kind.gl_enum()) }
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        let mut success: GLint = 1;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, written, buffer| unsafe {
            gl::GetShaderInfoLog(shader, len, written, buffer);
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) };
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) };
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) };
    }

    fn link_status(&self, program: GLuint) -> bool {
        let mut success: GLint = 1;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn validate_program(&self, program: GLuint) {
        unsafe { gl::ValidateProgram(program) };
    }

    fn validate_status(&self, program: GLuint) -> bool {
        let mut success: GLint = 1;
        unsafe {
            gl::GetProgramiv(program, gl::VALIDATE_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len: GLint = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, written, buffer| unsafe {
            gl::GetProgramInfoLog(program, len, written, buffer);
        })
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) };
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) };
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        let [r, g, b, a] = value;
        unsafe { gl::Uniform4f(location, r, g, b, a) };
    }
}

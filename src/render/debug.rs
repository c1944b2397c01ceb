use gl::types::GLenum;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("OpenGL error {} (0x{code:x}) in {call} at {file}:{line}", error_name(*.code))]
pub struct GlError {
    pub code: GLenum,
    pub call: &'static str,
    pub file: &'static str,
    pub line: u32,
}

pub fn error_name(code: GLenum) -> &'static str {
    match code {
        gl::INVALID_ENUM => "GL_INVALID_ENUM",
        gl::INVALID_VALUE => "GL_INVALID_VALUE",
        gl::INVALID_OPERATION => "GL_INVALID_OPERATION",
        gl::INVALID_FRAMEBUFFER_OPERATION => "GL_INVALID_FRAMEBUFFER_OPERATION",
        gl::OUT_OF_MEMORY => "GL_OUT_OF_MEMORY",
        gl::STACK_UNDERFLOW => "GL_STACK_UNDERFLOW",
        gl::STACK_OVERFLOW => "GL_STACK_OVERFLOW",
        _ => "unknown error",
    }
}

/// Discards errors left over from earlier, unchecked calls.
pub(crate) fn clear_errors() {
    unsafe { while gl::GetError() != gl::NO_ERROR {} }
}

/// Drains the GL error queue, logging every entry. The first error is returned.
pub(crate) fn check_errors(call: &'static str, file: &'static str, line: u32) -> Result<(), GlError> {
    let mut first = None;
    loop {
        let code = unsafe { gl::GetError() };
        if code == gl::NO_ERROR {
            break;
        }
        let error = GlError { code, call, file, line };
        log::error!("{}", error);
        first.get_or_insert(error);
    }
    first.map_or(Ok(()), Err)
}

/// Runs a GL call and turns any error it raised into a `GlError`.
///
/// Expands to a `Result` holding the call's return value.
macro_rules! gl_check {
    ($call:expr) => {{
        $crate::render::debug::clear_errors();
        #[allow(unused_unsafe)]
        let value = unsafe { $call };
        $crate::render::debug::check_errors(stringify!($call), file!(), line!()).map(|()| value)
    }};
}

pub(crate) use gl_check;

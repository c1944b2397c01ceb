//! In-memory stand-in for the GL shader API, used by unit tests.

use super::backend::ShaderBackend;
use super::shaders::ShaderKind;
use gl::types::{GLint, GLuint};
use std::cell::RefCell;
use std::collections::HashMap;
use std::ffi::CStr;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct FakeShader {
    pub kind: Option<ShaderKind>,
    pub source: String,
    pub compiled: bool,
    pub log: String,
    pub deleted: bool,
}

#[derive(Debug, Default)]
pub struct FakeProgram {
    pub attached: Vec<GLuint>,
    pub linked: bool,
    pub validated: bool,
    pub log: String,
    pub deleted: bool,
    pub uniforms: Vec<String>,
}

#[derive(Debug, Default)]
pub struct FakeState {
    next_name: GLuint,
    pub shaders: HashMap<GLuint, FakeShader>,
    pub programs: HashMap<GLuint, FakeProgram>,
    pub bound_program: GLuint,
    pub uniform_writes: Vec<(GLint, [f32; 4])>,
    pub calls: Vec<String>,
    pub link_failure: Option<String>,
    pub validate_failure: Option<String>,
    pub refuse_programs: bool,
}

/// Compiles any source that declares `void main` with balanced braces and
/// collects `uniform vec4 <name>;` declarations at link time.
#[derive(Debug, Clone, Default)]
pub struct FakeGl {
    state: Rc<RefCell<FakeState>>,
}

impl FakeGl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> std::cell::Ref<'_, FakeState> {
        self.state.borrow()
    }

    pub fn fail_link(&self, log: &str) {
        self.state.borrow_mut().link_failure = Some(log.to_string());
    }

    pub fn fail_validation(&self, log: &str) {
        self.state.borrow_mut().validate_failure = Some(log.to_string());
    }

    pub fn refuse_programs(&self) {
        self.state.borrow_mut().refuse_programs = true;
    }

    pub fn live_shaders(&self) -> usize {
        self.state().shaders.values().filter(|s| !s.deleted).count()
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().calls.push(call);
    }

    fn next_name(state: &mut FakeState) -> GLuint {
        state.next_name += 1;
        state.next_name
    }
}

fn compile_errors(source: &str) -> Option<String> {
    if !source.contains("void main") {
        return Some("0:1(1): error: no function with name 'main'".to_string());
    }
    let opened = source.matches('{').count();
    let closed = source.matches('}').count();
    if opened != closed {
        return Some(format!(
            "0:{}(1): error: syntax error, unexpected end of file",
            source.lines().count()
        ));
    }
    None
}

fn declared_uniforms(source: &str) -> impl Iterator<Item = String> + '_ {
    source.lines().filter_map(|line| {
        line.trim()
            .strip_prefix("uniform vec4 ")
            .and_then(|rest| rest.strip_suffix(';'))
            .map(|name| name.trim().to_string())
    })
}

impl ShaderBackend for FakeGl {
    fn create_shader(&self, kind: ShaderKind) -> GLuint {
        let mut state = self.state.borrow_mut();
        let name = Self::next_name(&mut state);
        state.shaders.insert(
            name,
            FakeShader {
                kind: Some(kind),
                ..FakeShader::default()
            },
        );
        state.calls.push(format!("create_shader({kind})"));
        name
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) {
        let mut state = self.state.borrow_mut();
        let entry = state.shaders.get_mut(&shader).expect("unknown shader");
        entry.source = source.to_string_lossy().into_owned();
        match compile_errors(&entry.source) {
            Some(log) => {
                entry.compiled = false;
                entry.log = log;
            }
            None => entry.compiled = true,
        }
        state.calls.push(format!("compile_shader({shader})"));
    }

    fn compile_status(&self, shader: GLuint) -> bool {
        self.state().shaders[&shader].compiled
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        self.state().shaders[&shader].log.clone()
    }

    fn delete_shader(&self, shader: GLuint) {
        if let Some(entry) = self.state.borrow_mut().shaders.get_mut(&shader) {
            entry.deleted = true;
        }
        self.record(format!("delete_shader({shader})"));
    }

    fn create_program(&self) -> GLuint {
        let mut state = self.state.borrow_mut();
        if state.refuse_programs {
            return 0;
        }
        let name = Self::next_name(&mut state);
        state.programs.insert(name, FakeProgram::default());
        state.calls.push("create_program".to_string());
        name
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        let mut state = self.state.borrow_mut();
        state
            .programs
            .get_mut(&program)
            .expect("unknown program")
            .attached
            .push(shader);
        state.calls.push(format!("attach_shader({program}, {shader})"));
    }

    fn link_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let failure = state.link_failure.clone();
        let uniforms: Vec<String> = state.programs[&program]
            .attached
            .iter()
            .flat_map(|shader| declared_uniforms(&state.shaders[shader].source).collect::<Vec<_>>())
            .collect();
        let all_compiled = state.programs[&program]
            .attached
            .iter()
            .all(|shader| state.shaders[shader].compiled);

        let entry = state.programs.get_mut(&program).expect("unknown program");
        match failure {
            Some(log) => {
                entry.linked = false;
                entry.log = log;
            }
            None if !all_compiled => {
                entry.linked = false;
                entry.log = "error: linking with uncompiled shader".to_string();
            }
            None => {
                entry.linked = true;
                entry.uniforms = uniforms;
            }
        }
        state.calls.push(format!("link_program({program})"));
    }

    fn link_status(&self, program: GLuint) -> bool {
        self.state().programs[&program].linked
    }

    fn validate_program(&self, program: GLuint) {
        let mut state = self.state.borrow_mut();
        let failure = state.validate_failure.clone();
        let entry = state.programs.get_mut(&program).expect("unknown program");
        match failure {
            Some(log) => {
                entry.validated = false;
                entry.log = log;
            }
            None => entry.validated = entry.linked,
        }
        state.calls.push(format!("validate_program({program})"));
    }

    fn validate_status(&self, program: GLuint) -> bool {
        self.state().programs[&program].validated
    }

    fn program_info_log(&self, program: GLuint) -> String {
        self.state().programs[&program].log.clone()
    }

    fn delete_program(&self, program: GLuint) {
        if let Some(entry) = self.state.borrow_mut().programs.get_mut(&program) {
            entry.deleted = true;
        }
        self.record(format!("delete_program({program})"));
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        let name = name.to_string_lossy();
        self.state().programs[&program]
            .uniforms
            .iter()
            .position(|uniform| *uniform == name)
            .map_or(-1, |index| index as GLint)
    }

    fn use_program(&self, program: GLuint) {
        self.state.borrow_mut().bound_program = program;
        self.record(format!("use_program({program})"));
    }

    fn uniform_4f(&self, location: GLint, value: [f32; 4]) {
        self.state.borrow_mut().uniform_writes.push((location, value));
    }
}

/// A vertex/fragment pair the fake accepts, with a `u_Color` uniform.
pub const GOOD_VERTEX: &str = "#version 330 core\nlayout(location = 0) in vec4 position;\nvoid main() {\n    gl_Position = position;\n}\n";
pub const GOOD_FRAGMENT: &str = "#version 330 core\nlayout(location = 0) out vec4 color;\nuniform vec4 u_Color;\nvoid main() {\n    color = u_Color;\n}\n";

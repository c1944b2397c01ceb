// shaders.rs - Combined shader file splitting and shader errors

use serde::{Deserialize, Serialize};
use std::ffi::NulError;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Token that introduces a section marker line.
pub const MARKER_TOKEN: &str = "#shader";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("Failed to read shader source {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unrecognised shader section marker on line {line}: {text:?}")]
    UnknownSection { line: usize, text: String },
    #[error("Shader compilation failed: {}", describe_failures(.0))]
    Compilation(Vec<CompileError>),
    #[error("Program linking failed: {0}")]
    Linking(String),
    #[error("Program validation failed: {0}")]
    Validation(String),
    #[error("Driver returned no {0} object")]
    ObjectCreation(&'static str),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
    #[error("Uniform not found: {0}")]
    UniformNotFound(String),
}

/// A single stage that the driver refused to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub kind: ShaderKind,
    pub log: String,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shader: {}", self.kind, self.log.trim_end())
    }
}

impl std::error::Error for CompileError {}

fn describe_failures(failures: &[CompileError]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::Vertex => "vertex",
            ShaderKind::Fragment => "fragment",
        }
    }

    pub fn gl_enum(self) -> gl::types::GLenum {
        match self {
            ShaderKind::Vertex => gl::VERTEX_SHADER,
            ShaderKind::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How section marker lines are recognised.
///
/// `Lenient` treats any line containing `#shader` as a marker and picks the
/// section by substring, checking `vertex` before `fragment`. `Strict` only
/// accepts `#shader vertex` or `#shader fragment` at the start of a line and
/// rejects every other `#shader` directive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSyntax {
    #[default]
    Lenient,
    Strict,
}

enum Line<'a> {
    Marker(Option<ShaderKind>),
    Source(&'a str),
}

impl MarkerSyntax {
    fn classify<'a>(self, number: usize, line: &'a str) -> Result<Line<'a>, ShaderError> {
        match self {
            MarkerSyntax::Lenient => {
                if !line.contains(MARKER_TOKEN) {
                    return Ok(Line::Source(line));
                }
                let kind = if line.contains("vertex") {
                    Some(ShaderKind::Vertex)
                } else if line.contains("fragment") {
                    Some(ShaderKind::Fragment)
                } else {
                    None
                };
                Ok(Line::Marker(kind))
            }
            MarkerSyntax::Strict => {
                let Some(rest) = line.trim_start().strip_prefix(MARKER_TOKEN) else {
                    return Ok(Line::Source(line));
                };
                let mut words = rest.split_whitespace();
                let kind = match (rest.starts_with(char::is_whitespace), words.next(), words.next()) {
                    (true, Some("vertex"), None) => ShaderKind::Vertex,
                    (true, Some("fragment"), None) => ShaderKind::Fragment,
                    _ => {
                        return Err(ShaderError::UnknownSection {
                            line: number,
                            text: line.to_string(),
                        })
                    }
                };
                Ok(Line::Marker(Some(kind)))
            }
        }
    }
}

/// Vertex and fragment source recovered from a combined shader file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderProgramSource {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderProgramSource {
    pub fn new(vertex: String, fragment: String) -> Self {
        Self { vertex, fragment }
    }

    /// Reads and splits a combined shader file.
    pub fn from_file(path: impl AsRef<Path>, syntax: MarkerSyntax) -> Result<Self, ShaderError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, syntax)
    }

    /// Splits combined source text into its two sections.
    ///
    /// Lines before the first marker are dropped. Each kept line is appended
    /// with a trailing newline; marker lines themselves are never kept. A
    /// section that never appears stays empty.
    pub fn parse(text: &str, syntax: MarkerSyntax) -> Result<Self, ShaderError> {
        let mut source = ShaderProgramSource::default();
        let mut current: Option<ShaderKind> = None;

        for (index, line) in text.lines().enumerate() {
            match syntax.classify(index + 1, line)? {
                Line::Marker(Some(kind)) => current = Some(kind),
                Line::Marker(None) => {
                    log::warn!(
                        "Shader marker on line {} names no known stage, staying in {}",
                        index + 1,
                        current.map_or("no section", ShaderKind::name)
                    );
                }
                Line::Source(line) => {
                    if let Some(kind) = current {
                        let buffer = source.section_mut(kind);
                        buffer.push_str(line);
                        buffer.push('\n');
                    }
                }
            }
        }

        Ok(source)
    }

    pub fn section(&self, kind: ShaderKind) -> &str {
        match kind {
            ShaderKind::Vertex => &self.vertex,
            ShaderKind::Fragment => &self.fragment,
        }
    }

    fn section_mut(&mut self, kind: ShaderKind) -> &mut String {
        match kind {
            ShaderKind::Vertex => &mut self.vertex,
            ShaderKind::Fragment => &mut self.fragment,
        }
    }
}

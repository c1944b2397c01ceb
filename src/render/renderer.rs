use super::backend::Gl;
use super::debug::{gl_check, GlError};
use super::mesh::QuadMesh;
use super::program::{ShaderProgram, UniformLocation};
use super::pulse::ColorPulse;
use super::shaders::ShaderProgramSource;
use crate::config::rendering::RenderConfig;
use anyhow::{Context, Result};
use glam::Vec4;

/// Everything drawn each frame: the quad, its program and the animated color.
pub struct Renderer {
    // Field order is drop order: the program goes before the mesh.
    program: ShaderProgram<Gl>,
    mesh: QuadMesh,
    color: UniformLocation,
    pulse: ColorPulse,
}

impl Renderer {
    pub fn new(gl: Gl, config: &RenderConfig) -> Result<Self> {
        let mesh = QuadMesh::new(gl).context("Failed to upload quad mesh")?;

        let source = ShaderProgramSource::from_file(&config.shader_path, config.marker_syntax)?;
        log::debug!(
            "Split {}: {} vertex bytes, {} fragment bytes",
            config.shader_path.display(),
            source.vertex.len(),
            source.fragment.len()
        );

        // Validation checks the program against current state, which needs a
        // vertex array bound in a core profile.
        let mut program = {
            let _vao = mesh.bind();
            ShaderProgram::from_source(&gl, &source)?
        };

        let color = program.uniform_location(&config.color_uniform)?;
        program.bind().set_uniform_4f(color, Vec4::from_array(config.initial_color));

        let [r, g, b, a] = config.clear_color;
        gl_check!(gl::ClearColor(r, g, b, a))?;

        Ok(Self {
            program,
            mesh,
            color,
            pulse: ColorPulse::new(&config.pulse),
        })
    }

    pub fn render_frame(&mut self) -> Result<(), GlError> {
        unsafe { gl::Clear(gl::COLOR_BUFFER_BIT) };

        {
            let binding = self.program.bind();
            binding.set_uniform_4f(self.color, self.pulse.color());
            self.mesh.draw(&binding)?;
        }

        self.pulse.advance();
        Ok(())
    }

    pub fn resize(&self, width: u32, height: u32) {
        unsafe { gl::Viewport(0, 0, width as i32, height as i32) };
    }
}

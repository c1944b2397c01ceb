use crate::render::shaders::MarkerSyntax;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub shader_path: PathBuf,
    pub marker_syntax: MarkerSyntax,
    pub color_uniform: String,
    pub initial_color: [f32; 4],
    pub clear_color: [f32; 4],
    pub pulse: PulseConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            shader_path: PathBuf::from("res/shaders/Basic.shader"),
            marker_syntax: MarkerSyntax::Lenient,
            color_uniform: "u_Color".to_string(),
            initial_color: [0.8, 0.3, 0.8, 1.0],
            clear_color: [0.0, 0.0, 0.0, 1.0],
            pulse: PulseConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    pub initial: f32,
    pub increment: f32,
    pub base_color: [f32; 4],
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            initial: 0.0,
            increment: 0.002,
            base_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

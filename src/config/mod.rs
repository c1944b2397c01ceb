pub mod core;
pub mod rendering;
pub mod window;

pub use self::core::AppConfig;
pub use rendering::{PulseConfig, RenderConfig};
pub use window::WindowConfig;

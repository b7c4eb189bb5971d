pub mod config;
pub mod error;
pub mod motion;
pub mod view;

pub use config::{AppConfig, MotionConfig};
pub use error::{Error, Result};
pub use motion::{MotionEngine, Surface, Timer};
pub use view::TextView;

mod error;
mod scene_kit_config;
pub mod utils;

pub use error::*;
pub use scene_kit_config::*;

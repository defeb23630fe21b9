pub mod config;
pub mod logging;
pub mod opponent;
pub mod store;

pub use opponent::{EngineConfig, GameSession};

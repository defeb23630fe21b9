use std::path::PathBuf;

use crate::opponent::EngineConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub log_level: String,
    pub player: Option<String>,
    pub engine: EngineConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("JOKENPO_DATA_DIR")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let player = std::env::var("JOKENPO_PLAYER")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());

        Self {
            data_dir,
            log_level,
            player,
            engine: EngineConfig::from_env(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("jokenpo"))
        .unwrap_or_else(|| PathBuf::from("./data"))
}

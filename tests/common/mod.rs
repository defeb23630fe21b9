#![allow(dead_code)]

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use jokenpo_ai::opponent::{EngineConfig, GameSession, TelemetrySnapshot};
use jokenpo_ai::store::{KeyValueStore, MemoryStore, StoreError, StoreResult};

pub fn fixed_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 12).unwrap()
}

pub fn config_with_rounds(rounds_per_match: u32) -> EngineConfig {
    EngineConfig {
        rounds_per_match,
        ..EngineConfig::default()
    }
}

pub fn session_with<S: KeyValueStore>(
    player: &str,
    store: S,
    config: EngineConfig,
) -> GameSession<S> {
    GameSession::start_on(player, fixed_date(), store, config)
        .with_exploration_rng(StdRng::seed_from_u64(0x5eed))
}

pub fn memory_session(player: &str, rounds_per_match: u32) -> GameSession<MemoryStore> {
    session_with(player, MemoryStore::new(), config_with_rounds(rounds_per_match))
}

pub fn calm() -> TelemetrySnapshot {
    TelemetrySnapshot::latency_only(450.0)
}

/// Store whose every operation fails.
#[derive(Debug, Default)]
pub struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> StoreResult<Option<String>> {
        Err(StoreError::Unavailable("offline".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> StoreResult<()> {
        Err(StoreError::Unavailable("offline".to_string()))
    }
}

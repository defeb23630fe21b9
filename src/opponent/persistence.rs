use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::opponent::history::RoundHistoryEntry;
use crate::opponent::model::ModelState;
use crate::opponent::totals::LifetimeTotals;
use crate::store::{KeyValueStore, StoreResult};

pub const DEFAULT_PREFIX: &str = "jokenpo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    Model,
    History,
    Totals,
}

impl Record {
    pub fn as_str(&self) -> &'static str {
        match self {
            Record::Model => "model",
            Record::History => "history",
            Record::Totals => "totals",
        }
    }
}

/// Typed, per-player view over a [`KeyValueStore`].
pub struct PlayerStore<S> {
    store: S,
    prefix: String,
}

impl<S: KeyValueStore> PlayerStore<S> {
    pub fn new(store: S) -> Self {
        Self::with_prefix(store, DEFAULT_PREFIX)
    }

    pub fn with_prefix(store: S, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    pub fn key(&self, player: &str, record: Record) -> String {
        format!(
            "{}:{}:{}",
            self.prefix,
            player.trim().to_lowercase(),
            record.as_str()
        )
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn load_model(&self, player: &str) -> Option<ModelState> {
        self.load(player, Record::Model)
    }

    pub fn load_history(&self, player: &str) -> Option<Vec<RoundHistoryEntry>> {
        self.load(player, Record::History)
    }

    pub fn load_totals(&self, player: &str) -> Option<LifetimeTotals> {
        self.load(player, Record::Totals)
    }

    pub fn save_model(&mut self, player: &str, model: &ModelState) -> StoreResult<()> {
        self.save(player, Record::Model, model)
    }

    pub fn save_history(&mut self, player: &str, history: &[RoundHistoryEntry]) -> StoreResult<()> {
        self.save(player, Record::History, history)
    }

    pub fn save_totals(&mut self, player: &str, totals: &LifetimeTotals) -> StoreResult<()> {
        self.save(player, Record::Totals, totals)
    }

    /// Absent, unreadable and malformed records all come back as `None`.
    fn load<T: DeserializeOwned>(&self, player: &str, record: Record) -> Option<T> {
        let key = self.key(player, record);
        let raw = match self.store.get(&key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(player, record = record.as_str(), error = %e, "failed to read record");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(player, record = record.as_str(), error = %e, "malformed record ignored");
                None
            }
        }
    }

    fn save<T: Serialize + ?Sized>(
        &mut self,
        player: &str,
        record: Record,
        value: &T,
    ) -> StoreResult<()> {
        let key = self.key(player, record);
        let raw = serde_json::to_string(value)?;
        self.store.set(&key, &raw)
    }
}

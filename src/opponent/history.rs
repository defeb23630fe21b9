use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::opponent::types::{Move, MoveMap, Outcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundHistoryEntry {
    pub timestamp: i64,
    pub player_move: Move,
    pub ai_move: Move,
    pub outcome: Outcome,
    pub decision_latency_ms: f64,
    pub hover_ms: MoveMap<f64>,
    pub switch_count: u32,
    pub pointer_path: f64,
    pub variant_stamp: String,
    #[serde(default)]
    pub session_id: Uuid,
}

/// Most recent rounds, oldest first, truncated from the front past `cap`.
#[derive(Debug, Clone)]
pub struct RoundHistory {
    entries: VecDeque<RoundHistoryEntry>,
    cap: usize,
}

impl RoundHistory {
    pub fn new(cap: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cap: cap.max(1),
        }
    }

    pub fn from_entries(entries: Vec<RoundHistoryEntry>, cap: usize) -> Self {
        let mut history = Self::new(cap);
        history.entries = entries.into();
        history.truncate();
        history
    }

    pub fn push(&mut self, entry: RoundHistoryEntry) {
        self.entries.push_back(entry);
        self.truncate();
    }

    fn truncate(&mut self) {
        while self.entries.len() > self.cap {
            self.entries.pop_front();
        }
    }

    /// Up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<RoundHistoryEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip).cloned().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &RoundHistoryEntry> + '_ {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<RoundHistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn last(&self) -> Option<&RoundHistoryEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

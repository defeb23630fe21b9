use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::opponent::types::Outcome;

/// Lifetime results for a player. Never reset by a match restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LifetimeTotals {
    pub wins: u64,
    pub losses: u64,
    pub draws: u64,
    pub sessions: u64,
}

impl LifetimeTotals {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn rounds(&self) -> u64 {
        self.wins + self.losses + self.draws
    }

    /// Player win rate; zero rounds count as one to avoid dividing by zero.
    pub fn win_rate(&self) -> f64 {
        self.wins as f64 / self.rounds().max(1) as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchVerdict {
    PlayerWon,
    OpponentWon,
}

/// Counters for the current fixed-length match. Lives only as long as the
/// session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    pub session_id: Uuid,
    pub rounds_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub rounds_per_match: u32,
}

impl MatchState {
    pub fn new(rounds_per_match: u32) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            rounds_played: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            rounds_per_match: rounds_per_match.max(1),
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        self.rounds_played += 1;
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Lose => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rounds_played >= self.rounds_per_match
    }

    pub fn rounds_left(&self) -> u32 {
        self.rounds_per_match.saturating_sub(self.rounds_played)
    }

    /// Only decided once every round has been played; draws favor the
    /// opponent.
    pub fn verdict(&self) -> Option<MatchVerdict> {
        if !self.is_complete() {
            return None;
        }
        Some(if self.wins > self.losses {
            MatchVerdict::PlayerWon
        } else {
            MatchVerdict::OpponentWon
        })
    }
}

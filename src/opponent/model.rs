use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::opponent::config::EngineConfig;
use crate::opponent::types::{Move, MoveMap, MovePair, Outcome, OutcomeMap, PredictorMap, Tier};
use crate::opponent::variance::DailyVariantProfile;

/// Decayed observation counts per move.
pub type MoveCounts = MoveMap<f64>;

impl MoveMap<f64> {
    /// Multiplicative decay, held at `floor` so entries stay positive.
    pub fn decay(&mut self, factor: f64, floor: f64) {
        for v in self.values_mut() {
            *v = (*v * factor).max(floor);
        }
    }

    pub fn bump(&mut self, m: Move) {
        self[m] += 1.0;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HesitationState {
    pub avg_decision_ms: f64,
    pub samples: u64,
    /// Actual choices recorded under "most hovered while hesitant".
    pub pivot: MoveMap<MoveCounts>,
}

impl HesitationState {
    fn seeded(initial_avg_ms: f64, smoothing: f64) -> Self {
        Self {
            avg_decision_ms: initial_avg_ms,
            samples: 0,
            pivot: MoveMap::splat(MoveCounts::splat(smoothing)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelState {
    pub player: String,
    pub rounds_seen: u64,
    pub tier: Tier,
    pub epsilon: f64,
    pub decay: f64,
    pub counts: MoveCounts,
    pub trans1: MoveMap<MoveCounts>,
    #[serde(default)]
    pub trans2: BTreeMap<MovePair, MoveCounts>,
    pub post_result: OutcomeMap<MoveCounts>,
    pub last_move: Option<Move>,
    pub prev_move: Option<Move>,
    pub last_two_key: Option<MovePair>,
    pub last_result: Option<Outcome>,
    pub streak: u32,
    pub hesitation: HesitationState,
    pub perf: PredictorMap<f64>,
    #[serde(default)]
    pub variant_stamp: Option<String>,
    #[serde(default)]
    pub updated_at: i64,
}

impl ModelState {
    /// Fresh model for a player, with smoothed tables and today's tunables.
    pub fn seeded(player: &str, profile: &DailyVariantProfile, config: &EngineConfig) -> Self {
        let smoothing = config.memory.smoothing;
        Self {
            player: player.trim().to_string(),
            rounds_seen: 0,
            tier: Tier::default(),
            epsilon: profile.tier_epsilon(Tier::default()),
            decay: profile.decay,
            counts: MoveCounts::splat(smoothing),
            trans1: MoveMap::splat(MoveCounts::splat(smoothing)),
            trans2: BTreeMap::new(),
            post_result: OutcomeMap::splat(MoveCounts::splat(smoothing)),
            last_move: None,
            prev_move: None,
            last_two_key: None,
            last_result: None,
            streak: 0,
            hesitation: HesitationState::seeded(config.hesitation.initial_avg_ms, smoothing),
            perf: PredictorMap::splat(config.performance.initial),
            variant_stamp: Some(profile.stamp.clone()),
            updated_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Re-applies today's decay and tier epsilon to a model loaded from an
    /// earlier day, and repairs values a hand-edited record could break.
    pub fn rebase(&mut self, profile: &DailyVariantProfile, config: &EngineConfig) {
        self.decay = profile.decay;
        self.tier = Tier::new(self.tier.level());
        self.epsilon = profile.tier_epsilon(self.tier);
        self.variant_stamp = Some(profile.stamp.clone());

        let floor = config.memory.count_floor;
        let repair = |counts: &mut MoveCounts| {
            for v in counts.values_mut() {
                if !v.is_finite() || *v < floor {
                    *v = floor;
                }
            }
        };
        repair(&mut self.counts);
        for bucket in self.trans1.values_mut() {
            repair(bucket);
        }
        for bucket in self.trans2.values_mut() {
            repair(bucket);
        }
        for bucket in self.post_result.values_mut() {
            repair(bucket);
        }
        for bucket in self.hesitation.pivot.values_mut() {
            repair(bucket);
        }
        if !self.hesitation.avg_decision_ms.is_finite() || self.hesitation.avg_decision_ms < 0.0 {
            self.hesitation.avg_decision_ms = config.hesitation.initial_avg_ms;
        }
        for id in crate::opponent::types::PredictorId::ALL {
            let p = self.perf[id];
            self.perf[id] = if p.is_finite() {
                p.clamp(0.0, 1.0)
            } else {
                config.performance.initial
            };
        }
        if self.last_two_key.is_some() && self.prev_move.is_none() {
            self.last_two_key = None;
        }
    }

    pub fn trans2_bucket(&self, key: &MovePair) -> Option<&MoveCounts> {
        self.trans2.get(key)
    }
}

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::opponent::config::DecisionParams;
use crate::opponent::types::{Distribution, Move, MoveMap};
use crate::opponent::variance::DailyVariantProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionMode {
    Explore,
    Proportional,
    Greedy,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choice {
    pub ai_move: Move,
    pub mode: DecisionMode,
    pub scores: MoveMap<f64>,
}

/// Epsilon-greedy choice of the opponent's move.
#[derive(Debug, Clone)]
pub struct DecisionPolicy {
    params: DecisionParams,
}

impl DecisionPolicy {
    /// Invalid bounds (non-finite, outside [0, 1] or inverted) fall back to
    /// the defaults.
    pub fn new(params: DecisionParams) -> Self {
        let params = if params.is_valid() {
            params
        } else {
            DecisionParams::default()
        };
        Self { params }
    }

    pub fn effective_epsilon(&self, base_epsilon: f64, profile: &DailyVariantProfile) -> f64 {
        let eps = base_epsilon * profile.epsilon_scale * profile.epsilon_jitter;
        if !eps.is_finite() {
            return self.params.epsilon_min;
        }
        eps.clamp(self.params.epsilon_min, self.params.epsilon_max)
    }

    /// Each candidate scores the predicted probability of the player move it
    /// defeats.
    pub fn scores(predicted: &Distribution) -> MoveMap<f64> {
        MoveMap::from_fn(|ai| predicted.prob(ai.beats()))
    }

    pub fn choose<R: Rng + ?Sized>(
        &self,
        predicted: &Distribution,
        epsilon: f64,
        closeness: f64,
        rng: &mut R,
    ) -> Choice {
        let scores = Self::scores(predicted);

        if rng.random::<f64>() < epsilon {
            let ai_move = Move::ALL[rng.random_range(0..Move::ALL.len())];
            return Choice {
                ai_move,
                mode: DecisionMode::Explore,
                scores,
            };
        }

        let max = scores.rock.max(scores.paper).max(scores.scissors);
        let close = scores.iter().all(|(_, s)| (max - s).abs() < closeness);
        if close {
            return Choice {
                ai_move: sample_proportional(&scores, rng),
                mode: DecisionMode::Proportional,
                scores,
            };
        }

        let mut best = Move::ALL[0];
        for m in Move::ALL {
            if scores[m] > scores[best] {
                best = m;
            }
        }
        Choice {
            ai_move: best,
            mode: DecisionMode::Greedy,
            scores,
        }
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self::new(DecisionParams::default())
    }
}

fn sample_proportional<R: Rng + ?Sized>(scores: &MoveMap<f64>, rng: &mut R) -> Move {
    let total = scores.rock + scores.paper + scores.scissors;
    if !(total > 1e-9) {
        return Move::ALL[rng.random_range(0..Move::ALL.len())];
    }
    let r = rng.random::<f64>() * total;
    let mut acc = 0.0;
    for m in Move::ALL {
        acc += scores[m];
        if r < acc {
            return m;
        }
    }
    Move::Scissors
}

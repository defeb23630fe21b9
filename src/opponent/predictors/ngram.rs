use crate::opponent::config::NGramParams;
use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, Move, MoveMap, PredictorId};

/// Short periodic patterns in the player's own moves: `ABAB` and `ABCABC`.
pub struct NGramPredictor {
    params: NGramParams,
}

impl NGramPredictor {
    pub fn new(params: NGramParams) -> Self {
        Self { params }
    }

    /// Pattern votes for a move sequence, oldest first.
    pub fn votes(&self, moves: &[Move]) -> Option<Distribution> {
        if moves.len() < 4 {
            return None;
        }
        let mut weights = MoveMap::splat(0.0);

        let tail4 = &moves[moves.len() - 4..];
        if tail4[0] == tail4[2] && tail4[1] == tail4[3] && tail4[0] != tail4[1] {
            weights[tail4[0]] += self.params.alternation_vote;
        }

        if moves.len() >= 6 {
            let tail6 = &moves[moves.len() - 6..];
            if tail6[..3] == tail6[3..] {
                weights[tail6[0]] += self.params.cycle_vote;
            }
        }

        let dist = Distribution::from_weights(weights);
        if dist.is_uniform() {
            return None;
        }
        Some(dist)
    }
}

impl Default for NGramPredictor {
    fn default() -> Self {
        Self::new(NGramParams::default())
    }
}

impl Predictor for NGramPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::NGram
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        let window = self.params.window.max(6);
        let skip = ctx.recent.len().saturating_sub(window);
        let moves: Vec<Move> = ctx.recent[skip..].iter().map(|e| e.player_move).collect();
        self.votes(&moves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Move::{Paper, Rock, Scissors};

    #[test]
    fn alternation_votes_for_four_back() {
        let d = NGramPredictor::default()
            .votes(&[Rock, Paper, Rock, Paper])
            .unwrap();
        assert_eq!(d.prob(Rock), 1.0);
    }

    #[test]
    fn cycle_votes_for_six_back() {
        let d = NGramPredictor::default()
            .votes(&[Rock, Paper, Scissors, Rock, Paper, Scissors])
            .unwrap();
        assert_eq!(d.prob(Rock), 1.0);
    }

    #[test]
    fn long_alternation_uses_last_four() {
        let d = NGramPredictor::default()
            .votes(&[Paper, Rock, Paper, Rock, Paper, Rock])
            .unwrap();
        assert_eq!(d.prob(Paper), 1.0);
    }

    #[test]
    fn repeated_move_is_not_alternation() {
        assert!(NGramPredictor::default()
            .votes(&[Scissors, Rock, Rock, Rock])
            .is_none());
    }

    #[test]
    fn too_short_abstains() {
        assert!(NGramPredictor::default().votes(&[Rock, Paper, Rock]).is_none());
    }
}

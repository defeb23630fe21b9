use crate::opponent::config::RepeatParams;
use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, MoveMap, Outcome, PredictorId};

/// Win-stay / lose-shift heuristic with a streak bonus.
pub struct RepeatPredictor {
    params: RepeatParams,
}

impl RepeatPredictor {
    pub fn new(params: RepeatParams) -> Self {
        Self { params }
    }
}

impl Default for RepeatPredictor {
    fn default() -> Self {
        Self::new(RepeatParams::default())
    }
}

impl Predictor for RepeatPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Repeat
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        let last = ctx.model.last_move?;
        let mut weights = MoveMap::splat(0.0);

        match ctx.model.last_result.unwrap_or(Outcome::Draw) {
            Outcome::Win => weights[last] = 1.0,
            Outcome::Lose => {
                weights[last] = self.params.loss_repeat;
                weights[last.beaten_by()] = self.params.loss_shift;
            }
            Outcome::Draw => {
                let lean = self.params.draw_repeat.clamp(0.0, 1.0);
                let rest = (1.0 - lean) / 2.0;
                weights[last] = lean;
                weights[last.beats()] = rest;
                weights[last.beaten_by()] = rest;
            }
        }

        if ctx.model.streak >= self.params.streak_len {
            weights[last] += self.params.streak_bonus;
        }

        Some(Distribution::from_weights(weights))
    }
}

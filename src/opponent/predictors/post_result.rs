use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, PredictorId};

/// What the player tends to do after a win, a loss or a draw.
pub struct PostResultPredictor;

impl Predictor for PostResultPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::PostResult
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        let result = ctx.model.last_result?;
        Some(Distribution::from_weights(ctx.model.post_result[result]))
    }
}

use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, PredictorId};

/// Global move frequencies.
pub struct FrequencyPredictor;

impl Predictor for FrequencyPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Frequency
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        Some(Distribution::from_weights(ctx.model.counts))
    }
}

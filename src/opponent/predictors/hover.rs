use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, PredictorId};

/// Hover time per button as a proxy for intent.
pub struct HoverIntentPredictor;

impl Predictor for HoverIntentPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Hover
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        if ctx.snapshot.total_hover_ms() <= 0.0 {
            return None;
        }
        Some(Distribution::from_weights(ctx.snapshot.hover_ms))
    }
}

/// On hesitant rounds: where the player historically ended up when the
/// pointer lingered longest on the current most-hovered button.
pub struct PivotPredictor;

impl Predictor for PivotPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::Pivot
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        if !ctx.hesitant {
            return None;
        }
        let most = ctx.snapshot.most_hovered();
        Some(Distribution::from_weights(ctx.model.hesitation.pivot[most]))
    }
}

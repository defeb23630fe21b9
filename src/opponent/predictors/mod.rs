//! Estimators of the player's next move.
//!
//! Each predictor looks at the model, the current round's telemetry and the
//! trailing history window and either returns a distribution or abstains.
//! Abstaining is the normal answer whenever a signal is missing: no prior
//! move, no hover time, not enough history.

pub mod frequency;
pub mod hover;
pub mod ngram;
pub mod post_result;
pub mod repeat;
pub mod transition;

use serde::{Deserialize, Serialize};

use crate::opponent::config::EngineConfig;
use crate::opponent::history::RoundHistoryEntry;
use crate::opponent::model::ModelState;
use crate::opponent::types::{Distribution, PredictorId, TelemetrySnapshot};

pub use frequency::FrequencyPredictor;
pub use hover::{HoverIntentPredictor, PivotPredictor};
pub use ngram::NGramPredictor;
pub use post_result::PostResultPredictor;
pub use repeat::RepeatPredictor;
pub use transition::{FirstOrderPredictor, SecondOrderPredictor};

pub struct PredictionContext<'a> {
    pub model: &'a ModelState,
    pub snapshot: &'a TelemetrySnapshot,
    /// Trailing history window, oldest first.
    pub recent: &'a [RoundHistoryEntry],
    pub hesitant: bool,
}

pub trait Predictor {
    fn id(&self) -> PredictorId;

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorOpinion {
    pub id: PredictorId,
    pub distribution: Distribution,
}

pub struct PredictorSet {
    predictors: Vec<Box<dyn Predictor>>,
}

impl PredictorSet {
    pub fn standard(config: &EngineConfig) -> Self {
        let predictors: Vec<Box<dyn Predictor>> = vec![
            Box::new(FrequencyPredictor),
            Box::new(FirstOrderPredictor),
            Box::new(SecondOrderPredictor),
            Box::new(PostResultPredictor),
            Box::new(RepeatPredictor::new(config.repeat.clone())),
            Box::new(NGramPredictor::new(config.ngram.clone())),
            Box::new(HoverIntentPredictor),
            Box::new(PivotPredictor),
        ];
        Self { predictors }
    }

    /// Runs every predictor. A pivot opinion replaces the hover opinion for
    /// the round; the two never contribute together.
    pub fn evaluate(&self, ctx: &PredictionContext<'_>) -> Vec<PredictorOpinion> {
        let mut opinions: Vec<PredictorOpinion> = self
            .predictors
            .iter()
            .filter_map(|p| {
                p.predict(ctx).map(|distribution| PredictorOpinion {
                    id: p.id(),
                    distribution,
                })
            })
            .collect();

        if opinions.iter().any(|o| o.id == PredictorId::Pivot) {
            opinions.retain(|o| o.id != PredictorId::Hover);
        }
        opinions
    }
}

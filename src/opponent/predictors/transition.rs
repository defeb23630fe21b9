use crate::opponent::predictors::{PredictionContext, Predictor};
use crate::opponent::types::{Distribution, PredictorId};

/// P(next | previous move).
pub struct FirstOrderPredictor;

impl Predictor for FirstOrderPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::FirstOrder
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        let last = ctx.model.last_move?;
        Some(Distribution::from_weights(ctx.model.trans1[last]))
    }
}

/// P(next | previous two moves). A pair never followed by a move yet has no
/// bucket and reads as uniform.
pub struct SecondOrderPredictor;

impl Predictor for SecondOrderPredictor {
    fn id(&self) -> PredictorId {
        PredictorId::SecondOrder
    }

    fn predict(&self, ctx: &PredictionContext<'_>) -> Option<Distribution> {
        let key = ctx.model.last_two_key?;
        Some(
            ctx.model
                .trans2_bucket(&key)
                .map(|bucket| Distribution::from_weights(*bucket))
                .unwrap_or_else(Distribution::uniform),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::config::EngineConfig;
    use crate::opponent::model::ModelState;
    use crate::opponent::types::{Move, MovePair, TelemetrySnapshot};
    use crate::opponent::variance::VarianceInjector;
    use chrono::NaiveDate;

    fn model() -> ModelState {
        let config = EngineConfig::default();
        let profile = VarianceInjector::new(&config)
            .profile("trans", NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
        ModelState::seeded("trans", &profile, &config)
    }

    #[test]
    fn abstain_without_enough_moves() {
        let model = model();
        let snap = TelemetrySnapshot::default();
        let ctx = PredictionContext {
            model: &model,
            snapshot: &snap,
            recent: &[],
            hesitant: false,
        };
        assert!(FirstOrderPredictor.predict(&ctx).is_none());
        assert!(SecondOrderPredictor.predict(&ctx).is_none());
    }

    #[test]
    fn conditions_on_previous_moves() {
        let mut model = model();
        model.last_move = Some(Move::Paper);
        model.prev_move = Some(Move::Rock);
        model.last_two_key = Some(MovePair::new(Move::Rock, Move::Paper));
        model.trans1.paper.scissors += 2.0;
        let snap = TelemetrySnapshot::default();
        let ctx = PredictionContext {
            model: &model,
            snapshot: &snap,
            recent: &[],
            hesitant: false,
        };
        let first = FirstOrderPredictor.predict(&ctx).unwrap();
        assert!((first.prob(Move::Scissors) - 0.6).abs() < 1e-9);

        let second = SecondOrderPredictor.predict(&ctx).unwrap();
        assert!(second.is_uniform());
    }
}

use tracing::debug;

use crate::opponent::config::{EngineConfig, HesitationParams, MemoryParams, PerformanceParams};
use crate::opponent::model::{ModelState, MoveCounts};
use crate::opponent::predictors::PredictorOpinion;
use crate::opponent::progression::ProgressionController;
use crate::opponent::totals::LifetimeTotals;
use crate::opponent::types::{Move, MovePair, Outcome, TelemetrySnapshot};
use crate::opponent::variance::DailyVariantProfile;

/// Everything the updater needs to know about a resolved round.
pub struct RoundObservation<'a> {
    pub player_move: Move,
    pub outcome: Outcome,
    pub snapshot: &'a TelemetrySnapshot,
    /// Hesitation as classified when the decision was made.
    pub hesitant: bool,
    pub opinions: &'a [PredictorOpinion],
}

#[derive(Debug, Clone)]
pub struct RoundUpdater {
    memory: MemoryParams,
    hesitation: HesitationParams,
    performance: PerformanceParams,
    progression: ProgressionController,
}

impl RoundUpdater {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            memory: config.memory.clone(),
            hesitation: config.hesitation.clone(),
            performance: config.performance.clone(),
            progression: ProgressionController::new(config.progression.clone()),
        }
    }

    /// Folds one round into the model. `totals` must already include the
    /// round's outcome.
    pub fn apply(
        &self,
        model: &mut ModelState,
        round: &RoundObservation<'_>,
        totals: &LifetimeTotals,
        profile: &DailyVariantProfile,
    ) {
        let mv = round.player_move;
        self.update_tables(model, mv);

        model.streak = if model.last_move == Some(mv) {
            model.streak.saturating_add(1)
        } else {
            1
        };

        let alpha = self.hesitation.avg_smoothing;
        let latency = round.snapshot.decision_latency_ms;
        let h = &mut model.hesitation;
        h.avg_decision_ms = (1.0 - alpha) * h.avg_decision_ms + alpha * latency;
        h.samples += 1;

        if round.hesitant {
            let bucket = &mut h.pivot[round.snapshot.most_hovered()];
            bucket.decay(model.decay, self.memory.count_floor);
            bucket.bump(mv);
        }

        model.prev_move = model.last_move;
        model.last_move = Some(mv);
        model.last_two_key = model.prev_move.map(|prev| MovePair::new(prev, mv));
        model.last_result = Some(round.outcome);

        model.rounds_seen += 1;
        if self.progression.apply(model, totals, profile) {
            debug!(player = %model.player, tier = %model.tier, "opponent promoted");
        }

        let eta = self.performance.eta;
        for opinion in round.opinions {
            let hit = opinion.distribution.prob(mv);
            let perf = &mut model.perf[opinion.id];
            *perf = ((1.0 - eta) * *perf + eta * hit).clamp(0.0, 1.0);
        }

        model.updated_at = chrono::Utc::now().timestamp_millis();
    }

    fn update_tables(&self, model: &mut ModelState, mv: Move) {
        let (factor, floor) = (model.decay, self.memory.count_floor);

        model.counts.decay(factor, floor);
        for bucket in model.trans1.values_mut() {
            bucket.decay(factor, floor);
        }
        for bucket in model.post_result.values_mut() {
            bucket.decay(factor, floor);
        }

        model.counts.bump(mv);
        if let Some(prev) = model.last_move {
            model.trans1[prev].bump(mv);
        }
        if let Some(key) = model.last_two_key {
            let smoothing = self.memory.smoothing;
            let bucket = model
                .trans2
                .entry(key)
                .or_insert_with(|| MoveCounts::splat(smoothing));
            bucket.decay(factor, floor);
            bucket.bump(mv);
        }
        if let Some(result) = model.last_result {
            model.post_result[result].bump(mv);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::types::{Distribution, MoveMap, PredictorId, Tier};
    use crate::opponent::variance::VarianceInjector;
    use chrono::NaiveDate;

    fn setup() -> (EngineConfig, DailyVariantProfile, ModelState) {
        let config = EngineConfig::default();
        let profile = VarianceInjector::new(&config)
            .profile("updater", NaiveDate::from_ymd_opt(2024, 4, 4).unwrap());
        let model = ModelState::seeded("updater", &profile, &config);
        (config, profile, model)
    }

    fn observe<'a>(
        mv: Move,
        snapshot: &'a TelemetrySnapshot,
        opinions: &'a [PredictorOpinion],
    ) -> RoundObservation<'a> {
        RoundObservation {
            player_move: mv,
            outcome: Outcome::Draw,
            snapshot,
            hesitant: false,
            opinions,
        }
    }

    #[test]
    fn first_round_only_touches_global_counts() {
        let (config, profile, mut model) = setup();
        let updater = RoundUpdater::new(&config);
        let snap = TelemetrySnapshot::latency_only(400.0);
        let totals = LifetimeTotals::default();
        updater.apply(&mut model, &observe(Move::Rock, &snap, &[]), &totals, &profile);

        assert!((model.counts.rock - (model.decay + 1.0)).abs() < 1e-12);
        assert!((model.trans1.rock.rock - model.decay).abs() < 1e-12);
        assert!(model.trans2.is_empty());
        assert_eq!(model.last_move, Some(Move::Rock));
        assert_eq!(model.prev_move, None);
        assert_eq!(model.last_two_key, None);
        assert_eq!(model.streak, 1);
        assert_eq!(model.rounds_seen, 1);
        assert!((model.hesitation.avg_decision_ms - 670.0).abs() < 1e-9);
    }

    #[test]
    fn window_shift_and_second_order_bucket() {
        let (config, profile, mut model) = setup();
        let updater = RoundUpdater::new(&config);
        let snap = TelemetrySnapshot::latency_only(400.0);
        let totals = LifetimeTotals::default();
        for mv in [Move::Rock, Move::Paper, Move::Scissors] {
            updater.apply(&mut model, &observe(mv, &snap, &[]), &totals, &profile);
        }
        assert_eq!(model.prev_move, Some(Move::Paper));
        assert_eq!(model.last_two_key, Some(MovePair::new(Move::Paper, Move::Scissors)));
        let bucket = model
            .trans2_bucket(&MovePair::new(Move::Rock, Move::Paper))
            .copied()
            .unwrap();
        assert!((bucket.scissors - (model.decay + 1.0)).abs() < 1e-12);
        assert_eq!(model.trans2.len(), 1);
        assert_eq!(model.last_result, Some(Outcome::Draw));
    }

    #[test]
    fn streak_counts_repeats() {
        let (config, profile, mut model) = setup();
        let updater = RoundUpdater::new(&config);
        let snap = TelemetrySnapshot::latency_only(400.0);
        let totals = LifetimeTotals::default();
        for _ in 0..4 {
            updater.apply(&mut model, &observe(Move::Paper, &snap, &[]), &totals, &profile);
        }
        assert_eq!(model.streak, 4);
        updater.apply(&mut model, &observe(Move::Rock, &snap, &[]), &totals, &profile);
        assert_eq!(model.streak, 1);
        assert_eq!(model.tier, Tier::new(1));
    }

    #[test]
    fn hesitant_round_feeds_pivot_table() {
        let (config, profile, mut model) = setup();
        let updater = RoundUpdater::new(&config);
        let snap = TelemetrySnapshot::new(
            MoveMap {
                rock: 0.0,
                paper: 900.0,
                scissors: 0.0,
            },
            4,
            0.0,
            2500.0,
        );
        let mut round = observe(Move::Scissors, &snap, &[]);
        round.hesitant = true;
        updater.apply(&mut model, &round, &LifetimeTotals::default(), &profile);
        assert!((model.hesitation.pivot.paper.scissors - (model.decay + 1.0)).abs() < 1e-12);
        assert_eq!(model.hesitation.pivot.rock, MoveCounts::splat(1.0));
    }

    #[test]
    fn performance_tracks_probability_of_actual_move() {
        let (config, profile, mut model) = setup();
        let updater = RoundUpdater::new(&config);
        let snap = TelemetrySnapshot::latency_only(400.0);
        let opinions = vec![
            PredictorOpinion {
                id: PredictorId::Frequency,
                distribution: Distribution::point(Move::Rock),
            },
            PredictorOpinion {
                id: PredictorId::Hover,
                distribution: Distribution::point(Move::Paper),
            },
        ];
        updater.apply(
            &mut model,
            &observe(Move::Rock, &snap, &opinions),
            &LifetimeTotals::default(),
            &profile,
        );
        assert!((model.perf.frequency - 0.575).abs() < 1e-12);
        assert!((model.perf.hover - 0.425).abs() < 1e-12);
        assert_eq!(model.perf.repeat, 0.5);
    }
}

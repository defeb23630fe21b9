use crate::opponent::config::{EngineConfig, PerformanceParams, TierTable};
use crate::opponent::model::ModelState;
use crate::opponent::types::{Outcome, PredictorId, PredictorMap, TelemetrySnapshot, Tier};
use crate::opponent::variance::DailyVariantProfile;

#[derive(Debug, Clone)]
pub struct WeightingPolicy {
    tiers: TierTable,
    performance: PerformanceParams,
}

impl WeightingPolicy {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            tiers: config.tiers.clone(),
            performance: config.performance.clone(),
        }
    }

    /// Tier weights scaled by today's per-predictor multipliers.
    pub fn base_weights(&self, tier: Tier, profile: &DailyVariantProfile) -> PredictorMap<f64> {
        let table = &self.tiers.weights[tier.index()];
        PredictorMap::from_fn(|id| table[id] * profile.weight_multipliers[id])
    }

    /// Weights for the current round, before performance scaling.
    pub fn round_weights(
        &self,
        model: &ModelState,
        snapshot: &TelemetrySnapshot,
        profile: &DailyVariantProfile,
    ) -> PredictorMap<f64> {
        let mut weights = self.base_weights(model.tier, profile);
        if Self::repeat_boost_applies(model, snapshot, profile) {
            weights.repeat *= profile.repeat_boost;
        }
        weights.pivot *= profile.pivot_boost;
        weights
    }

    /// A slow answer right after losing tends to be a repeat.
    pub fn repeat_boost_applies(
        model: &ModelState,
        snapshot: &TelemetrySnapshot,
        profile: &DailyVariantProfile,
    ) -> bool {
        model.last_result == Some(Outcome::Lose)
            && profile
                .hesitation
                .is_slow(snapshot.decision_latency_ms, model.hesitation.avg_decision_ms)
    }

    pub fn performance_scale(
        &self,
        id: PredictorId,
        model: &ModelState,
        profile: &DailyVariantProfile,
    ) -> f64 {
        let perf = model.perf[id];
        let perf = if perf.is_finite() { perf.clamp(0.0, 1.0) } else { 0.0 };
        (self.performance.scale_floor + self.performance.scale_span * perf)
            * profile.perf_multipliers[id]
    }

    pub fn performance_scales(
        &self,
        model: &ModelState,
        profile: &DailyVariantProfile,
    ) -> PredictorMap<f64> {
        PredictorMap::from_fn(|id| self.performance_scale(id, model, profile))
    }
}

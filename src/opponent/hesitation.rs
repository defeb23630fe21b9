use serde::{Deserialize, Serialize};

use crate::opponent::config::HesitationParams;
use crate::opponent::types::TelemetrySnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HesitationThresholds {
    pub latency_floor_ms: f64,
    pub latency_multiplier: f64,
    pub switch_threshold: u32,
    pub path_threshold: f64,
}

impl HesitationThresholds {
    pub fn from_params(params: &HesitationParams) -> Self {
        Self {
            latency_floor_ms: params.latency_floor_ms,
            latency_multiplier: params.latency_multiplier,
            switch_threshold: params.switch_threshold,
            path_threshold: params.path_threshold,
        }
    }

    pub fn latency_limit(&self, avg_decision_ms: f64) -> f64 {
        self.latency_floor_ms.max(avg_decision_ms * self.latency_multiplier)
    }

    pub fn is_slow(&self, decision_latency_ms: f64, avg_decision_ms: f64) -> bool {
        decision_latency_ms > self.latency_limit(avg_decision_ms)
    }

    pub fn classify(&self, snapshot: &TelemetrySnapshot, avg_decision_ms: f64) -> HesitationSignal {
        HesitationSignal {
            slow: self.is_slow(snapshot.decision_latency_ms, avg_decision_ms),
            restless: snapshot.switch_count >= self.switch_threshold,
            wandering: snapshot.pointer_path > self.path_threshold,
        }
    }
}

impl Default for HesitationThresholds {
    fn default() -> Self {
        Self::from_params(&HesitationParams::default())
    }
}

/// Which indecision cues fired for a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HesitationSignal {
    pub slow: bool,
    pub restless: bool,
    pub wandering: bool,
}

impl HesitationSignal {
    pub fn is_hesitant(&self) -> bool {
        self.slow || self.restless || self.wandering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::types::MoveMap;

    #[test]
    fn calm_round_is_not_hesitant() {
        let t = HesitationThresholds::default();
        let snap = TelemetrySnapshot::new(MoveMap::splat(100.0), 1, 120.0, 400.0);
        assert!(!t.classify(&snap, 700.0).is_hesitant());
    }

    #[test]
    fn latency_uses_running_average_above_floor() {
        let t = HesitationThresholds::default();
        // floor dominates: 1.25 * 400 = 500 < 700
        assert!(!t.is_slow(690.0, 400.0));
        assert!(t.is_slow(710.0, 400.0));
        // average dominates: 1.25 * 2000 = 2500
        assert!(!t.is_slow(2400.0, 2000.0));
        assert!(t.is_slow(2600.0, 2000.0));
    }

    #[test]
    fn any_cue_is_enough() {
        let t = HesitationThresholds::default();
        let switches = TelemetrySnapshot::new(MoveMap::splat(0.0), 3, 0.0, 0.0);
        let signal = t.classify(&switches, 700.0);
        assert!(signal.restless && signal.is_hesitant());

        let path = TelemetrySnapshot::new(MoveMap::splat(0.0), 0, 801.0, 0.0);
        let signal = t.classify(&path, 700.0);
        assert!(signal.wandering && !signal.slow && signal.is_hesitant());
    }
}

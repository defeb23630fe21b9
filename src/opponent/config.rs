use serde::{Deserialize, Serialize};

use crate::opponent::types::PredictorMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierTable {
    pub weights: [PredictorMap<f64>; 4],
    pub epsilon: [f64; 4],
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            weights: [
                PredictorMap {
                    frequency: 0.30,
                    first_order: 0.0,
                    second_order: 0.0,
                    post_result: 0.0,
                    repeat: 0.0,
                    ngram: 0.0,
                    hover: 0.20,
                    pivot: 0.0,
                },
                PredictorMap {
                    frequency: 0.25,
                    first_order: 0.30,
                    second_order: 0.0,
                    post_result: 0.15,
                    repeat: 0.10,
                    ngram: 0.05,
                    hover: 0.20,
                    pivot: 0.05,
                },
                PredictorMap {
                    frequency: 0.20,
                    first_order: 0.25,
                    second_order: 0.20,
                    post_result: 0.10,
                    repeat: 0.15,
                    ngram: 0.10,
                    hover: 0.10,
                    pivot: 0.10,
                },
                PredictorMap {
                    frequency: 0.15,
                    first_order: 0.20,
                    second_order: 0.25,
                    post_result: 0.10,
                    repeat: 0.20,
                    ngram: 0.15,
                    hover: 0.08,
                    pivot: 0.12,
                },
            ],
            epsilon: [0.30, 0.20, 0.12, 0.08],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionParams {
    pub tier1_rounds: u64,
    pub tier2_rounds: u64,
    pub tier3_rounds: u64,
    pub tier3_win_rate: f64,
}

impl Default for ProgressionParams {
    fn default() -> Self {
        Self {
            tier1_rounds: 5,
            tier2_rounds: 15,
            tier3_rounds: 40,
            tier3_win_rate: 0.60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HesitationParams {
    pub latency_floor_ms: f64,
    pub latency_multiplier: f64,
    pub switch_threshold: u32,
    pub path_threshold: f64,
    pub initial_avg_ms: f64,
    pub avg_smoothing: f64,
}

impl Default for HesitationParams {
    fn default() -> Self {
        Self {
            latency_floor_ms: 700.0,
            latency_multiplier: 1.25,
            switch_threshold: 3,
            path_threshold: 800.0,
            initial_avg_ms: 700.0,
            avg_smoothing: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepeatParams {
    pub loss_repeat: f64,
    pub loss_shift: f64,
    pub draw_repeat: f64,
    pub streak_len: u32,
    pub streak_bonus: f64,
}

impl Default for RepeatParams {
    fn default() -> Self {
        Self {
            loss_repeat: 0.4,
            loss_shift: 0.6,
            draw_repeat: 0.55,
            streak_len: 2,
            streak_bonus: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NGramParams {
    pub alternation_vote: f64,
    pub cycle_vote: f64,
    pub window: usize,
}

impl Default for NGramParams {
    fn default() -> Self {
        Self {
            alternation_vote: 1.0,
            cycle_vote: 0.8,
            window: 8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionParams {
    pub epsilon_min: f64,
    pub epsilon_max: f64,
}

impl DecisionParams {
    /// Finite bounds inside [0, 1] with `min <= max`.
    pub fn is_valid(&self) -> bool {
        is_probability(self.epsilon_min)
            && is_probability(self.epsilon_max)
            && self.epsilon_min <= self.epsilon_max
    }
}

impl Default for DecisionParams {
    fn default() -> Self {
        Self {
            epsilon_min: 0.03,
            epsilon_max: 0.6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceParams {
    pub eta: f64,
    pub initial: f64,
    pub scale_floor: f64,
    pub scale_span: f64,
}

impl Default for PerformanceParams {
    fn default() -> Self {
        Self {
            eta: 0.15,
            initial: 0.5,
            scale_floor: 0.6,
            scale_span: 1.6,
        }
    }
}

/// Nominal value plus the half-width of its daily perturbation band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Band {
    pub base: f64,
    pub spread: f64,
}

impl Band {
    pub const fn new(base: f64, spread: f64) -> Self {
        Self { base, spread }
    }

    pub fn low(&self) -> f64 {
        self.base - self.spread
    }

    pub fn high(&self) -> f64 {
        self.base + self.spread
    }
}

/// Relative spreads apply as `base * (1 ± spread)`; absolute bands are
/// expressed with [`Band`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VarianceBands {
    pub weight_spread: f64,
    pub perf_spread: f64,
    pub tier_epsilon_spread: f64,
    pub epsilon_scale_spread: f64,
    pub epsilon_jitter_spread: f64,
    pub closeness: Band,
    pub repeat_boost: Band,
    pub decay: Band,
    pub latency_floor_spread: f64,
    pub latency_multiplier_spread: f64,
    pub switch_spread: f64,
    pub min_switch_threshold: u32,
    pub path_spread: f64,
    pub pivot_boost: Band,
}

impl Default for VarianceBands {
    fn default() -> Self {
        Self {
            weight_spread: 0.15,
            perf_spread: 0.08,
            tier_epsilon_spread: 0.15,
            epsilon_scale_spread: 0.10,
            epsilon_jitter_spread: 0.05,
            closeness: Band::new(0.05, 0.015),
            repeat_boost: Band::new(1.6, 0.15),
            decay: Band::new(0.92, 0.02),
            latency_floor_spread: 0.10,
            latency_multiplier_spread: 0.08,
            switch_spread: 0.20,
            min_switch_threshold: 2,
            path_spread: 0.15,
            pivot_boost: Band::new(1.2, 0.1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryParams {
    pub smoothing: f64,
    pub count_floor: f64,
    pub history_cap: usize,
}

impl Default for MemoryParams {
    fn default() -> Self {
        Self {
            smoothing: 1.0,
            count_floor: 1e-3,
            history_cap: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub tiers: TierTable,
    pub progression: ProgressionParams,
    pub hesitation: HesitationParams,
    pub repeat: RepeatParams,
    pub ngram: NGramParams,
    pub decision: DecisionParams,
    pub performance: PerformanceParams,
    pub variance: VarianceBands,
    pub memory: MemoryParams,
    #[serde(default = "default_rounds_per_match")]
    pub rounds_per_match: u32,
}

fn default_rounds_per_match() -> u32 {
    50
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tiers: TierTable::default(),
            progression: ProgressionParams::default(),
            hesitation: HesitationParams::default(),
            repeat: RepeatParams::default(),
            ngram: NGramParams::default(),
            decision: DecisionParams::default(),
            performance: PerformanceParams::default(),
            variance: VarianceBands::default(),
            memory: MemoryParams::default(),
            rounds_per_match: default_rounds_per_match(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`. Unparseable or out-of-range values
    /// keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = parse_override::<u32>(&lookup, "JOKENPO_ROUNDS_PER_MATCH") {
            if v > 0 {
                config.rounds_per_match = v;
            }
        }
        if let Some(v) = parse_override::<usize>(&lookup, "JOKENPO_HISTORY_CAP") {
            if v > 0 {
                config.memory.history_cap = v;
            }
        }
        if let Some(v) = parse_override::<f64>(&lookup, "JOKENPO_EPSILON_MIN") {
            if is_probability(v) {
                config.decision.epsilon_min = v;
            }
        }
        if let Some(v) = parse_override::<f64>(&lookup, "JOKENPO_EPSILON_MAX") {
            if is_probability(v) {
                config.decision.epsilon_max = v;
            }
        }
        if !config.decision.is_valid() {
            config.decision = DecisionParams::default();
        }

        config
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    lookup(key).and_then(|raw| raw.trim().parse().ok())
}

fn is_probability(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

//! Daily parameter variance.
//!
//! Every tunable the opponent relies on is perturbed by a generator seeded
//! from the player's name and the local calendar date. The same player sees
//! the same opponent all day, a different one tomorrow, and two players never
//! share a profile, which keeps a learned counter-strategy from carrying over
//! indefinitely.
//!
//! The generator here only ever derives parameters. Exploration draws come
//! from the session's own RNG.

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::opponent::config::{Band, EngineConfig, HesitationParams, VarianceBands};
use crate::opponent::hesitation::HesitationThresholds;
use crate::opponent::types::{PredictorMap, Tier};

const DECAY_RANGE: (f64, f64) = (0.5, 0.999);
const TIER_EPSILON_RANGE: (f64, f64) = (0.01, 0.95);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyVariantProfile {
    pub player: String,
    pub date: NaiveDate,
    pub seed: u64,
    /// Hex digest prefix recorded alongside persisted rounds for audit.
    pub stamp: String,
    pub weight_multipliers: PredictorMap<f64>,
    pub perf_multipliers: PredictorMap<f64>,
    pub tier_epsilon: [f64; 4],
    pub epsilon_scale: f64,
    pub epsilon_jitter: f64,
    pub closeness: f64,
    pub repeat_boost: f64,
    pub decay: f64,
    pub hesitation: HesitationThresholds,
    pub pivot_boost: f64,
}

impl DailyVariantProfile {
    pub fn tier_epsilon(&self, tier: Tier) -> f64 {
        self.tier_epsilon[tier.index()]
    }
}

#[derive(Debug, Clone)]
pub struct VarianceInjector {
    bands: VarianceBands,
    tier_epsilon: [f64; 4],
    hesitation: HesitationParams,
}

impl VarianceInjector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            bands: config.variance.clone(),
            tier_epsilon: config.tiers.epsilon,
            hesitation: config.hesitation.clone(),
        }
    }

    /// Seed and audit stamp for a (player, date) pair. The player identifier
    /// is trimmed and lowercased first.
    pub fn daily_seed(player: &str, date: NaiveDate) -> (u64, String) {
        let mut hasher = Sha256::new();
        hasher.update(player.trim().to_lowercase().as_bytes());
        hasher.update(date.to_string().as_bytes());
        let digest = hasher.finalize();

        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest[..8]);
        (u64::from_le_bytes(seed_bytes), hex::encode(&digest[..8]))
    }

    pub fn profile(&self, player: &str, date: NaiveDate) -> DailyVariantProfile {
        let (seed, stamp) = Self::daily_seed(player, date);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let b = &self.bands;

        // Draw order is part of the profile's identity; append new draws at the end.
        let weight_multipliers = PredictorMap::from_fn(|_| perturb(&mut rng, 1.0, b.weight_spread));
        let perf_multipliers = PredictorMap::from_fn(|_| perturb(&mut rng, 1.0, b.perf_spread));

        let mut tier_epsilon = self.tier_epsilon;
        for eps in tier_epsilon.iter_mut() {
            *eps = perturb(&mut rng, *eps, b.tier_epsilon_spread)
                .clamp(TIER_EPSILON_RANGE.0, TIER_EPSILON_RANGE.1);
        }

        let epsilon_scale = perturb(&mut rng, 1.0, b.epsilon_scale_spread);
        let epsilon_jitter = perturb(&mut rng, 1.0, b.epsilon_jitter_spread);
        let closeness = within(&mut rng, b.closeness).max(0.0);
        let repeat_boost = within(&mut rng, b.repeat_boost).max(1.0);
        let decay = within(&mut rng, b.decay).clamp(DECAY_RANGE.0, DECAY_RANGE.1);

        let h = &self.hesitation;
        let hesitation = HesitationThresholds {
            latency_floor_ms: perturb(&mut rng, h.latency_floor_ms, b.latency_floor_spread),
            latency_multiplier: perturb(
                &mut rng,
                h.latency_multiplier,
                b.latency_multiplier_spread,
            ),
            switch_threshold: (perturb(&mut rng, h.switch_threshold as f64, b.switch_spread).round()
                as u32)
                .max(b.min_switch_threshold),
            path_threshold: perturb(&mut rng, h.path_threshold, b.path_spread),
        };

        let pivot_boost = within(&mut rng, b.pivot_boost).max(1.0);

        DailyVariantProfile {
            player: player.trim().to_string(),
            date,
            seed,
            stamp,
            weight_multipliers,
            perf_multipliers,
            tier_epsilon,
            epsilon_scale,
            epsilon_jitter,
            closeness,
            repeat_boost,
            decay,
            hesitation,
            pivot_boost,
        }
    }
}

impl Default for VarianceInjector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn perturb<R: Rng + ?Sized>(rng: &mut R, base: f64, spread: f64) -> f64 {
    if spread <= 0.0 {
        return base;
    }
    base * (1.0 + rng.random_range(-spread..=spread))
}

fn within<R: Rng + ?Sized>(rng: &mut R, band: Band) -> f64 {
    if band.spread <= 0.0 {
        return band.base;
    }
    rng.random_range(band.low()..=band.high())
}

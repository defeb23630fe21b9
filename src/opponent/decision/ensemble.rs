use serde::{Deserialize, Serialize};

use crate::opponent::predictors::PredictorOpinion;
use crate::opponent::types::{Distribution, Move, MoveMap, PredictorId, PredictorMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedOpinion {
    pub id: PredictorId,
    pub distribution: Distribution,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    pub distribution: Distribution,
    pub contributions: Vec<WeightedOpinion>,
}

impl Aggregate {
    /// Share of the total weight each contributing predictor carried.
    pub fn weight_shares(&self) -> PredictorMap<f64> {
        let total: f64 = self.contributions.iter().map(|c| c.weight).sum();
        let mut shares = PredictorMap::splat(0.0);
        if total > 1e-9 {
            for c in &self.contributions {
                shares[c.id] = c.weight / total;
            }
        }
        shares
    }
}

pub struct Aggregator;

impl Aggregator {
    /// Weighted sum of opinions, renormalized. `weights` are the round
    /// weights and `scales` the performance scales; their product is the
    /// effective weight.
    pub fn combine(
        opinions: &[PredictorOpinion],
        weights: &PredictorMap<f64>,
        scales: &PredictorMap<f64>,
    ) -> Aggregate {
        let mut acc = MoveMap::splat(0.0);
        let mut contributions = Vec::with_capacity(opinions.len());

        for opinion in opinions {
            let weight = weights[opinion.id] * scales[opinion.id];
            let weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
            for m in Move::ALL {
                acc[m] += weight * opinion.distribution.prob(m);
            }
            contributions.push(WeightedOpinion {
                id: opinion.id,
                distribution: opinion.distribution,
                weight,
            });
        }

        Aggregate {
            distribution: Distribution::from_weights(acc),
            contributions,
        }
    }
}

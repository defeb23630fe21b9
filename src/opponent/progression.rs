use crate::opponent::config::ProgressionParams;
use crate::opponent::model::ModelState;
use crate::opponent::totals::LifetimeTotals;
use crate::opponent::types::Tier;
use crate::opponent::variance::DailyVariantProfile;

#[derive(Debug, Clone, Default)]
pub struct ProgressionController {
    params: ProgressionParams,
}

impl ProgressionController {
    pub fn new(params: ProgressionParams) -> Self {
        Self { params }
    }

    /// Tier earned by the given experience, ignoring the current tier.
    pub fn tier_for(&self, rounds_seen: u64, totals: &LifetimeTotals) -> Tier {
        let p = &self.params;
        if rounds_seen >= p.tier3_rounds || totals.win_rate() > p.tier3_win_rate {
            Tier::new(3)
        } else if rounds_seen >= p.tier2_rounds {
            Tier::new(2)
        } else if rounds_seen >= p.tier1_rounds {
            Tier::new(1)
        } else {
            Tier::new(0)
        }
    }

    /// Raises the model's tier when earned and resets epsilon to the tier's
    /// daily base. Returns true when the tier changed.
    pub fn apply(
        &self,
        model: &mut ModelState,
        totals: &LifetimeTotals,
        profile: &DailyVariantProfile,
    ) -> bool {
        let earned = self.tier_for(model.rounds_seen, totals);
        let next = model.tier.max(earned);
        let promoted = next != model.tier;
        model.tier = next;
        model.epsilon = profile.tier_epsilon(next);
        promoted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opponent::config::EngineConfig;
    use crate::opponent::variance::VarianceInjector;
    use chrono::NaiveDate;

    fn profile() -> DailyVariantProfile {
        VarianceInjector::default().profile("tiers", NaiveDate::from_ymd_opt(2024, 7, 7).unwrap())
    }

    #[test]
    fn thresholds_by_rounds() {
        let ctl = ProgressionController::default();
        let none = LifetimeTotals::default();
        assert_eq!(ctl.tier_for(0, &none), Tier::new(0));
        assert_eq!(ctl.tier_for(4, &none), Tier::new(0));
        assert_eq!(ctl.tier_for(5, &none), Tier::new(1));
        assert_eq!(ctl.tier_for(15, &none), Tier::new(2));
        assert_eq!(ctl.tier_for(40, &none), Tier::new(3));
    }

    #[test]
    fn strong_player_jumps_to_top_tier() {
        let ctl = ProgressionController::default();
        let totals = LifetimeTotals {
            wins: 7,
            losses: 2,
            draws: 1,
            sessions: 1,
        };
        assert_eq!(ctl.tier_for(10, &totals), Tier::new(3));
    }

    #[test]
    fn tier_never_regresses() {
        let config = EngineConfig::default();
        let profile = profile();
        let mut model = ModelState::seeded("tiers", &profile, &config);
        model.tier = Tier::new(3);
        model.rounds_seen = 1;
        let ctl = ProgressionController::default();
        assert!(!ctl.apply(&mut model, &LifetimeTotals::default(), &profile));
        assert_eq!(model.tier, Tier::new(3));
        assert_eq!(model.epsilon, profile.tier_epsilon(Tier::new(3)));
    }
}

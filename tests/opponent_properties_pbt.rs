//! Property-based tests for the opponent engine.
//!
//! - Aggregated distributions are normalized and non-negative
//! - Every decision yields one of the three moves
//! - Tier never decreases
//! - Model state survives a JSON round-trip
//! - Decay shrinks counts without crossing the floor
//! - Daily profiles are deterministic per (player, date)

mod common;

use proptest::prelude::*;

use jokenpo_ai::opponent::decision::Aggregator;
use jokenpo_ai::opponent::model::MoveCounts;
use jokenpo_ai::opponent::predictors::PredictorOpinion;
use jokenpo_ai::opponent::types::{Distribution, MoveMap, PredictorId, PredictorMap};
use jokenpo_ai::opponent::{ModelState, Move, TelemetrySnapshot, VarianceInjector};

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_move() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Rock), Just(Move::Paper), Just(Move::Scissors)]
}

fn arb_predictor() -> impl Strategy<Value = PredictorId> {
    (0usize..PredictorId::ALL.len()).prop_map(|i| PredictorId::ALL[i])
}

fn arb_distribution() -> impl Strategy<Value = Distribution> {
    (0.0f64..10.0, 0.0f64..10.0, 0.0f64..10.0).prop_map(|(rock, paper, scissors)| {
        Distribution::from_weights(MoveMap {
            rock,
            paper,
            scissors,
        })
    })
}

fn arb_snapshot() -> impl Strategy<Value = TelemetrySnapshot> {
    (
        0.0f64..2000.0, // rock hover
        0.0f64..2000.0, // paper hover
        0.0f64..2000.0, // scissors hover
        0u32..8,        // switches
        0.0f64..2000.0, // pointer path
        0.0f64..6000.0, // latency
    )
        .prop_map(|(rock, paper, scissors, switches, path, latency)| {
            TelemetrySnapshot::new(MoveMap { rock, paper, scissors }, switches, path, latency)
        })
}

fn arb_date() -> impl Strategy<Value = chrono::NaiveDate> {
    (2020i32..2030, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn aggregate_is_normalized(
        opinions in prop::collection::vec((arb_predictor(), arb_distribution()), 0..8),
        weights in prop::collection::vec(0.0f64..1.0, 8),
        scales in prop::collection::vec(0.0f64..2.5, 8),
    ) {
        let opinions: Vec<PredictorOpinion> = opinions
            .into_iter()
            .map(|(id, distribution)| PredictorOpinion { id, distribution })
            .collect();
        let weights = PredictorMap::from_fn(|id| weights[id as usize]);
        let scales = PredictorMap::from_fn(|id| scales[id as usize]);
        let agg = Aggregator::combine(&opinions, &weights, &scales);

        prop_assert!((agg.distribution.sum() - 1.0).abs() < 1e-9);
        for m in Move::ALL {
            prop_assert!(agg.distribution.prob(m) >= 0.0);
        }
    }

    #[test]
    fn every_round_yields_a_valid_move(
        rounds in prop::collection::vec((arb_move(), arb_snapshot()), 1..40),
    ) {
        let mut session = common::memory_session("prop-moves", 50);
        for (mv, snap) in rounds {
            let decision = session.decide(snap).unwrap();
            prop_assert!(Move::ALL.contains(&decision.ai_move));
            prop_assert!((decision.predicted.sum() - 1.0).abs() < 1e-9);
            for o in &decision.opinions {
                prop_assert!((o.distribution.sum() - 1.0).abs() < 1e-9);
            }
            let report = session.resolve(decision, mv).unwrap();
            prop_assert_eq!(report.outcome, mv.against(report.ai_move));
        }
    }

    #[test]
    fn tier_never_decreases(moves in prop::collection::vec(arb_move(), 1..60)) {
        let mut session = common::memory_session("prop-tier", 60);
        let mut tier = session.model().tier;
        for mv in moves {
            let report = session.play_round(mv, common::calm()).unwrap();
            prop_assert!(report.tier >= tier);
            tier = report.tier;
        }
    }

    #[test]
    fn model_json_round_trip(
        rounds in prop::collection::vec((arb_move(), arb_snapshot()), 0..25),
    ) {
        let mut session = common::memory_session("prop-json", 50);
        for (mv, snap) in rounds {
            session.play_round(mv, snap).unwrap();
        }
        let json = serde_json::to_string(session.model()).unwrap();
        let back: ModelState = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(&back, session.model());
    }

    #[test]
    fn decay_shrinks_toward_floor(
        start in (0.001f64..50.0, 0.001f64..50.0, 0.001f64..50.0),
        factor in 0.5f64..0.999,
        steps in 1usize..100,
    ) {
        let floor = 1e-3;
        let mut counts = MoveCounts { rock: start.0, paper: start.1, scissors: start.2 };
        for _ in 0..steps {
            let before = counts;
            counts.decay(factor, floor);
            for m in Move::ALL {
                prop_assert!(counts[m] >= floor);
                prop_assert!(counts[m] <= before[m].max(floor));
                if before[m] * factor > floor {
                    prop_assert!(counts[m] < before[m]);
                }
            }
        }
    }

    #[test]
    fn profiles_are_deterministic(player in "[A-Za-z]{1,12}", date in arb_date()) {
        let injector = VarianceInjector::default();
        let a = serde_json::to_string(&injector.profile(&player, date)).unwrap();
        let b = serde_json::to_string(&injector.profile(&player.to_uppercase(), date)).unwrap();
        let a_value: serde_json::Value = serde_json::from_str(&a).unwrap();
        let b_value: serde_json::Value = serde_json::from_str(&b).unwrap();
        prop_assert_eq!(&a_value["seed"], &b_value["seed"]);
        prop_assert_eq!(&a_value["tierEpsilon"], &b_value["tierEpsilon"]);
        prop_assert_eq!(a, serde_json::to_string(&injector.profile(&player, date)).unwrap());
    }
}

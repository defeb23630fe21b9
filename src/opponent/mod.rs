pub mod config;
pub mod decision;
pub mod engine;
pub mod hesitation;
pub mod history;
pub mod model;
pub mod persistence;
pub mod predictors;
pub mod progression;
pub mod totals;
pub mod types;
pub mod updater;
pub mod variance;

pub use config::EngineConfig;
pub use engine::{GameSession, RoundDecision, RoundReport, SessionError};
pub use history::{RoundHistory, RoundHistoryEntry};
pub use model::ModelState;
pub use persistence::PlayerStore;
pub use totals::{LifetimeTotals, MatchState, MatchVerdict};
pub use types::{Distribution, Move, Outcome, ParseMoveError, PredictorId, TelemetrySnapshot, Tier};
pub use variance::{DailyVariantProfile, VarianceInjector};

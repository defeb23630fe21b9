use chrono::{Local, NaiveDate, Utc};
use rand::RngCore;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::opponent::config::EngineConfig;
use crate::opponent::decision::{
    Aggregator, DecisionMode, DecisionPolicy, WeightedOpinion, WeightingPolicy,
};
use crate::opponent::hesitation::HesitationSignal;
use crate::opponent::history::{RoundHistory, RoundHistoryEntry};
use crate::opponent::model::ModelState;
use crate::opponent::persistence::PlayerStore;
use crate::opponent::predictors::{PredictionContext, PredictorOpinion, PredictorSet};
use crate::opponent::totals::{LifetimeTotals, MatchState, MatchVerdict};
use crate::opponent::types::{Distribution, Move, Outcome, TelemetrySnapshot, Tier};
use crate::opponent::updater::{RoundObservation, RoundUpdater};
use crate::opponent::variance::{DailyVariantProfile, VarianceInjector};
use crate::store::KeyValueStore;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("match already complete after {rounds} rounds; restart to keep playing")]
    MatchComplete { rounds: u32 },
}

/// The opponent's committed move for a round, plus the evidence behind it.
#[derive(Debug, Clone)]
pub struct RoundDecision {
    pub ai_move: Move,
    pub mode: DecisionMode,
    pub predicted: Distribution,
    pub epsilon: f64,
    pub hesitation: HesitationSignal,
    pub snapshot: TelemetrySnapshot,
    pub opinions: Vec<PredictorOpinion>,
    pub contributions: Vec<WeightedOpinion>,
}

#[derive(Debug, Clone)]
pub struct RoundReport {
    pub player_move: Move,
    pub ai_move: Move,
    pub outcome: Outcome,
    pub entry: RoundHistoryEntry,
    pub tier: Tier,
    pub match_state: MatchState,
    pub verdict: Option<MatchVerdict>,
    pub totals: LifetimeTotals,
    /// False when at least one record failed to save.
    pub persisted: bool,
}

/// One player's game: today's opponent profile, the learned model and the
/// current match.
pub struct GameSession<S> {
    player: String,
    config: EngineConfig,
    profile: DailyVariantProfile,
    model: ModelState,
    history: RoundHistory,
    totals: LifetimeTotals,
    match_state: MatchState,
    store: PlayerStore<S>,
    predictors: PredictorSet,
    weighting: WeightingPolicy,
    policy: DecisionPolicy,
    updater: RoundUpdater,
    rng: Box<dyn RngCore>,
}

impl<S: KeyValueStore> GameSession<S> {
    pub fn start(player: &str, store: S, config: EngineConfig) -> Self {
        Self::start_on(player, Local::now().date_naive(), store, config)
    }

    pub fn start_on(player: &str, date: NaiveDate, store: S, config: EngineConfig) -> Self {
        let player = player.trim().to_string();
        let profile = VarianceInjector::new(&config).profile(&player, date);
        let store = PlayerStore::new(store);

        let model = match store.load_model(&player) {
            Some(mut model) => {
                model.rebase(&profile, &config);
                model
            }
            None => ModelState::seeded(&player, &profile, &config),
        };
        let history = RoundHistory::from_entries(
            store.load_history(&player).unwrap_or_default(),
            config.memory.history_cap,
        );
        let totals = store.load_totals(&player).unwrap_or_default();

        let mut session = Self {
            match_state: MatchState::new(config.rounds_per_match),
            predictors: PredictorSet::standard(&config),
            weighting: WeightingPolicy::new(&config),
            policy: DecisionPolicy::new(config.decision.clone()),
            updater: RoundUpdater::new(&config),
            rng: Box::new(rand::rng()),
            player,
            config,
            profile,
            model,
            history,
            totals,
            store,
        };
        session.totals.sessions += 1;
        session.save_totals();

        info!(
            player = %session.player,
            date = %date,
            stamp = %session.profile.stamp,
            tier = %session.model.tier,
            rounds_seen = session.model.rounds_seen,
            "session started"
        );
        session
    }

    /// Replaces the exploration source, e.g. with a seeded RNG in tests.
    pub fn with_exploration_rng<R: RngCore + 'static>(mut self, rng: R) -> Self {
        self.rng = Box::new(rng);
        self
    }

    pub fn decide(&mut self, snapshot: TelemetrySnapshot) -> Result<RoundDecision, SessionError> {
        self.ensure_open()?;

        let hesitation = self
            .profile
            .hesitation
            .classify(&snapshot, self.model.hesitation.avg_decision_ms);
        let recent = self.history.recent(self.config.ngram.window);
        let ctx = PredictionContext {
            model: &self.model,
            snapshot: &snapshot,
            recent: &recent,
            hesitant: hesitation.is_hesitant(),
        };
        let opinions = self.predictors.evaluate(&ctx);

        let weights = self.weighting.round_weights(&self.model, &snapshot, &self.profile);
        let scales = self.weighting.performance_scales(&self.model, &self.profile);
        let aggregate = Aggregator::combine(&opinions, &weights, &scales);

        let epsilon = self.policy.effective_epsilon(self.model.epsilon, &self.profile);
        let choice = self.policy.choose(
            &aggregate.distribution,
            epsilon,
            self.profile.closeness,
            &mut *self.rng,
        );

        debug!(
            player = %self.player,
            round = self.match_state.rounds_played + 1,
            tier = %self.model.tier,
            epsilon,
            ai_move = %choice.ai_move,
            mode = ?choice.mode,
            hesitant = hesitation.is_hesitant(),
            opinions = opinions.len(),
            "opponent decided"
        );

        Ok(RoundDecision {
            ai_move: choice.ai_move,
            mode: choice.mode,
            predicted: aggregate.distribution,
            epsilon,
            hesitation,
            snapshot,
            opinions,
            contributions: aggregate.contributions,
        })
    }

    pub fn resolve(
        &mut self,
        decision: RoundDecision,
        player_move: Move,
    ) -> Result<RoundReport, SessionError> {
        self.ensure_open()?;

        let outcome = player_move.against(decision.ai_move);
        self.match_state.record(outcome);
        self.totals.record(outcome);

        let snapshot = decision.snapshot;
        let entry = RoundHistoryEntry {
            timestamp: Utc::now().timestamp_millis(),
            player_move,
            ai_move: decision.ai_move,
            outcome,
            decision_latency_ms: snapshot.decision_latency_ms,
            hover_ms: snapshot.hover_ms,
            switch_count: snapshot.switch_count,
            pointer_path: snapshot.pointer_path,
            variant_stamp: self.profile.stamp.clone(),
            session_id: self.match_state.session_id,
        };
        self.history.push(entry.clone());

        let observation = RoundObservation {
            player_move,
            outcome,
            snapshot: &snapshot,
            hesitant: decision.hesitation.is_hesitant(),
            opinions: &decision.opinions,
        };
        self.updater.apply(&mut self.model, &observation, &self.totals, &self.profile);

        debug!(
            player = %self.player,
            round = self.match_state.rounds_played,
            player_move = %player_move,
            ai_move = %decision.ai_move,
            outcome = ?outcome,
            tier = %self.model.tier,
            "round resolved"
        );

        let persisted = self.persist();

        let verdict = self.match_state.verdict();
        if let Some(verdict) = verdict {
            info!(
                player = %self.player,
                wins = self.match_state.wins,
                losses = self.match_state.losses,
                draws = self.match_state.draws,
                verdict = ?verdict,
                "match complete"
            );
        }

        Ok(RoundReport {
            player_move,
            ai_move: decision.ai_move,
            outcome,
            entry,
            tier: self.model.tier,
            match_state: self.match_state.clone(),
            verdict,
            totals: self.totals,
            persisted,
        })
    }

    pub fn play_round(
        &mut self,
        player_move: Move,
        snapshot: TelemetrySnapshot,
    ) -> Result<RoundReport, SessionError> {
        let decision = self.decide(snapshot)?;
        self.resolve(decision, player_move)
    }

    /// Starts a fresh match. Learning and lifetime totals carry over.
    pub fn restart_match(&mut self) {
        self.match_state = MatchState::new(self.config.rounds_per_match);
        self.totals.sessions += 1;
        self.save_totals();
        info!(player = %self.player, session = %self.match_state.session_id, "match restarted");
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.match_state.is_complete() {
            return Err(SessionError::MatchComplete {
                rounds: self.match_state.rounds_played,
            });
        }
        Ok(())
    }

    /// Best effort: failures are logged and the in-memory state stays
    /// authoritative.
    fn persist(&mut self) -> bool {
        let mut ok = true;
        if let Err(e) = self.store.save_model(&self.player, &self.model) {
            warn!(player = %self.player, record = "model", error = %e, "failed to save record");
            ok = false;
        }
        if let Err(e) = self.store.save_history(&self.player, &self.history.to_vec()) {
            warn!(player = %self.player, record = "history", error = %e, "failed to save record");
            ok = false;
        }
        ok & self.save_totals()
    }

    fn save_totals(&mut self) -> bool {
        match self.store.save_totals(&self.player, &self.totals) {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    player = %self.player,
                    record = "totals",
                    error = %e,
                    "failed to save record"
                );
                false
            }
        }
    }

    pub fn player(&self) -> &str {
        &self.player
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn profile(&self) -> &DailyVariantProfile {
        &self.profile
    }

    pub fn model(&self) -> &ModelState {
        &self.model
    }

    pub fn history(&self) -> &RoundHistory {
        &self.history
    }

    pub fn totals(&self) -> &LifetimeTotals {
        &self.totals
    }

    pub fn match_state(&self) -> &MatchState {
        &self.match_state
    }

    pub fn store(&self) -> &PlayerStore<S> {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store.into_inner()
    }
}

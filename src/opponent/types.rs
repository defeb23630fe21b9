use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Total weight below which a distribution collapses to uniform.
pub const NORMALIZE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
}

impl Move {
    /// Fixed preference order, also used to break exact ties.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rock => "rock",
            Self::Paper => "paper",
            Self::Scissors => "scissors",
        }
    }

    /// The move this one defeats.
    pub fn beats(self) -> Move {
        match self {
            Self::Rock => Self::Scissors,
            Self::Paper => Self::Rock,
            Self::Scissors => Self::Paper,
        }
    }

    /// The move that defeats this one.
    pub fn beaten_by(self) -> Move {
        match self {
            Self::Rock => Self::Paper,
            Self::Paper => Self::Scissors,
            Self::Scissors => Self::Rock,
        }
    }

    /// Result of playing `self` against `other`, from `self`'s side.
    pub fn against(self, other: Move) -> Outcome {
        if self == other {
            Outcome::Draw
        } else if self.beats() == other {
            Outcome::Win
        } else {
            Outcome::Lose
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown move: {0:?}")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rock" | "r" => Ok(Self::Rock),
            "paper" | "p" => Ok(Self::Paper),
            "scissors" | "s" => Ok(Self::Scissors),
            _ => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// Round result seen from the player's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Lose => "lose",
            Self::Draw => "draw",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveMap<T> {
    pub rock: T,
    pub paper: T,
    pub scissors: T,
}

impl<T> MoveMap<T> {
    pub fn from_fn(mut f: impl FnMut(Move) -> T) -> Self {
        Self {
            rock: f(Move::Rock),
            paper: f(Move::Paper),
            scissors: f(Move::Scissors),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Move, &T)> + '_ {
        Move::ALL.into_iter().map(move |m| (m, &self[m]))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        [&mut self.rock, &mut self.paper, &mut self.scissors].into_iter()
    }
}

impl<T: Clone> MoveMap<T> {
    pub fn splat(value: T) -> Self {
        Self {
            rock: value.clone(),
            paper: value.clone(),
            scissors: value,
        }
    }
}

impl<T> Index<Move> for MoveMap<T> {
    type Output = T;

    fn index(&self, m: Move) -> &T {
        match m {
            Move::Rock => &self.rock,
            Move::Paper => &self.paper,
            Move::Scissors => &self.scissors,
        }
    }
}

impl<T> IndexMut<Move> for MoveMap<T> {
    fn index_mut(&mut self, m: Move) -> &mut T {
        match m {
            Move::Rock => &mut self.rock,
            Move::Paper => &mut self.paper,
            Move::Scissors => &mut self.scissors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OutcomeMap<T> {
    pub win: T,
    pub lose: T,
    pub draw: T,
}

impl<T: Clone> OutcomeMap<T> {
    pub fn splat(value: T) -> Self {
        Self {
            win: value.clone(),
            lose: value.clone(),
            draw: value,
        }
    }
}

impl<T> OutcomeMap<T> {
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        [&mut self.win, &mut self.lose, &mut self.draw].into_iter()
    }
}

impl<T> Index<Outcome> for OutcomeMap<T> {
    type Output = T;

    fn index(&self, o: Outcome) -> &T {
        match o {
            Outcome::Win => &self.win,
            Outcome::Lose => &self.lose,
            Outcome::Draw => &self.draw,
        }
    }
}

impl<T> IndexMut<Outcome> for OutcomeMap<T> {
    fn index_mut(&mut self, o: Outcome) -> &mut T {
        match o {
            Outcome::Win => &mut self.win,
            Outcome::Lose => &mut self.lose,
            Outcome::Draw => &mut self.draw,
        }
    }
}

/// Probability distribution over the player's next move. Always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Distribution(MoveMap<f64>);

impl Distribution {
    pub fn uniform() -> Self {
        Self(MoveMap::splat(1.0 / 3.0))
    }

    /// Normalizes non-negative weights; negative or non-finite entries count
    /// as zero and a near-zero total yields the uniform distribution.
    pub fn from_weights(weights: MoveMap<f64>) -> Self {
        let clean = MoveMap::from_fn(|m| {
            let w = weights[m];
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        });
        let total = clean.rock + clean.paper + clean.scissors;
        if total <= NORMALIZE_EPSILON {
            return Self::uniform();
        }
        Self(MoveMap::from_fn(|m| clean[m] / total))
    }

    pub fn point(m: Move) -> Self {
        let mut weights = MoveMap::splat(0.0);
        weights[m] = 1.0;
        Self(weights)
    }

    pub fn prob(&self, m: Move) -> f64 {
        self.0[m]
    }

    pub fn sum(&self) -> f64 {
        self.0.rock + self.0.paper + self.0.scissors
    }

    pub fn is_uniform(&self) -> bool {
        let third = 1.0 / 3.0;
        self.0.iter().all(|(_, p)| (p - third).abs() < 1e-12)
    }

    /// Most likely move; ties go to the earlier move in [`Move::ALL`].
    pub fn argmax(&self) -> Move {
        let mut best = Move::Rock;
        for m in Move::ALL {
            if self.0[m] > self.0[best] {
                best = m;
            }
        }
        best
    }
}

impl Default for Distribution {
    fn default() -> Self {
        Self::uniform()
    }
}

/// Two consecutive player moves, oldest first. Serialized as `"rock|paper"`
/// so it can key a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MovePair {
    pub first: Move,
    pub second: Move,
}

impl MovePair {
    pub fn new(first: Move, second: Move) -> Self {
        Self { first, second }
    }
}

impl fmt::Display for MovePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.first, self.second)
    }
}

impl FromStr for MovePair {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (first, second) = s
            .split_once('|')
            .ok_or_else(|| ParseMoveError(s.to_string()))?;
        Ok(Self::new(first.parse()?, second.parse()?))
    }
}

impl Serialize for MovePair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MovePair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Pointer telemetry captured for one round before the player commits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySnapshot {
    pub hover_ms: MoveMap<f64>,
    pub switch_count: u32,
    pub pointer_path: f64,
    pub decision_latency_ms: f64,
}

impl TelemetrySnapshot {
    pub fn new(
        hover_ms: MoveMap<f64>,
        switch_count: u32,
        pointer_path: f64,
        decision_latency_ms: f64,
    ) -> Self {
        Self {
            hover_ms: MoveMap::from_fn(|m| non_negative(hover_ms[m])),
            switch_count,
            pointer_path: non_negative(pointer_path),
            decision_latency_ms: non_negative(decision_latency_ms),
        }
    }

    /// Snapshot carrying only a decision latency, as produced by inputs
    /// without pointer tracking.
    pub fn latency_only(decision_latency_ms: f64) -> Self {
        Self::new(MoveMap::splat(0.0), 0, 0.0, decision_latency_ms)
    }

    pub fn total_hover_ms(&self) -> f64 {
        self.hover_ms.rock + self.hover_ms.paper + self.hover_ms.scissors
    }

    /// Move with the longest hover; ties (including no hover) resolve to the
    /// earlier move in [`Move::ALL`].
    pub fn most_hovered(&self) -> Move {
        let mut best = Move::Rock;
        for m in Move::ALL {
            if self.hover_ms[m] > self.hover_ms[best] {
                best = m;
            }
        }
        best
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictorId {
    Frequency,
    FirstOrder,
    SecondOrder,
    PostResult,
    Repeat,
    NGram,
    Hover,
    Pivot,
}

impl PredictorId {
    pub const ALL: [PredictorId; 8] = [
        PredictorId::Frequency,
        PredictorId::FirstOrder,
        PredictorId::SecondOrder,
        PredictorId::PostResult,
        PredictorId::Repeat,
        PredictorId::NGram,
        PredictorId::Hover,
        PredictorId::Pivot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frequency => "frequency",
            Self::FirstOrder => "first_order",
            Self::SecondOrder => "second_order",
            Self::PostResult => "post_result",
            Self::Repeat => "repeat",
            Self::NGram => "ngram",
            Self::Hover => "hover",
            Self::Pivot => "pivot",
        }
    }
}

impl fmt::Display for PredictorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictorMap<T> {
    pub frequency: T,
    pub first_order: T,
    pub second_order: T,
    pub post_result: T,
    pub repeat: T,
    pub ngram: T,
    pub hover: T,
    pub pivot: T,
}

impl<T> PredictorMap<T> {
    pub fn from_fn(mut f: impl FnMut(PredictorId) -> T) -> Self {
        Self {
            frequency: f(PredictorId::Frequency),
            first_order: f(PredictorId::FirstOrder),
            second_order: f(PredictorId::SecondOrder),
            post_result: f(PredictorId::PostResult),
            repeat: f(PredictorId::Repeat),
            ngram: f(PredictorId::NGram),
            hover: f(PredictorId::Hover),
            pivot: f(PredictorId::Pivot),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (PredictorId, &T)> + '_ {
        PredictorId::ALL.into_iter().map(move |id| (id, &self[id]))
    }
}

impl<T: Clone> PredictorMap<T> {
    pub fn splat(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<T> Index<PredictorId> for PredictorMap<T> {
    type Output = T;

    fn index(&self, id: PredictorId) -> &T {
        match id {
            PredictorId::Frequency => &self.frequency,
            PredictorId::FirstOrder => &self.first_order,
            PredictorId::SecondOrder => &self.second_order,
            PredictorId::PostResult => &self.post_result,
            PredictorId::Repeat => &self.repeat,
            PredictorId::NGram => &self.ngram,
            PredictorId::Hover => &self.hover,
            PredictorId::Pivot => &self.pivot,
        }
    }
}

impl<T> IndexMut<PredictorId> for PredictorMap<T> {
    fn index_mut(&mut self, id: PredictorId) -> &mut T {
        match id {
            PredictorId::Frequency => &mut self.frequency,
            PredictorId::FirstOrder => &mut self.first_order,
            PredictorId::SecondOrder => &mut self.second_order,
            PredictorId::PostResult => &mut self.post_result,
            PredictorId::Repeat => &mut self.repeat,
            PredictorId::NGram => &mut self.ngram,
            PredictorId::Hover => &mut self.hover,
            PredictorId::Pivot => &mut self.pivot,
        }
    }
}

/// Skill tier, 0 through 3.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Tier(u8);

impl Tier {
    pub const MAX: Tier = Tier(3);

    pub fn new(level: u8) -> Self {
        Self(level.min(Self::MAX.0))
    }

    pub fn level(&self) -> u8 {
        self.0
    }

    pub fn index(&self) -> usize {
        self.0.min(Self::MAX.0) as usize
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominance_is_cyclic() {
        for m in Move::ALL {
            assert_eq!(m.beats().beats().beats(), m);
            assert_eq!(m.beaten_by().beats(), m);
            assert_eq!(m.against(m.beats()), Outcome::Win);
            assert_eq!(m.against(m.beaten_by()), Outcome::Lose);
            assert_eq!(m.against(m), Outcome::Draw);
        }
    }

    #[test]
    fn parse_accepts_short_forms() {
        assert_eq!("R".parse::<Move>().unwrap(), Move::Rock);
        assert_eq!(" paper ".parse::<Move>().unwrap(), Move::Paper);
        assert_eq!("s".parse::<Move>().unwrap(), Move::Scissors);
        assert!("lizard".parse::<Move>().is_err());
    }

    #[test]
    fn zero_weights_fall_back_to_uniform() {
        let dist = Distribution::from_weights(MoveMap::splat(0.0));
        assert!(dist.is_uniform());
        let dist = Distribution::from_weights(MoveMap {
            rock: -1.0,
            paper: f64::NAN,
            scissors: 0.0,
        });
        assert!(dist.is_uniform());
    }

    #[test]
    fn weights_normalize() {
        let dist = Distribution::from_weights(MoveMap {
            rock: 1.0,
            paper: 3.0,
            scissors: 0.0,
        });
        assert!((dist.sum() - 1.0).abs() < 1e-12);
        assert!((dist.prob(Move::Paper) - 0.75).abs() < 1e-12);
        assert_eq!(dist.argmax(), Move::Paper);
    }

    #[test]
    fn move_pair_keys_json_objects() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(MovePair::new(Move::Rock, Move::Paper), 1);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"rock|paper":1}"#);
        let back: std::collections::BTreeMap<MovePair, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn most_hovered_prefers_order_on_ties() {
        let snap = TelemetrySnapshot::latency_only(100.0);
        assert_eq!(snap.most_hovered(), Move::Rock);
        let snap = TelemetrySnapshot::new(
            MoveMap {
                rock: 5.0,
                paper: 50.0,
                scissors: 50.0,
            },
            0,
            0.0,
            0.0,
        );
        assert_eq!(snap.most_hovered(), Move::Paper);
    }

    #[test]
    fn tier_is_capped() {
        assert_eq!(Tier::new(9), Tier::MAX);
        assert_eq!(Tier::new(2).index(), 2);
    }
}

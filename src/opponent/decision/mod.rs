pub mod ensemble;
pub mod policy;
pub mod weighting;

pub use ensemble::{Aggregate, Aggregator, WeightedOpinion};
pub use policy::{Choice, DecisionMode, DecisionPolicy};
pub use weighting::WeightingPolicy;

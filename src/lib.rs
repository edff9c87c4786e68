//! Couple-affinity ranking over repeated noisy identity scores.
//!
//! Scores are aggregated per user (median and mean prepended to the raw
//! samples), every couple member's distance to their partner is ranked against
//! the distance to every other user, and the result is reduced into a
//! [`CoupleReport`] rendered as JSON and as a fixed-width text table.

pub mod input;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod report;

pub use model::couples::CoupleIndex;
pub use model::error::AffinityError;
pub use model::matrix::{AugmentedMatrix, DistanceTensor, IdentityMatrix};
pub use model::report::{CoupleReport, RandomBaseline, StrategyKind};
pub use pipeline::stage3_montecarlo::MonteCarloParams;
pub use pipeline::stage3_rank::RankingStrategy;
pub use pipeline::{AnalysisOutput, AnalysisParams, run_analysis};

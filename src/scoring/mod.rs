pub mod config;
pub mod describe;
pub mod engine;
pub mod factors;
pub mod validation;

pub use config::{ScoringConfig, TimingMode};
pub use describe::{band_index, describe_factor};
pub use engine::{
    adjust_market_timing, calculate_score, calculate_with_mode, compute_score,
    compute_score_with, try_compute_score, FactorContribution, ScoreBreakdown, ScoreResult,
};
pub use factors::{clamp_unit, parse_assignment, Factor, FactorError, FactorSet, Polarity};
pub use validation::validate_factors;

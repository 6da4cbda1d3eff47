use super::config::{ScoringConfig, TimingMode};
use super::factors::{clamp_unit, Factor, FactorError, FactorSet, Polarity};
use tracing::{debug, warn};

/// Number of terms in the weighted sum. The sum is normalized by the term
/// count, not by the total weight, so the raw score can exceed 1.
pub const TERM_COUNT: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct FactorContribution {
    pub factor: Factor,
    /// Value as supplied, after input clamping
    pub raw: f64,
    /// Value after complement / timing transform
    pub adjusted: f64,
    pub weight: f64,
    /// weight * adjusted
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBreakdown {
    pub timing: TimingMode,
    pub factors: Vec<FactorContribution>,
    pub weighted_sum: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreResult {
    pub score: f64,
    /// weighted_sum / 12 before the final clamp
    pub raw_score: f64,
    /// True when at least one input had to be clamped or was NaN
    pub sanitized: bool,
    pub breakdown: ScoreBreakdown,
}

/// Market timing transform.
///
/// Piecewise: `<=0.2 -> 0.2`, `<=0.4 -> 0.5`, `<=0.7 -> x`, `<=0.9 -> 0.5`, else `0.2`.
pub fn adjust_market_timing(value: f64, mode: TimingMode) -> f64 {
    match mode {
        TimingMode::PassThrough => value,
        TimingMode::Piecewise => {
            if value <= 0.2 {
                0.2
            } else if value <= 0.4 {
                0.5
            } else if value <= 0.7 {
                value
            } else if value <= 0.9 {
                0.5
            } else {
                0.2
            }
        }
    }
}

/// The value a factor contributes before weighting.
pub fn adjusted_value(factor: Factor, value: f64, mode: TimingMode) -> f64 {
    match factor.polarity() {
        Polarity::Positive => value,
        Polarity::Complemented => 1.0 - value,
        Polarity::Timing => adjust_market_timing(value, mode),
    }
}

/// Score a factor set with full breakdown, using the configured timing mode.
pub fn calculate_score(factors: &FactorSet, config: &ScoringConfig) -> ScoreResult {
    calculate_with_mode(factors, config.timing_mode())
}

pub fn calculate_with_mode(factors: &FactorSet, mode: TimingMode) -> ScoreResult {
    let mut sanitized = false;
    let mut contributions = Vec::with_capacity(Factor::ALL.len());
    let mut weighted_sum = 0.0;

    for (factor, supplied) in factors.iter() {
        let raw = clamp_unit(supplied);
        if raw != supplied {
            warn!(
                factor = %factor,
                value = supplied,
                clamped = raw,
                "factor outside [0, 1], clamping"
            );
            sanitized = true;
        }

        let adjusted = adjusted_value(factor, raw, mode);
        let weight = factor.weight();
        let contribution = weight * adjusted;
        weighted_sum += contribution;

        contributions.push(FactorContribution {
            factor,
            raw,
            adjusted,
            weight,
            contribution,
        });
    }

    let raw_score = weighted_sum / TERM_COUNT;
    let score = raw_score.clamp(0.0, 1.0);
    debug!(timing = %mode, weighted_sum, raw_score, score, "computed score");

    ScoreResult {
        score,
        raw_score,
        sanitized,
        breakdown: ScoreBreakdown {
            timing: mode,
            factors: contributions,
            weighted_sum,
        },
    }
}

/// Score a factor set with the default (piecewise) timing transform.
///
/// Total over all inputs: out-of-range values are clamped, NaN counts as 0,
/// and the result always lies in [0, 1].
pub fn compute_score(factors: &FactorSet) -> f64 {
    compute_score_with(factors, TimingMode::default())
}

pub fn compute_score_with(factors: &FactorSet, mode: TimingMode) -> f64 {
    calculate_with_mode(factors, mode).score
}

/// Strict variant: rejects the first non-finite or out-of-range factor
/// instead of clamping it.
pub fn try_compute_score(factors: &FactorSet, mode: TimingMode) -> Result<f64, FactorError> {
    for (factor, value) in factors.iter() {
        FactorSet::check(factor, value)?;
    }
    Ok(compute_score_with(factors, mode))
}

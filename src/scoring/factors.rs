use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when a factor name or value does not fit the scoring domain.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FactorError {
    #[error("unknown factor '{0}'")]
    UnknownFactor(String),

    #[error("{factor}: value {value} is not a finite number")]
    NotFinite { factor: Factor, value: f64 },

    #[error("{factor}: value {value} is outside [0, 1]")]
    OutOfRange { factor: Factor, value: f64 },
}

/// How a factor's raw value enters the weighted sum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Higher is better; used as-is.
    Positive,
    /// Higher is worse; contributes `1 - value`.
    Complemented,
    /// Passed through the market timing transform.
    Timing,
}

/// One of the twelve scoring dimensions, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    MarketSize,
    BarrierToEntry,
    Defensibility,
    InsightFactor,
    Complexity,
    RiskFactor,
    TeamFactor,
    MarketTiming,
    CompetitionIntensity,
    CapitalEfficiency,
    DistributionAdvantage,
    BusinessModelViability,
}

impl Factor {
    pub const ALL: [Factor; 12] = [
        Factor::MarketSize,
        Factor::BarrierToEntry,
        Factor::Defensibility,
        Factor::InsightFactor,
        Factor::Complexity,
        Factor::RiskFactor,
        Factor::TeamFactor,
        Factor::MarketTiming,
        Factor::CompetitionIntensity,
        Factor::CapitalEfficiency,
        Factor::DistributionAdvantage,
        Factor::BusinessModelViability,
    ];

    /// The camelCase key used in serialized factor sets.
    pub fn key(self) -> &'static str {
        match self {
            Factor::MarketSize => "marketSize",
            Factor::BarrierToEntry => "barrierToEntry",
            Factor::Defensibility => "defensibility",
            Factor::InsightFactor => "insightFactor",
            Factor::Complexity => "complexity",
            Factor::RiskFactor => "riskFactor",
            Factor::TeamFactor => "teamFactor",
            Factor::MarketTiming => "marketTiming",
            Factor::CompetitionIntensity => "competitionIntensity",
            Factor::CapitalEfficiency => "capitalEfficiency",
            Factor::DistributionAdvantage => "distributionAdvantage",
            Factor::BusinessModelViability => "businessModelViability",
        }
    }

    pub fn weight(self) -> f64 {
        match self {
            Factor::MarketSize => 1.2,
            Factor::BarrierToEntry => 1.0,
            Factor::Defensibility => 1.2,
            Factor::InsightFactor => 1.1,
            Factor::Complexity => 0.8,
            Factor::RiskFactor => 1.3,
            Factor::TeamFactor => 1.2,
            Factor::MarketTiming => 1.1,
            Factor::CompetitionIntensity => 0.9,
            Factor::CapitalEfficiency => 1.0,
            Factor::DistributionAdvantage => 1.1,
            Factor::BusinessModelViability => 1.3,
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Factor::Complexity | Factor::RiskFactor | Factor::CompetitionIntensity => {
                Polarity::Complemented
            }
            Factor::MarketTiming => Polarity::Timing,
            _ => Polarity::Positive,
        }
    }

    /// Parse a factor name. Accepts camelCase, snake_case and kebab-case,
    /// case-insensitively ("riskFactor", "risk_factor", "RISK-FACTOR").
    pub fn parse(s: &str) -> Result<Self, FactorError> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Factor::ALL
            .iter()
            .copied()
            .find(|f| f.key().eq_ignore_ascii_case(&normalized))
            .ok_or_else(|| FactorError::UnknownFactor(s.trim().to_string()))
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Factor {
    type Err = FactorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Factor::parse(s)
    }
}

/// Bring a value into [0, 1]. NaN maps to 0 so the result is always finite.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// The twelve normalized inputs to the scoring function.
///
/// Serialized with camelCase keys matching [`Factor::key`]. A freshly created
/// set holds the midpoint (0.5) for every factor, and keys missing from a
/// deserialized set take the midpoint too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FactorSet {
    pub market_size: f64,
    pub barrier_to_entry: f64,
    pub defensibility: f64,
    pub insight_factor: f64,
    pub complexity: f64,
    pub risk_factor: f64,
    pub team_factor: f64,
    pub market_timing: f64,
    pub competition_intensity: f64,
    pub capital_efficiency: f64,
    pub distribution_advantage: f64,
    pub business_model_viability: f64,
}

impl Default for FactorSet {
    fn default() -> Self {
        Self::uniform(0.5)
    }
}

impl FactorSet {
    /// A set with every factor at the same value.
    pub const fn uniform(value: f64) -> Self {
        Self {
            market_size: value,
            barrier_to_entry: value,
            defensibility: value,
            insight_factor: value,
            complexity: value,
            risk_factor: value,
            team_factor: value,
            market_timing: value,
            competition_intensity: value,
            capital_efficiency: value,
            distribution_advantage: value,
            business_model_viability: value,
        }
    }

    pub fn get(&self, factor: Factor) -> f64 {
        match factor {
            Factor::MarketSize => self.market_size,
            Factor::BarrierToEntry => self.barrier_to_entry,
            Factor::Defensibility => self.defensibility,
            Factor::InsightFactor => self.insight_factor,
            Factor::Complexity => self.complexity,
            Factor::RiskFactor => self.risk_factor,
            Factor::TeamFactor => self.team_factor,
            Factor::MarketTiming => self.market_timing,
            Factor::CompetitionIntensity => self.competition_intensity,
            Factor::CapitalEfficiency => self.capital_efficiency,
            Factor::DistributionAdvantage => self.distribution_advantage,
            Factor::BusinessModelViability => self.business_model_viability,
        }
    }

    fn slot(&mut self, factor: Factor) -> &mut f64 {
        match factor {
            Factor::MarketSize => &mut self.market_size,
            Factor::BarrierToEntry => &mut self.barrier_to_entry,
            Factor::Defensibility => &mut self.defensibility,
            Factor::InsightFactor => &mut self.insight_factor,
            Factor::Complexity => &mut self.complexity,
            Factor::RiskFactor => &mut self.risk_factor,
            Factor::TeamFactor => &mut self.team_factor,
            Factor::MarketTiming => &mut self.market_timing,
            Factor::CompetitionIntensity => &mut self.competition_intensity,
            Factor::CapitalEfficiency => &mut self.capital_efficiency,
            Factor::DistributionAdvantage => &mut self.distribution_advantage,
            Factor::BusinessModelViability => &mut self.business_model_viability,
        }
    }

    /// Set one factor, clamping the value into [0, 1].
    pub fn set(&mut self, factor: Factor, value: f64) {
        *self.slot(factor) = clamp_unit(value);
    }

    /// Builder form of [`FactorSet::set`].
    pub fn with(mut self, factor: Factor, value: f64) -> Self {
        self.set(factor, value);
        self
    }

    /// Iterate `(factor, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.iter().map(move |f| (*f, self.get(*f)))
    }

    /// Copy of this set with every value clamped into [0, 1].
    pub fn clamped(&self) -> Self {
        let mut out = *self;
        for factor in Factor::ALL {
            let value = out.get(factor);
            *out.slot(factor) = clamp_unit(value);
        }
        out
    }

    /// Check a single factor value against the scoring domain.
    pub fn check(factor: Factor, value: f64) -> Result<(), FactorError> {
        if !value.is_finite() {
            Err(FactorError::NotFinite { factor, value })
        } else if !(0.0..=1.0).contains(&value) {
            Err(FactorError::OutOfRange { factor, value })
        } else {
            Ok(())
        }
    }

    /// True when every factor is exactly zero.
    pub fn is_all_zero(&self) -> bool {
        self.iter().all(|(_, v)| v == 0.0)
    }
}

/// Parse a `factor=value` assignment as given on the command line.
pub fn parse_assignment(s: &str) -> Result<(Factor, f64)> {
    let Some((name, value)) = s.split_once('=') else {
        bail!("expected factor=value, got '{}'", s)
    };
    let factor = Factor::parse(name)?;
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("invalid value for {}: '{}'", factor, value.trim()))?;
    FactorSet::check(factor, value)?;
    Ok((factor, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_factor_camel_case() {
        assert_eq!(Factor::parse("marketSize").unwrap(), Factor::MarketSize);
        assert_eq!(
            Factor::parse("businessModelViability").unwrap(),
            Factor::BusinessModelViability
        );
    }

    #[test]
    fn test_parse_factor_snake_and_kebab() {
        assert_eq!(Factor::parse("risk_factor").unwrap(), Factor::RiskFactor);
        assert_eq!(
            Factor::parse("COMPETITION-INTENSITY").unwrap(),
            Factor::CompetitionIntensity
        );
    }

    #[test]
    fn test_parse_factor_unknown() {
        let err = Factor::parse("vibes").unwrap_err();
        assert_eq!(err, FactorError::UnknownFactor("vibes".to_string()));
    }

    #[test]
    fn test_keys_roundtrip_through_parse() {
        for factor in Factor::ALL {
            assert_eq!(Factor::parse(factor.key()).unwrap(), factor);
        }
    }

    #[test]
    fn test_polarity_table() {
        let complemented: Vec<_> = Factor::ALL
            .iter()
            .filter(|f| f.polarity() == Polarity::Complemented)
            .collect();
        assert_eq!(
            complemented,
            vec![
                &Factor::Complexity,
                &Factor::RiskFactor,
                &Factor::CompetitionIntensity
            ]
        );
        assert_eq!(Factor::MarketTiming.polarity(), Polarity::Timing);
    }

    #[test]
    fn test_weights_sum() {
        let total: f64 = Factor::ALL.iter().map(|f| f.weight()).sum();
        assert!((total - 13.2).abs() < 1e-9);
    }

    #[test]
    fn test_default_is_midpoint() {
        let set = FactorSet::default();
        assert!(set.iter().all(|(_, v)| v == 0.5));
        assert_eq!(set.iter().count(), 12);
    }

    #[test]
    fn test_set_clamps() {
        let mut set = FactorSet::default();
        set.set(Factor::TeamFactor, 1.7);
        set.set(Factor::RiskFactor, -0.3);
        set.set(Factor::Complexity, f64::NAN);
        assert_eq!(set.team_factor, 1.0);
        assert_eq!(set.risk_factor, 0.0);
        assert_eq!(set.complexity, 0.0);
    }

    #[test]
    fn test_clamped_leaves_valid_values() {
        let mut set = FactorSet::uniform(0.3);
        set.market_size = 4.0;
        set.market_timing = f64::NEG_INFINITY;
        let clamped = set.clamped();
        assert_eq!(clamped.market_size, 1.0);
        assert_eq!(clamped.market_timing, 0.0);
        assert_eq!(clamped.team_factor, 0.3);
    }

    #[test]
    fn test_check_rejects_bad_values() {
        assert!(FactorSet::check(Factor::MarketSize, 0.0).is_ok());
        assert!(FactorSet::check(Factor::MarketSize, 1.0).is_ok());
        assert!(matches!(
            FactorSet::check(Factor::MarketSize, 1.01),
            Err(FactorError::OutOfRange { .. })
        ));
        assert!(matches!(
            FactorSet::check(Factor::MarketSize, f64::INFINITY),
            Err(FactorError::NotFinite { .. })
        ));
    }

    #[test]
    fn test_serde_uses_camel_case_keys() {
        let json = serde_json::to_value(FactorSet::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 12);
        for factor in Factor::ALL {
            assert!(obj.contains_key(factor.key()), "missing {}", factor.key());
        }
    }

    #[test]
    fn test_serde_rejects_unknown_key() {
        let yaml = r#"
marketSize: 0.5
barrierToEntry: 0.5
defensibility: 0.5
insightFactor: 0.5
complexity: 0.5
riskFactor: 0.5
teamFactor: 0.5
marketTiming: 0.5
competitionIntensity: 0.5
capitalEfficiency: 0.5
distributionAdvantage: 0.5
businessModelViability: 0.5
hype: 1.0
"#;
        assert!(serde_saphyr::from_str::<FactorSet>(yaml).is_err());
    }

    #[test]
    fn test_partial_set_fills_midpoint() {
        let set: FactorSet = serde_saphyr::from_str("marketSize: 0.9\nriskFactor: 0.2\n").unwrap();
        assert_eq!(set.market_size, 0.9);
        assert_eq!(set.risk_factor, 0.2);
        assert_eq!(set.barrier_to_entry, 0.5);
        assert_eq!(set.business_model_viability, 0.5);

        let set: FactorSet = serde_json::from_str(r#"{"teamFactor": 1.0}"#).unwrap();
        assert_eq!(set, FactorSet::default().with(Factor::TeamFactor, 1.0));
    }

    #[test]
    fn test_parse_assignment() {
        let (factor, value) = parse_assignment("team_factor=0.9").unwrap();
        assert_eq!(factor, Factor::TeamFactor);
        assert_eq!(value, 0.9);

        assert!(parse_assignment("teamFactor").is_err());
        assert!(parse_assignment("teamFactor=high").is_err());
        assert!(parse_assignment("teamFactor=1.5").is_err());
        assert!(parse_assignment("nope=0.5").is_err());
    }

    #[test]
    fn test_is_all_zero() {
        assert!(FactorSet::uniform(0.0).is_all_zero());
        assert!(!FactorSet::uniform(0.0)
            .with(Factor::MarketSize, 0.1)
            .is_all_zero());
    }
}

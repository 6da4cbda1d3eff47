use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How `marketTiming` is adjusted before weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingMode {
    /// Five-band remap: timing is best in the middle of the scale and
    /// penalized at both extremes.
    #[default]
    Piecewise,
    /// Raw value enters the weighted sum unchanged.
    PassThrough,
}

impl TimingMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TimingMode::Piecewise => "piecewise",
            TimingMode::PassThrough => "pass_through",
        }
    }
}

impl fmt::Display for TimingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimingMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "piecewise" => Ok(TimingMode::Piecewise),
            "pass_through" | "passthrough" | "raw" => Ok(TimingMode::PassThrough),
            other => anyhow::bail!(
                "unknown market timing mode '{}' (expected piecewise or pass_through)",
                other
            ),
        }
    }
}

/// Scoring configuration.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   market_timing: pass_through
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Market timing transform (default: piecewise)
    #[serde(default)]
    pub market_timing: Option<TimingMode>,
}

impl ScoringConfig {
    pub fn with_timing(mode: TimingMode) -> Self {
        Self {
            market_timing: Some(mode),
        }
    }

    pub fn timing_mode(&self) -> TimingMode {
        self.market_timing.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();
        assert!(config.market_timing.is_none());
        assert_eq!(config.timing_mode(), TimingMode::Piecewise);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::with_timing(TimingMode::PassThrough);
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_parse_timing_yaml() {
        let config: ScoringConfig = serde_saphyr::from_str("market_timing: pass_through").unwrap();
        assert_eq!(config.timing_mode(), TimingMode::PassThrough);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.market_timing.is_none());
    }

    #[test]
    fn test_unknown_timing_rejected() {
        assert!(serde_saphyr::from_str::<ScoringConfig>("market_timing: sideways").is_err());
        assert!(serde_saphyr::from_str::<ScoringConfig>("weights: {}").is_err());
    }

    #[test]
    fn test_timing_from_str() {
        assert_eq!("piecewise".parse::<TimingMode>().unwrap(), TimingMode::Piecewise);
        assert_eq!("pass-through".parse::<TimingMode>().unwrap(), TimingMode::PassThrough);
        assert_eq!("PassThrough".parse::<TimingMode>().unwrap(), TimingMode::PassThrough);
        assert!("linear".parse::<TimingMode>().is_err());
    }
}

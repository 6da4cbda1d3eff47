//! Decoding of factor payloads produced by the document-analysis pipeline.
//!
//! The pipeline reports a JSON object of factor values. Any factor it found no
//! evidence for is zero, so missing keys decode to 0 rather than the midpoint.

use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::debug;

use crate::scoring::{Factor, FactorSet};

/// Outcome of analysing a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    PitchDeck(FactorSet),
    NotPitchDeck,
}

impl Extraction {
    pub fn factors(&self) -> Option<&FactorSet> {
        match self {
            Extraction::PitchDeck(f) => Some(f),
            Extraction::NotPitchDeck => None,
        }
    }
}

/// Decode a JSON payload.
///
/// Factor values may sit at the top level or under a `parameters` object.
/// An explicit `isPitchDeck` flag wins; without one, a payload whose factors
/// are all zero is read as "not a pitch deck".
pub fn decode_payload(json: &str) -> Result<Extraction> {
    let value: Value = serde_json::from_str(json).context("Failed to parse analysis payload")?;
    let Value::Object(root) = value else {
        bail!("analysis payload must be a JSON object")
    };

    let flag = pitch_deck_flag(&root)?;
    let params = match root.get("parameters") {
        Some(Value::Object(inner)) => inner,
        Some(_) => bail!("'parameters' must be a JSON object"),
        None => &root,
    };

    let factors = decode_factors(params)?;

    let extraction = match flag {
        Some(false) => Extraction::NotPitchDeck,
        Some(true) => Extraction::PitchDeck(factors),
        None if factors.is_all_zero() => Extraction::NotPitchDeck,
        None => Extraction::PitchDeck(factors),
    };
    debug!(
        explicit_flag = ?flag,
        pitch_deck = extraction.factors().is_some(),
        "decoded analysis payload"
    );
    Ok(extraction)
}

fn pitch_deck_flag(root: &Map<String, Value>) -> Result<Option<bool>> {
    match root.get("isPitchDeck").or_else(|| root.get("is_pitch_deck")) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => bail!("isPitchDeck must be a boolean, got {}", other),
    }
}

/// Keys may use any spelling `Factor::parse` accepts. Two spellings of the
/// same factor must agree on the value.
fn decode_factors(params: &Map<String, Value>) -> Result<FactorSet> {
    let mut factors = FactorSet::uniform(0.0);
    let mut seen: HashMap<Factor, (&str, f64)> = HashMap::new();

    for (key, value) in params {
        let Ok(factor) = Factor::parse(key) else {
            continue;
        };
        let number = match value {
            Value::Null => 0.0,
            Value::Number(n) => n
                .as_f64()
                .with_context(|| format!("{}: value is not representable", factor))?,
            other => bail!("{}: expected a number, got {}", factor, other),
        };
        if let Some((first_key, first)) = seen.get(&factor) {
            if *first != number {
                bail!(
                    "{}: conflicting values {} ('{}') and {} ('{}')",
                    factor,
                    first,
                    first_key,
                    number,
                    key
                );
            }
        }
        seen.insert(factor, (key.as_str(), number));
        factors.set(factor, number);
    }

    let matched = seen.len();
    debug!(matched, missing = Factor::ALL.len() - matched, "decoded factors");
    Ok(factors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_payload() {
        let json = r#"{
            "marketSize": 0.8, "barrierToEntry": 0.6, "defensibility": 0.8,
            "insightFactor": 0.8, "complexity": 0.4, "riskFactor": 0.3,
            "teamFactor": 0.9, "marketTiming": 0.8, "competitionIntensity": 0.4,
            "capitalEfficiency": 0.9, "distributionAdvantage": 0.9,
            "businessModelViability": 0.9
        }"#;
        let extraction = decode_payload(json).unwrap();
        let factors = extraction.factors().unwrap();
        assert_eq!(factors.team_factor, 0.9);
        assert_eq!(factors.risk_factor, 0.3);
    }

    #[test]
    fn test_missing_factors_are_zero() {
        let extraction = decode_payload(r#"{"marketSize": 0.7}"#).unwrap();
        let factors = extraction.factors().unwrap();
        assert_eq!(factors.market_size, 0.7);
        assert_eq!(factors.team_factor, 0.0);
        assert_eq!(factors.market_timing, 0.0);
    }

    #[test]
    fn test_legacy_all_zero_is_not_pitch_deck() {
        assert_eq!(decode_payload("{}").unwrap(), Extraction::NotPitchDeck);
        assert_eq!(
            decode_payload(r#"{"marketSize": 0, "teamFactor": 0.0}"#).unwrap(),
            Extraction::NotPitchDeck
        );
    }

    #[test]
    fn test_explicit_flag_wins() {
        let weak = decode_payload(r#"{"isPitchDeck": true}"#).unwrap();
        assert_eq!(weak, Extraction::PitchDeck(FactorSet::uniform(0.0)));

        let rejected = decode_payload(r#"{"isPitchDeck": false, "marketSize": 0.9}"#).unwrap();
        assert_eq!(rejected, Extraction::NotPitchDeck);
    }

    #[test]
    fn test_nested_parameters_and_snake_case() {
        let json = r#"{
            "is_pitch_deck": true,
            "parameters": {"team_factor": 0.75, "notes": "strong founders"}
        }"#;
        let extraction = decode_payload(json).unwrap();
        assert_eq!(extraction.factors().unwrap().team_factor, 0.75);
    }

    #[test]
    fn test_values_are_clamped() {
        let json = r#"{"marketSize": 1.4, "riskFactor": -0.2, "teamFactor": 0.5}"#;
        let extraction = decode_payload(json).unwrap();
        let factors = extraction.factors().unwrap();
        assert_eq!(factors.market_size, 1.0);
        assert_eq!(factors.risk_factor, 0.0);
    }

    #[test]
    fn test_duplicate_aliases() {
        let agreeing = decode_payload(r#"{"marketSize": 0.6, "market_size": 0.6}"#).unwrap();
        assert_eq!(agreeing.factors().unwrap().market_size, 0.6);

        let err = decode_payload(r#"{"marketSize": 0.6, "market_size": 0.9}"#).unwrap_err();
        assert!(err.to_string().contains("conflicting values"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(decode_payload("not json").is_err());
        assert!(decode_payload("[0.5, 0.5]").is_err());
        assert!(decode_payload(r#"{"marketSize": "high"}"#).is_err());
        assert!(decode_payload(r#"{"isPitchDeck": "yes"}"#).is_err());
        assert!(decode_payload(r#"{"parameters": 3}"#).is_err());
    }
}

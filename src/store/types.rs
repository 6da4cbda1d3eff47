use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::scoring::{clamp_unit, compute_score_with, FactorSet, TimingMode};

pub const STORE_VERSION: u32 = 1;

/// A named startup with its factors and score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupRecord {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub factors: FactorSet,
    /// Score computed from `factors` with `timing`
    pub score: f64,
    pub timing: TimingMode,
    /// Set when the user replaced the computed score by hand
    #[serde(default)]
    pub score_edited: bool,
    #[serde(default)]
    pub manual_score: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StartupRecord {
    /// The score to display: the manual override if the user set one.
    pub fn effective_score(&self) -> f64 {
        match (self.score_edited, self.manual_score) {
            (true, Some(manual)) => manual,
            _ => self.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupStore {
    pub version: u32,
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub startups: Vec<StartupRecord>,
}

impl Default for StartupStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupStore {
    /// Create a new empty store with the current version
    pub fn new() -> Self {
        Self {
            version: STORE_VERSION,
            next_id: 1,
            startups: Vec::new(),
        }
    }

    /// Add a startup and compute its score. Names are unique, case-insensitively.
    pub fn add(
        &mut self,
        name: &str,
        description: Option<String>,
        factors: FactorSet,
        timing: TimingMode,
    ) -> Result<u64> {
        let name = name.trim();
        if name.is_empty() {
            bail!("startup name must not be empty");
        }
        if self.find(name).is_some() {
            bail!("a startup named '{}' already exists", name);
        }

        let factors = factors.clamped();
        let now = Utc::now();
        let id = self.allocate_id();

        self.startups.push(StartupRecord {
            id,
            name: name.to_string(),
            description,
            factors,
            score: compute_score_with(&factors, timing),
            timing,
            score_edited: false,
            manual_score: None,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    /// Next free id. A store loaded without `next_id` still never reuses an
    /// existing id.
    fn allocate_id(&mut self) -> u64 {
        let after_existing = self.startups.iter().map(|s| s.id + 1).max().unwrap_or(1);
        let id = self.next_id.max(after_existing).max(1);
        self.next_id = id + 1;
        id
    }

    pub fn get(&self, id: u64) -> Option<&StartupRecord> {
        self.startups.iter().find(|s| s.id == id)
    }

    /// Find a startup by case-insensitive name
    pub fn find(&self, name: &str) -> Option<&StartupRecord> {
        let name = name.trim();
        self.startups
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    fn find_mut(&mut self, name: &str) -> Result<&mut StartupRecord> {
        let name = name.trim();
        match self
            .startups
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(name))
        {
            Some(record) => Ok(record),
            None => bail!("no startup named '{}'", name),
        }
    }

    /// Replace a startup's factors and recompute its score. A new description,
    /// when given, replaces the old one. A manual override, if any, stays in place.
    pub fn update_factors(
        &mut self,
        name: &str,
        description: Option<String>,
        factors: FactorSet,
        timing: TimingMode,
    ) -> Result<()> {
        let record = self.find_mut(name)?;
        if description.is_some() {
            record.description = description;
        }
        record.factors = factors.clamped();
        record.timing = timing;
        record.score = compute_score_with(&record.factors, timing);
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Hand-edit the displayed score. The value is clamped into [0, 1].
    pub fn override_score(&mut self, name: &str, score: f64) -> Result<()> {
        let record = self.find_mut(name)?;
        record.manual_score = Some(clamp_unit(score));
        record.score_edited = true;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Drop a manual override and go back to the computed score.
    pub fn clear_override(&mut self, name: &str) -> Result<()> {
        let record = self.find_mut(name)?;
        record.manual_score = None;
        record.score_edited = false;
        record.updated_at = Utc::now();
        Ok(())
    }

    /// Remove a startup. Returns true if it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        let name = name.trim();
        let before = self.startups.len();
        self.startups.retain(|s| !s.name.eq_ignore_ascii_case(name));
        self.startups.len() != before
    }

    /// Startups sorted by effective score descending, then by name.
    pub fn ranked(&self) -> Vec<&StartupRecord> {
        let mut ranked: Vec<&StartupRecord> = self.startups.iter().collect();
        ranked.sort_by(|a, b| {
            b.effective_score()
                .partial_cmp(&a.effective_score())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::Factor;

    fn store_with(names: &[(&str, f64)]) -> StartupStore {
        let mut store = StartupStore::new();
        for (name, value) in names {
            store
                .add(name, None, FactorSet::uniform(*value), TimingMode::Piecewise)
                .unwrap();
        }
        store
    }

    #[test]
    fn test_new_store_empty() {
        let store = StartupStore::new();
        assert_eq!(store.version, STORE_VERSION);
        assert!(store.startups.is_empty());
    }

    #[test]
    fn test_add_computes_score() {
        let mut store = StartupStore::new();
        let id = store
            .add(
                "Acme",
                Some("Rockets".to_string()),
                FactorSet::default(),
                TimingMode::Piecewise,
            )
            .unwrap();
        let record = store.get(id).unwrap();
        assert_eq!(record.name, "Acme");
        assert!((record.score - 0.55).abs() < 1e-9);
        assert!(!record.score_edited);
        assert_eq!(record.effective_score(), record.score);
    }

    #[test]
    fn test_ids_increase() {
        let store = store_with(&[("a", 0.5), ("b", 0.5)]);
        assert_eq!(store.startups[0].id, 1);
        assert_eq!(store.startups[1].id, 2);
    }

    #[test]
    fn test_duplicate_and_empty_names_rejected() {
        let mut store = store_with(&[("Acme", 0.5)]);
        assert!(store
            .add("ACME", None, FactorSet::default(), TimingMode::Piecewise)
            .is_err());
        assert!(store
            .add("   ", None, FactorSet::default(), TimingMode::Piecewise)
            .is_err());
    }

    #[test]
    fn test_add_clamps_factors() {
        let mut store = StartupStore::new();
        let mut factors = FactorSet::default();
        factors.market_size = 3.0;
        store.add("Acme", None, factors, TimingMode::Piecewise).unwrap();
        assert_eq!(store.find("acme").unwrap().factors.market_size, 1.0);
    }

    #[test]
    fn test_update_factors_recomputes() {
        let mut store = store_with(&[("Acme", 0.5)]);
        let before = store.find("Acme").unwrap().score;
        let better = FactorSet::default().with(Factor::TeamFactor, 1.0);
        store
            .update_factors("acme", None, better, TimingMode::Piecewise)
            .unwrap();
        let record = store.find("Acme").unwrap();
        assert!(record.score > before);
        assert_eq!(record.factors.team_factor, 1.0);
    }

    #[test]
    fn test_update_replaces_description() {
        let mut store = StartupStore::new();
        store
            .add(
                "Acme",
                Some("old desc".to_string()),
                FactorSet::default(),
                TimingMode::Piecewise,
            )
            .unwrap();

        let factors = FactorSet::default().with(Factor::TeamFactor, 0.9);
        store
            .update_factors(
                "Acme",
                Some("new desc".to_string()),
                factors,
                TimingMode::Piecewise,
            )
            .unwrap();
        let record = store.find("Acme").unwrap();
        assert_eq!(record.description.as_deref(), Some("new desc"));

        store
            .update_factors("Acme", None, factors, TimingMode::Piecewise)
            .unwrap();
        let record = store.find("Acme").unwrap();
        assert_eq!(record.description.as_deref(), Some("new desc"));
    }

    #[test]
    fn test_add_after_load_without_next_id() {
        let mut store = StartupStore::new();
        store
            .add("Acme", None, FactorSet::default(), TimingMode::Piecewise)
            .unwrap();
        let mut json = serde_json::to_value(&store).unwrap();
        json.as_object_mut().unwrap().remove("next_id");

        let mut loaded: StartupStore = serde_json::from_value(json).unwrap();
        assert_eq!(loaded.next_id, 0);

        let id = loaded
            .add("Beta", None, FactorSet::default(), TimingMode::Piecewise)
            .unwrap();
        assert_eq!(id, 2);
        assert_eq!(loaded.get(1).unwrap().name, "Acme");
        assert_eq!(loaded.get(2).unwrap().name, "Beta");
    }

    #[test]
    fn test_ids_not_reused_after_remove_of_last() {
        let mut store = StartupStore::new();
        store.add("a", None, FactorSet::default(), TimingMode::Piecewise).unwrap();
        store.add("b", None, FactorSet::default(), TimingMode::Piecewise).unwrap();
        store.remove("b");
        let id = store
            .add("c", None, FactorSet::default(), TimingMode::Piecewise)
            .unwrap();
        assert_eq!(id, 3);
    }

    #[test]
    fn test_override_and_clear() {
        let mut store = store_with(&[("Acme", 0.5)]);
        store.override_score("Acme", 1.4).unwrap();
        let record = store.find("Acme").unwrap();
        assert!(record.score_edited);
        assert_eq!(record.effective_score(), 1.0);

        // Recomputing keeps the override
        store
            .update_factors("Acme", None, FactorSet::uniform(0.2), TimingMode::Piecewise)
            .unwrap();
        assert_eq!(store.find("Acme").unwrap().effective_score(), 1.0);

        store.clear_override("Acme").unwrap();
        let record = store.find("Acme").unwrap();
        assert!(!record.score_edited);
        assert_eq!(record.effective_score(), record.score);
    }

    #[test]
    fn test_missing_name_errors() {
        let mut store = StartupStore::new();
        assert!(store.override_score("ghost", 0.5).is_err());
        assert!(store
            .update_factors("ghost", None, FactorSet::default(), TimingMode::Piecewise)
            .is_err());
    }

    #[test]
    fn test_remove() {
        let mut store = store_with(&[("Acme", 0.5), ("Beta", 0.5)]);
        assert!(store.remove("acme"));
        assert!(!store.remove("acme"));
        assert_eq!(store.startups.len(), 1);
    }

    #[test]
    fn test_ranked_order() {
        let mut store = store_with(&[("zeta", 0.5), ("Alpha", 0.5), ("low", 0.1)]);
        store
            .add("top", None, FactorSet::uniform(0.9), TimingMode::PassThrough)
            .unwrap();
        let names: Vec<_> = store.ranked().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["top", "Alpha", "zeta", "low"]);
    }
}

use crate::scoring::FactorSet;

/// A built-in example factor set a user can copy as a starting point.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    pub name: &'static str,
    pub summary: &'static str,
    pub factors: FactorSet,
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Midpoint",
        summary: "Every factor at 0.5; the default for a new startup",
        factors: FactorSet::uniform(0.5),
    },
    Preset {
        name: "Reference fixture",
        summary: "Strong team and model in a large market, slightly late timing",
        factors: FactorSet {
            market_size: 0.8,
            barrier_to_entry: 0.6,
            defensibility: 0.8,
            insight_factor: 0.8,
            complexity: 0.4,
            risk_factor: 0.3,
            team_factor: 0.9,
            market_timing: 0.8,
            competition_intensity: 0.4,
            capital_efficiency: 0.9,
            distribution_advantage: 0.9,
            business_model_viability: 0.9,
        },
    },
    Preset {
        name: "Bootstrapped SaaS",
        summary: "Niche B2B tool, profitable early, limited moat",
        factors: FactorSet {
            market_size: 0.4,
            barrier_to_entry: 0.3,
            defensibility: 0.4,
            insight_factor: 0.5,
            complexity: 0.3,
            risk_factor: 0.2,
            team_factor: 0.6,
            market_timing: 0.6,
            competition_intensity: 0.6,
            capital_efficiency: 0.9,
            distribution_advantage: 0.4,
            business_model_viability: 0.8,
        },
    },
    Preset {
        name: "Deep tech moonshot",
        summary: "Breakthrough insight and huge market, very hard and very early",
        factors: FactorSet {
            market_size: 1.0,
            barrier_to_entry: 0.9,
            defensibility: 0.9,
            insight_factor: 0.9,
            complexity: 0.95,
            risk_factor: 0.9,
            team_factor: 0.8,
            market_timing: 0.15,
            competition_intensity: 0.2,
            capital_efficiency: 0.2,
            distribution_advantage: 0.3,
            business_model_viability: 0.4,
        },
    },
    Preset {
        name: "Crowded consumer app",
        summary: "Easy to build and easy to copy, in a saturated market",
        factors: FactorSet {
            market_size: 0.7,
            barrier_to_entry: 0.1,
            defensibility: 0.2,
            insight_factor: 0.2,
            complexity: 0.2,
            risk_factor: 0.5,
            team_factor: 0.5,
            market_timing: 0.95,
            competition_intensity: 0.95,
            capital_efficiency: 0.4,
            distribution_advantage: 0.3,
            business_model_viability: 0.3,
        },
    },
];

/// Find a preset by case-insensitive name.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

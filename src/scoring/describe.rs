//! Display labels, tooltips and qualitative band text for each factor.

use super::factors::{clamp_unit, Factor, FactorError};

struct FactorText {
    label: &'static str,
    tooltip: &'static str,
    bands: [&'static str; 5],
}

fn text(factor: Factor) -> &'static FactorText {
    match factor {
        Factor::MarketSize => &FactorText {
            label: "Market Size",
            tooltip: "How large the addressable market is and how fast it is growing.",
            bands: [
                "Tiny niche market",
                "Small market with limited growth",
                "Moderate market opportunity",
                "Large, growing market",
                "Massive market opportunity",
            ],
        },
        Factor::BarrierToEntry => &FactorText {
            label: "Barrier to Entry",
            tooltip: "How hard it is for a new competitor to start offering the same thing.",
            bands: [
                "Anyone can enter",
                "Low barriers to entry",
                "Moderate barriers to entry",
                "High barriers to entry",
                "Nearly impossible to enter",
            ],
        },
        Factor::Defensibility => &FactorText {
            label: "Defensibility",
            tooltip: "How well the business can protect its position through IP, network effects or lock-in.",
            bands: [
                "Easily copied",
                "Weak defensibility",
                "Some defensible advantages",
                "Strong moat",
                "Exceptionally defensible",
            ],
        },
        Factor::InsightFactor => &FactorText {
            label: "Insight Factor",
            tooltip: "How unique and non-obvious the founding insight is.",
            bands: [
                "Common knowledge",
                "Incremental insight",
                "Interesting insight",
                "Non-obvious insight",
                "Contrarian, breakthrough insight",
            ],
        },
        Factor::Complexity => &FactorText {
            label: "Complexity",
            tooltip: "How technically and operationally hard the product is to build and run. Higher is worse.",
            bands: [
                "Very simple to execute",
                "Manageable complexity",
                "Moderately complex",
                "Highly complex",
                "Extremely complex",
            ],
        },
        Factor::RiskFactor => &FactorText {
            label: "Risk Factor",
            tooltip: "Combined regulatory, technical and market risk. Higher is worse.",
            bands: [
                "Minimal risk",
                "Low risk",
                "Moderate risk",
                "High risk",
                "Extreme risk",
            ],
        },
        Factor::TeamFactor => &FactorText {
            label: "Team Strength",
            tooltip: "Experience, domain expertise and track record of the founding team.",
            bands: [
                "Inexperienced team",
                "Developing team",
                "Capable team",
                "Strong, experienced team",
                "Exceptional, proven team",
            ],
        },
        Factor::MarketTiming => &FactorText {
            label: "Market Timing",
            tooltip: "Whether the market is ready now. Too early and too late are both penalized.",
            bands: [
                "Far too early",
                "Early, market still forming",
                "Well timed",
                "Late, market maturing",
                "Too late, market saturated",
            ],
        },
        Factor::CompetitionIntensity => &FactorText {
            label: "Competition Intensity",
            tooltip: "How crowded and aggressive the competitive landscape is. Higher is worse.",
            bands: [
                "No meaningful competition",
                "Light competition",
                "Moderate competition",
                "Intense competition",
                "Saturated, cutthroat market",
            ],
        },
        Factor::CapitalEfficiency => &FactorText {
            label: "Capital Efficiency",
            tooltip: "How much progress the business makes per dollar invested.",
            bands: [
                "Burns capital with little progress",
                "Capital intensive",
                "Average capital efficiency",
                "Capital efficient",
                "Exceptionally capital efficient",
            ],
        },
        Factor::DistributionAdvantage => &FactorText {
            label: "Distribution Advantage",
            tooltip: "Access to channels, partners or audiences that make customer acquisition cheap.",
            bands: [
                "No distribution channel",
                "Weak distribution",
                "Some distribution channels",
                "Strong distribution advantage",
                "Dominant distribution",
            ],
        },
        Factor::BusinessModelViability => &FactorText {
            label: "Business Model Viability",
            tooltip: "Whether unit economics and pricing support a sustainable business.",
            bands: [
                "No viable business model",
                "Unproven business model",
                "Plausible business model",
                "Proven business model",
                "Highly profitable business model",
            ],
        },
    }
}

/// Five qualitative bands: `<=0.2`, `<=0.4`, `<=0.6`, `<=0.8`, `>0.8`.
pub fn band_index(value: f64) -> usize {
    let value = clamp_unit(value);
    if value <= 0.2 {
        0
    } else if value <= 0.4 {
        1
    } else if value <= 0.6 {
        2
    } else if value <= 0.8 {
        3
    } else {
        4
    }
}

impl Factor {
    pub fn label(self) -> &'static str {
        text(self).label
    }

    pub fn tooltip(self) -> &'static str {
        text(self).tooltip
    }

    /// Qualitative description of `value` for this factor.
    pub fn describe(self, value: f64) -> &'static str {
        text(self).bands[band_index(value)]
    }

    /// All five band descriptions, lowest first.
    pub fn bands(self) -> &'static [&'static str; 5] {
        &text(self).bands
    }
}

/// Look up the band description for a factor given by name.
pub fn describe_factor(name: &str, value: f64) -> Result<&'static str, FactorError> {
    Ok(Factor::parse(name)?.describe(value))
}

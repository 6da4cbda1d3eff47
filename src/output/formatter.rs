use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::extraction::Extraction;
use crate::presets::Preset;
use crate::scoring::{calculate_with_mode, Factor, ScoreResult, TimingMode};
use crate::store::StartupRecord;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score in [0, 1] as a percentage with one decimal ("86.3%").
/// If edited is true, appends asterisk to mark a hand-edited score.
pub fn format_score(score: f64, edited: bool) -> String {
    let formatted = format!("{:.1}%", score * 100.0);
    if edited {
        format!("{}*", formatted)
    } else {
        formatted
    }
}

fn colorize_score(text: &str, score: f64, use_colors: bool) -> String {
    if !use_colors {
        text.to_string()
    } else if score >= 0.7 {
        text.green().bold().to_string()
    } else if score >= 0.4 {
        text.yellow().bold().to_string()
    } else {
        text.red().bold().to_string()
    }
}

/// One-line summary: "SSI: 86.3% (pass_through timing)"
pub fn format_score_line(result: &ScoreResult, use_colors: bool) -> String {
    let score = format_score(result.score, false);
    let mut line = format!(
        "SSI: {} ({} timing)",
        colorize_score(&score, result.score, use_colors),
        result.breakdown.timing
    );
    if result.sanitized {
        line.push_str(" [inputs clamped]");
    }
    line
}

/// Per-factor table: label, raw value, adjusted value, weight, contribution, band text.
pub fn format_breakdown(result: &ScoreResult, use_colors: bool) -> String {
    let label_width = Factor::ALL
        .iter()
        .map(|f| f.label().len())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = result
        .breakdown
        .factors
        .iter()
        .map(|c| {
            let label = format!("{:<width$}", c.factor.label(), width = label_width);
            let numbers = format!(
                "{:.2} -> {:.2}  x{:.1} = {:.3}",
                c.raw, c.adjusted, c.weight, c.contribution
            );
            let band = c.factor.describe(c.raw);
            if use_colors {
                format!("  {}  {}  {}", label.bold(), numbers, band.dimmed())
            } else {
                format!("  {}  {}  {}", label, numbers, band)
            }
        })
        .collect();

    lines.push(format!(
        "  Weighted sum {:.3} / 12 = {:.4} (clamped to {:.4})",
        result.breakdown.weighted_sum, result.raw_score, result.score
    ));
    lines.join("\n")
}

/// Label, tooltip and either the band for `value` or all five bands.
pub fn format_describe(factor: Factor, value: Option<f64>, use_colors: bool) -> String {
    let header = if use_colors {
        format!("{} ({})", factor.label().bold(), factor.key().cyan())
    } else {
        format!("{} ({})", factor.label(), factor.key())
    };
    let mut lines = vec![header, format!("  {}", factor.tooltip())];

    match value {
        Some(v) => lines.push(format!("  {:.2}: {}", v, factor.describe(v))),
        None => {
            let edges = ["<=0.2", "<=0.4", "<=0.6", "<=0.8", ">0.8"];
            for (edge, text) in edges.iter().zip(factor.bands()) {
                lines.push(format!("  {:>5}  {}", edge, text));
            }
        }
    }
    lines.join("\n")
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format saved startups as a ranked table: Index, Score, Name, Description.
/// Score column is right-aligned, 7 chars wide (fits "100.0%*")
pub fn format_ranked_table(records: &[&StartupRecord], use_colors: bool) -> String {
    if records.is_empty() {
        return "No startups saved.".to_string();
    }

    let term_width = get_terminal_width();
    let score_width = 7;
    let separator = "  ";

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let index_str = format!("{:>2}.", idx + 1);
            let score = record.effective_score();
            let score_str = format_score(score, record.score_edited);
            let score_padded = format!("{:>width$}", score_str, width = score_width);

            let mut text = record.name.clone();
            if let Some(ref desc) = record.description {
                text = format!("{} - {}", text, desc);
            }
            let fixed_width = 3 + 1 + score_width + separator.len();
            let text = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&text, width - fixed_width)
                }
                Some(_) => truncate_name(&text, 20),
                None => text,
            };

            if use_colors {
                format!(
                    "{} {}{}{}",
                    index_str.dimmed(),
                    colorize_score(&score_padded, score, true),
                    separator,
                    text
                )
            } else {
                format!("{} {}{}{}", index_str, score_padded, separator, text)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line detail for one saved startup.
pub fn format_record_detail(record: &StartupRecord, use_colors: bool) -> String {
    let result = calculate_with_mode(&record.factors, record.timing);
    let title = if use_colors {
        record.name.bold().to_string()
    } else {
        record.name.clone()
    };

    let mut lines = vec![title];
    if let Some(ref desc) = record.description {
        lines.push(format!("  {}", desc));
    }
    lines.push(format!(
        "  Score: {}",
        colorize_score(
            &format_score(record.effective_score(), record.score_edited),
            record.effective_score(),
            use_colors
        )
    ));
    if record.score_edited {
        lines.push(format!(
            "  Computed: {} (hand-edited)",
            format_score(record.score, false)
        ));
    }
    lines.push(format!(
        "  Updated: {}",
        record.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));
    lines.push(format_breakdown(&result, use_colors));
    lines.join("\n")
}

/// List presets with their score under `mode`.
pub fn format_presets(presets: &[Preset], mode: TimingMode, use_colors: bool) -> String {
    let name_width = presets.iter().map(|p| p.name.len()).max().unwrap_or(0);
    presets
        .iter()
        .map(|p| {
            let result = calculate_with_mode(&p.factors, mode);
            let score = format!("{:>6}", format_score(result.score, false));
            let name = format!("{:<width$}", p.name, width = name_width);
            if use_colors {
                format!(
                    "{}  {}  {}",
                    colorize_score(&score, result.score, true),
                    name.bold(),
                    p.summary.dimmed()
                )
            } else {
                format!("{}  {}  {}", score, name, p.summary)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// JSON document for a scored factor set (for scripting).
pub fn format_json(result: &ScoreResult) -> String {
    let factors: serde_json::Map<String, serde_json::Value> = result
        .breakdown
        .factors
        .iter()
        .map(|c| {
            (
                c.factor.key().to_string(),
                json!({
                    "value": c.raw,
                    "adjusted": c.adjusted,
                    "weight": c.weight,
                    "contribution": c.contribution,
                    "description": c.factor.describe(c.raw),
                }),
            )
        })
        .collect();

    let doc = json!({
        "score": result.score,
        "rawScore": result.raw_score,
        "weightedSum": result.breakdown.weighted_sum,
        "timing": result.breakdown.timing,
        "sanitized": result.sanitized,
        "factors": factors,
    });
    serde_json::to_string_pretty(&doc).unwrap_or_else(|_| doc.to_string())
}

/// Human-readable outcome of decoding an analysis payload.
pub fn format_extraction(extraction: &Extraction, mode: TimingMode, use_colors: bool) -> String {
    match extraction {
        Extraction::NotPitchDeck => {
            let msg = "This document does not look like a pitch deck.";
            if use_colors {
                msg.yellow().to_string()
            } else {
                msg.to_string()
            }
        }
        Extraction::PitchDeck(factors) => {
            let result = calculate_with_mode(factors, mode);
            format!(
                "{}\n{}",
                format_score_line(&result, use_colors),
                format_breakdown(&result, use_colors)
            )
        }
    }
}

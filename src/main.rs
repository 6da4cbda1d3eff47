use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use ssi::scoring::{Factor, FactorSet, ScoringConfig, TimingMode};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_CONFIG: i32 = 4;
const EXIT_STORAGE: i32 = 5;

#[derive(Args, Debug)]
struct FactorArgs {
    /// Start from a built-in preset (see `ssi presets`)
    #[arg(long, conflicts_with = "file")]
    preset: Option<String>,

    /// Load factors from a YAML or JSON file with camelCase keys; missing keys are 0.5
    #[arg(long)]
    file: Option<PathBuf>,

    /// Set one factor, e.g. `--set riskFactor=0.3` (repeatable)
    #[arg(long = "set", value_name = "FACTOR=VALUE", value_parser = parse_set)]
    set: Vec<(Factor, f64)>,

    /// Market timing transform: piecewise or pass_through (overrides config)
    #[arg(long, value_name = "MODE")]
    timing: Option<TimingMode>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a factor set (default: every factor at 0.5)
    Score {
        #[command(flatten)]
        factors: FactorArgs,

        /// Show the per-factor breakdown
        #[arg(short, long)]
        explain: bool,

        /// Print the result as JSON
        #[arg(long, conflicts_with = "explain")]
        json: bool,
    },
    /// Show a factor's label, tooltip and band descriptions
    Describe {
        /// Factor name (camelCase, snake_case or kebab-case)
        factor: String,

        /// Value to describe; omit to list all bands
        value: Option<f64>,
    },
    /// List built-in presets with their scores
    Presets {
        /// Market timing transform (overrides config)
        #[arg(long, value_name = "MODE")]
        timing: Option<TimingMode>,
    },
    /// Score a factor payload produced by document analysis
    Extract {
        /// Path to the JSON payload
        path: PathBuf,

        /// Market timing transform (overrides config)
        #[arg(long, value_name = "MODE")]
        timing: Option<TimingMode>,
    },
    /// Save a scored startup to the local store
    Save {
        /// Startup name (unique, case-insensitive)
        name: String,

        /// Short description
        #[arg(short, long)]
        description: Option<String>,

        /// Replace the factors of an existing startup instead of failing
        #[arg(long)]
        update: bool,

        #[command(flatten)]
        factors: FactorArgs,
    },
    /// List saved startups, best first
    List,
    /// Show one saved startup with its breakdown
    Show {
        name: String,
    },
    /// Hand-edit a saved startup's score, or clear the edit
    Override {
        name: String,

        /// New score in [0, 1]
        #[arg(required_unless_present = "clear")]
        score: Option<f64>,

        /// Go back to the computed score
        #[arg(long, conflicts_with = "score")]
        clear: bool,
    },
    /// Remove a saved startup
    Remove {
        name: String,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ssi")]
#[command(about = "Startup Success Index scoring CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ssi/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn parse_set(s: &str) -> Result<(Factor, f64), String> {
    ssi::scoring::parse_assignment(s).map_err(|e| format!("{:#}", e))
}

fn exit_with(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

/// Read a factor set from YAML, or JSON when the extension says so.
fn read_factor_file(path: &Path) -> Result<FactorSet> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read factor file at {}", path.display()))?;

    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse factors: invalid JSON in {}", path.display())
        })
    } else {
        serde_saphyr::from_str(&content).with_context(|| {
            format!("Failed to parse factors: invalid YAML in {}", path.display())
        })
    }
}

/// Build the factor set requested on the command line, exiting on bad input.
fn resolve_factors(args: &FactorArgs) -> FactorSet {
    let mut factors = if let Some(ref name) = args.preset {
        match ssi::presets::find_preset(name) {
            Some(preset) => preset.factors,
            None => {
                let names: Vec<_> = ssi::presets::PRESETS.iter().map(|p| p.name).collect();
                exit_with(
                    EXIT_INPUT,
                    format!("Unknown preset '{}'. Available: {}", name, names.join(", ")),
                );
            }
        }
    } else if let Some(ref path) = args.file {
        match read_factor_file(path) {
            Ok(f) => f,
            Err(e) => exit_with(EXIT_INPUT, format!("Input error: {:#}", e)),
        }
    } else {
        FactorSet::default()
    };

    for (factor, value) in &args.set {
        factors.set(*factor, *value);
    }

    if let Err(errors) = ssi::scoring::validate_factors(&factors) {
        eprintln!("Invalid factors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_INPUT);
    }

    debug!(?factors, "resolved factors");
    factors
}

fn timing_for(override_mode: Option<TimingMode>, scoring: &ScoringConfig) -> TimingMode {
    override_mode.unwrap_or_else(|| scoring.timing_mode())
}

fn load_store_or_exit(path: &Path) -> ssi::store::StartupStore {
    match ssi::store::load_store(path) {
        Ok(s) => s,
        Err(e) => exit_with(EXIT_STORAGE, format!("Storage error: {:#}", e)),
    }
}

fn save_store_or_exit(path: &Path, store: &ssi::store::StartupStore) {
    if let Err(e) = ssi::store::save_store(path, store) {
        exit_with(EXIT_STORAGE, format!("Storage error: {:#}", e));
    }
}

fn main() {
    let cli = Cli::parse();
    ssi::logging::init_tracing(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Score {
        factors: FactorArgs {
            preset: None,
            file: None,
            set: Vec::new(),
            timing: None,
        },
        explain: false,
        json: false,
    });
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading config so a broken config can be replaced
    if let Commands::Init { force } = command {
        match ssi::config::write_default_config(config_path, force) {
            Ok(path) => {
                println!("Wrote config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
        }
    }

    let config = match ssi::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    if let Err(errors) = ssi::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let scoring = config.scoring();
    let store_path = config.resolve_store_path();
    let use_colors = ssi::output::should_use_colors();
    debug!(timing = %scoring.timing_mode(), store = %store_path.display(), "configuration ready");

    match command {
        Commands::Score {
            factors,
            explain,
            json,
        } => {
            let set = resolve_factors(&factors);
            let mode = timing_for(factors.timing, &scoring);
            let result = ssi::scoring::calculate_with_mode(&set, mode);

            if json {
                println!("{}", ssi::output::format_json(&result));
            } else {
                println!("{}", ssi::output::format_score_line(&result, use_colors));
                if explain {
                    println!("{}", ssi::output::format_breakdown(&result, use_colors));
                }
            }
        }
        Commands::Describe { factor, value } => {
            let factor = match Factor::parse(&factor) {
                Ok(f) => f,
                Err(e) => exit_with(EXIT_INPUT, format!("Input error: {}", e)),
            };
            if let Some(v) = value {
                if let Err(e) = FactorSet::check(factor, v) {
                    exit_with(EXIT_INPUT, format!("Input error: {}", e));
                }
            }
            println!(
                "{}",
                ssi::output::format_describe(factor, value, use_colors)
            );
        }
        Commands::Presets { timing } => {
            let mode = timing_for(timing, &scoring);
            println!(
                "{}",
                ssi::output::format_presets(ssi::presets::PRESETS, mode, use_colors)
            );
        }
        Commands::Extract { path, timing } => {
            let mode = timing_for(timing, &scoring);
            let extraction = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read payload at {}", path.display()))
                .and_then(|json| ssi::extraction::decode_payload(&json));
            match extraction {
                Ok(extraction) => println!(
                    "{}",
                    ssi::output::format_extraction(&extraction, mode, use_colors)
                ),
                Err(e) => exit_with(EXIT_INPUT, format!("Input error: {:#}", e)),
            }
        }
        Commands::Save {
            name,
            description,
            update,
            factors,
        } => {
            let set = resolve_factors(&factors);
            let mode = timing_for(factors.timing, &scoring);
            let mut store = load_store_or_exit(&store_path);

            let outcome = if update && store.find(&name).is_some() {
                store.update_factors(&name, description, set, mode)
            } else {
                store.add(&name, description, set, mode).map(|_| ())
            };
            if let Err(e) = outcome {
                exit_with(EXIT_INPUT, format!("Input error: {:#}", e));
            }
            save_store_or_exit(&store_path, &store);

            if let Some(record) = store.find(&name) {
                println!(
                    "Saved {}: {}",
                    record.name,
                    ssi::output::format_score(record.effective_score(), record.score_edited)
                );
            }
        }
        Commands::List => {
            let store = load_store_or_exit(&store_path);
            println!(
                "{}",
                ssi::output::format_ranked_table(&store.ranked(), use_colors)
            );
        }
        Commands::Show { name } => {
            let store = load_store_or_exit(&store_path);
            match store.find(&name) {
                Some(record) => println!(
                    "{}",
                    ssi::output::format_record_detail(record, use_colors)
                ),
                None => exit_with(EXIT_INPUT, format!("No startup named '{}'", name)),
            }
        }
        Commands::Override { name, score, clear } => {
            let mut store = load_store_or_exit(&store_path);
            let outcome = match (clear, score) {
                (true, _) => store.clear_override(&name),
                (false, Some(score)) if !(0.0..=1.0).contains(&score) => {
                    Err(anyhow::anyhow!("score {} is outside [0, 1]", score))
                }
                (false, Some(score)) => store.override_score(&name, score),
                (false, None) => Err(anyhow::anyhow!("a score or --clear is required")),
            };
            if let Err(e) = outcome {
                exit_with(EXIT_INPUT, format!("Input error: {:#}", e));
            }
            save_store_or_exit(&store_path, &store);

            if let Some(record) = store.find(&name) {
                println!(
                    "{}: {}",
                    record.name,
                    ssi::output::format_score(record.effective_score(), record.score_edited)
                );
            }
        }
        Commands::Remove { name } => {
            let mut store = load_store_or_exit(&store_path);
            if !store.remove(&name) {
                exit_with(EXIT_INPUT, format!("No startup named '{}'", name));
            }
            save_store_or_exit(&store_path, &store);
            println!("Removed {}", name);
        }
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}

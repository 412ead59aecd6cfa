//! `alibi`: generate and survey daily puzzles from the command line.

mod cli;
mod render;

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use alibi_core::analytics::survey;
use alibi_explore::solver::pipeline::{generate_puzzle, PipelineConfig};
use alibi_ir::parse::parse_theme;
use alibi_ir::theme::ThemePack;
use alibi_model::invariant::check_puzzle;

use cli::{Cli, Commands, GenerationArgs};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_theme(path: Option<&Path>) -> Result<ThemePack> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading theme {}", path.display()))?;
            parse_theme(&json).with_context(|| format!("parsing theme {}", path.display()))
        }
        None => Ok(ThemePack::default()),
    }
}

fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&json)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

fn run_generate(seed: u32, args: &GenerationArgs) -> Result<()> {
    let theme = load_theme(args.theme.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let outcome = generate_puzzle(seed, &theme, &config)?;

    let violations = check_puzzle(&outcome.puzzle);
    if !violations.is_empty() {
        for v in &violations {
            tracing::error!(invariant = v.invariant, "{}", v.message);
        }
        bail!("puzzle for seed {seed} violates {} invariant(s)", violations.len());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render::puzzle(&outcome.puzzle, &outcome.log, &theme));
    }
    Ok(())
}

fn run_survey(from: u32, count: u32, args: &GenerationArgs) -> Result<()> {
    let theme = load_theme(args.theme.as_deref())?;
    let config = load_config(args.config.as_deref())?;
    let report = survey(from, count, &theme, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render::survey(&report));
    }
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { seed, args } => run_generate(seed, &args),
        Commands::Survey { from, count, args } => run_survey(from, count, &args),
    }
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "alibi", about = "Generate and inspect daily alibi puzzles", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GenerationArgs {
    /// Theme pack JSON (defaults to the built-in harbor pack)
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Pipeline config JSON; missing fields take their defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the puzzle for one seed
    Generate {
        /// Daily seed
        #[arg(long)]
        seed: u32,

        #[command(flatten)]
        args: GenerationArgs,
    },

    /// Generate a range of seeds and report proof statistics
    Survey {
        /// First seed of the range
        #[arg(long, default_value_t = 0)]
        from: u32,

        /// Number of consecutive seeds
        #[arg(long, default_value_t = 100)]
        count: u32,

        #[command(flatten)]
        args: GenerationArgs,
    },
}

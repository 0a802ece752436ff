//! Tinsel CLI - Command-line interface for the Tinsel choreography engine

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{check, init, simulate, tables};
use tinsel_core::Named;

#[derive(Parser)]
#[command(name = "tinsel")]
#[command(about = "Scatter/gather particle choreography, headless", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default scene config
    Init {
        /// Path of the TOML file to create
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the scene headless and report per-binding progress
    Simulate {
        /// Path to scene config (defaults built in when omitted)
        #[arg(long)]
        config: Option<String>,

        /// Number of frames to run
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Frames per second
        #[arg(long, default_value = "60")]
        fps: f32,

        /// Macro state to move toward (chaos or formed)
        #[arg(long, value_parser = parse_named::<tinsel_choreo::MacroState>)]
        state: Option<tinsel_choreo::MacroState>,

        /// Scatter shape to switch to on the first frame
        #[arg(long, value_parser = parse_named::<tinsel_choreo::ScatterShape>)]
        scatter: Option<tinsel_choreo::ScatterShape>,

        /// Frame at which the macro state flips
        #[arg(long)]
        switch_at: Option<u32>,

        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = parse_format)]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the fingerprinted target/delay table of one category
    Tables {
        /// Path to scene config
        #[arg(long)]
        config: Option<String>,

        /// Category name (foliage, lights, ornaments, gifts, photos)
        #[arg(long)]
        category: String,

        /// Print every row as well
        #[arg(long)]
        dump: bool,
    },

    /// Load and sanitize a scene config, reporting adjustments
    Check {
        /// Path to scene config
        config: String,
    },
}

fn parse_named<T: Named>(s: &str) -> Result<T, String> {
    T::parse_name(s).map_err(|e| e.to_string())
}

fn parse_format(s: &str) -> Result<String, String> {
    match s {
        "text" | "json" => Ok(s.to_string()),
        _ => Err(format!("unknown format '{}'; valid values: text, json", s)),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { path, force } => init::run(&path, force),
        Commands::Simulate {
            config,
            frames,
            fps,
            state,
            scatter,
            switch_at,
            format,
            output,
        } => simulate::run(simulate::SimulateArgs {
            config,
            frames,
            fps,
            state,
            scatter,
            switch_at,
            format,
            output,
        }),
        Commands::Tables {
            config,
            category,
            dump,
        } => tables::run(config.as_deref(), &category, dump),
        Commands::Check { config } => check::run(&config),
    }
}

mod commands;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use floorvote_lib::PipelineConfig;

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "floorvote")]
#[command(about = "Curate congressional debate transcripts into a vote-labelled corpus")]
struct Cli {
    /// Output format: table, json, csv or markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// Pipeline configuration file (TOML). Defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Congress number, overriding the configuration
    #[arg(long, global = true)]
    congress: Option<u32>,

    /// Input folder, overriding the configuration
    #[arg(long, global = true)]
    input_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every stage and write the corpus
    Process(commands::process::ProcessArgs),
    /// Show debate groups with their vote tallies
    Groups(commands::groups::GroupsArgs),
    /// List legislators and their resolved cross-source ids
    Legislators(commands::legislators::LegislatorsArgs),
}

impl Cli {
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_path(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => PipelineConfig::default(),
        };
        if let Some(congress) = self.congress {
            config.congress = congress;
        }
        if let Some(input_dir) = &self.input_dir {
            config.input_dir = input_dir.clone();
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("floorvote=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output)?;
    let config = cli.pipeline_config()?;

    match &cli.command {
        Commands::Process(args) => commands::process::run(args, config, &format)?,
        Commands::Groups(args) => commands::groups::run(args, config, &format)?,
        Commands::Legislators(args) => commands::legislators::run(args, config, &format)?,
    }

    Ok(())
}

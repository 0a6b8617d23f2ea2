use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use floorvote_lib::{Granularity, Pipeline, PipelineConfig};

use crate::output::{build_stage_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct ProcessArgs {
    /// Output folder, overriding the configuration
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Attribute bill mentions to turns instead of whole debates
    #[arg(long)]
    pub per_turn: bool,
}

pub fn run(args: &ProcessArgs, mut config: PipelineConfig, format: &OutputFormat) -> Result<()> {
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if args.per_turn {
        config.association = Granularity::Turn;
    }

    let output_dir = config.output_dir.clone();
    let summary = Pipeline::new(config).run()?;

    eprintln!(
        "Kept {} of {} debates, corpus written to {}",
        summary.selection.kept_debates,
        summary.selection.considered,
        output_dir.display()
    );

    match format {
        OutputFormat::Json => print_json(&summary),
        _ => print_rows(&build_stage_rows(&summary), format)?,
    }

    Ok(())
}

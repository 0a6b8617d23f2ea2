use anyhow::Result;
use clap::Args;
use floorvote_lib::types::BillId;
use floorvote_lib::{DebateGroup, Pipeline, PipelineConfig};

use crate::output::{build_group_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct GroupsArgs {
    /// Only show groups that pass the balance window
    #[arg(long)]
    pub kept: bool,

    /// Only show the group of this bill (e.g. h-3590)
    #[arg(long)]
    pub bill: Option<String>,
}

pub fn run(args: &GroupsArgs, config: PipelineConfig, format: &OutputFormat) -> Result<()> {
    let bill: Option<BillId> = args.bill.as_deref().map(str::parse).transpose()?;
    let prepared = Pipeline::new(config).prepare()?;

    let groups: Vec<&DebateGroup> = prepared
        .selection
        .groups
        .iter()
        .filter(|g| !args.kept || g.kept)
        .filter(|g| bill.as_ref().map_or(true, |bill| &g.bill == bill))
        .collect();

    eprintln!(
        "{} groups ({} kept), {} debates kept",
        prepared.selection.report.groups,
        prepared.selection.report.kept_groups,
        prepared.selection.report.kept_debates
    );

    match format {
        OutputFormat::Json => print_json(&groups),
        _ => print_rows(&build_group_rows(&groups), format)?,
    }

    Ok(())
}

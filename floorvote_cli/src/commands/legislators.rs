use anyhow::{bail, Result};
use clap::Args;
use floorvote_lib::types::{Chamber, Legislator};
use floorvote_lib::{Pipeline, PipelineConfig};

use crate::output::{build_legislator_rows, print_json, print_rows, OutputFormat};

#[derive(Args)]
pub struct LegislatorsArgs {
    /// Filter by chamber: rep or sen
    #[arg(long)]
    pub chamber: Option<String>,

    /// Filter by US state code (e.g. OH, TX)
    #[arg(long)]
    pub state: Option<String>,

    /// Only show legislators the roster could not resolve
    #[arg(long)]
    pub unresolved: bool,
}

fn parse_chamber(value: &str) -> Result<Chamber> {
    match value.to_ascii_lowercase().as_str() {
        "rep" | "house" => Ok(Chamber::Representative),
        "sen" | "senate" => Ok(Chamber::Senator),
        other => bail!("unknown chamber '{}': expected rep or sen", other),
    }
}

pub fn run(args: &LegislatorsArgs, config: PipelineConfig, format: &OutputFormat) -> Result<()> {
    let chamber = args.chamber.as_deref().map(parse_chamber).transpose()?;
    let state = args.state.as_ref().map(|s| s.to_uppercase());

    let prepared = Pipeline::new(config).prepare()?;
    let legislators: Vec<&Legislator> = prepared
        .store
        .legislators()
        .iter()
        .filter(|l| chamber.map_or(true, |c| l.chamber == c))
        .filter(|l| state.as_ref().map_or(true, |s| &l.state == s))
        .filter(|l| !args.unresolved || l.cross_id.is_none())
        .collect();

    eprintln!(
        "{} legislators ({} resolved overall)",
        legislators.len(),
        prepared.store.cross_id_count()
    );

    match format {
        OutputFormat::Json => print_json(&legislators),
        _ => print_rows(&build_legislator_rows(&legislators), format)?,
    }

    Ok(())
}

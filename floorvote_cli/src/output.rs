use anyhow::{bail, Result};
use floorvote_lib::identity::ResolutionReport;
use floorvote_lib::scores::LoadReport;
use floorvote_lib::types::Legislator;
use floorvote_lib::{DebateGroup, PipelineSummary};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            other => bail!("unknown output format '{}': expected table, json, csv or markdown", other),
        }
    }
}

#[derive(Tabled, Serialize)]
pub struct StageRow {
    #[tabled(rename = "Stage")]
    #[serde(rename = "Stage")]
    stage: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    metric: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: usize,
}

#[derive(Tabled, Serialize)]
pub struct GroupRow {
    #[tabled(rename = "Bill")]
    #[serde(rename = "Bill")]
    bill: String,
    #[tabled(rename = "Roll")]
    #[serde(rename = "Roll")]
    roll: String,
    #[tabled(rename = "Debates")]
    #[serde(rename = "Debates")]
    debates: usize,
    #[tabled(rename = "Yea")]
    #[serde(rename = "Yea")]
    yea: u32,
    #[tabled(rename = "Nay")]
    #[serde(rename = "Nay")]
    nay: u32,
    #[tabled(rename = "Yea Share")]
    #[serde(rename = "Yea Share")]
    ratio: String,
    #[tabled(rename = "Kept")]
    #[serde(rename = "Kept")]
    kept: bool,
}

#[derive(Tabled, Serialize)]
pub struct LegislatorRow {
    #[tabled(rename = "Id")]
    #[serde(rename = "Id")]
    id: String,
    #[tabled(rename = "Name")]
    #[serde(rename = "Name")]
    name: String,
    #[tabled(rename = "Chamber")]
    #[serde(rename = "Chamber")]
    chamber: String,
    #[tabled(rename = "Party")]
    #[serde(rename = "Party")]
    party: String,
    #[tabled(rename = "State")]
    #[serde(rename = "State")]
    state: String,
    #[tabled(rename = "District")]
    #[serde(rename = "District")]
    district: String,
    #[tabled(rename = "Cross Id")]
    #[serde(rename = "Cross Id")]
    cross_id: String,
    #[tabled(rename = "Score")]
    #[serde(rename = "Score")]
    score: String,
}

// -- Row builders --

fn stage(rows: &mut Vec<StageRow>, stage: &str, counts: &[(&str, usize)]) {
    rows.extend(counts.iter().map(|(metric, value)| StageRow {
        stage: stage.to_string(),
        metric: metric.to_string(),
        value: *value,
    }));
}

fn resolution_counts(report: &ResolutionReport) -> [(&'static str, usize); 6] {
    [
        ("matched", report.matched),
        ("unmatched", report.unmatched),
        ("other cycle", report.other_cycle),
        ("unknown state", report.unknown_state),
        ("already resolved", report.already_resolved),
        ("malformed", report.malformed),
    ]
}

fn load_counts(report: &LoadReport) -> [(&'static str, usize); 4] {
    [
        ("loaded", report.loaded),
        ("other cycle", report.other_cycle),
        ("unknown reference", report.unknown_reference),
        ("malformed", report.malformed),
    ]
}

pub fn build_stage_rows(summary: &PipelineSummary) -> Vec<StageRow> {
    let mut rows = Vec::new();
    let ingest = &summary.ingest;
    stage(
        &mut rows,
        "ingest",
        &[
            ("legislators", ingest.legislators),
            ("bills", ingest.bills),
            ("rolls", ingest.rolls),
            ("debates", ingest.debates),
            ("turns", ingest.turns),
            ("unknown bill rolls", ingest.unknown_bill_rolls),
            ("duplicates", ingest.duplicates),
        ],
    );
    if let Some(report) = &summary.representatives {
        stage(&mut rows, "representatives", &resolution_counts(report));
    }
    if let Some(report) = &summary.senators {
        stage(&mut rows, "senators", &resolution_counts(report));
    }
    stage(&mut rows, "scores", &load_counts(&summary.scores));
    if let Some(report) = &summary.annotations {
        stage(&mut rows, "annotations", &load_counts(report));
    }
    stage(&mut rows, "topics", &load_counts(&summary.topics));
    stage(
        &mut rows,
        "rolls",
        &[
            ("bills with rolls", summary.rolls.bills_with_rolls),
            ("canonical", summary.rolls.canonical),
        ],
    );
    let association = &summary.association;
    stage(
        &mut rows,
        "association",
        &[
            ("debates with bill", association.debates_with_bill),
            ("debates with roll", association.debates_with_roll),
            ("turns with bill", association.turns_with_bill),
        ],
    );
    let selection = &summary.selection;
    stage(
        &mut rows,
        "selection",
        &[
            ("considered", selection.considered),
            ("no bill", selection.no_bill),
            ("unknown bill", selection.unknown_bill),
            ("no rolls", selection.no_rolls),
            ("no canonical roll", selection.no_canonical_roll),
            ("groups", selection.groups),
            ("kept groups", selection.kept_groups),
            ("kept debates", selection.kept_debates),
            ("house debates", selection.house_debates),
            ("senate debates", selection.senate_debates),
        ],
    );
    if let Some(export) = &summary.export {
        stage(
            &mut rows,
            "export",
            &[
                ("legislators", export.legislators),
                ("bills", export.bills),
                ("debates", export.debates),
                ("turn documents", export.turn_documents),
                ("annotated turn documents", export.annotated_turn_documents),
                ("bill documents", export.bill_documents),
            ],
        );
    }
    rows
}

pub fn build_group_rows(groups: &[&DebateGroup]) -> Vec<GroupRow> {
    groups
        .iter()
        .map(|g| GroupRow {
            bill: g.bill.to_string(),
            roll: g.roll.clone(),
            debates: g.debates.len(),
            yea: g.tally.yea,
            nay: g.tally.nay,
            ratio: g.tally.ratio().map(|r| format!("{:.2}", r)).unwrap_or_else(|| "-".to_string()),
            kept: g.kept,
        })
        .collect()
}

pub fn build_legislator_rows(legislators: &[&Legislator]) -> Vec<LegislatorRow> {
    legislators
        .iter()
        .map(|l| LegislatorRow {
            id: l.id.clone(),
            name: l.display_name(),
            chamber: l.chamber.to_string(),
            party: l.party.to_string(),
            state: l.state.clone(),
            district: l.district.map(|d| d.to_string()).unwrap_or_default(),
            cross_id: l.cross_id.clone().unwrap_or_default(),
            score: l.scores.map(|s| format!("{:.3}", s.first)).unwrap_or_default(),
        })
        .collect()
}

// -- Printing --

pub fn print_rows<T: Tabled + Serialize>(rows: &[T], format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorvote_lib::types::{BillId, Chamber, Party, PersonName, Scores};
    use floorvote_lib::VoteTally;

    fn group(bill: &str, yea: u32, nay: u32, kept: bool) -> DebateGroup {
        DebateGroup {
            bill: bill.parse::<BillId>().unwrap(),
            roll: format!("roll-{}", bill),
            debates: vec!["h1".to_string(), "h2".to_string()],
            tally: VoteTally { yea, nay },
            kept,
        }
    }

    fn csv_from_rows<T: Serialize>(rows: &[T]) -> String {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in rows {
            wtr.serialize(row).unwrap();
        }
        wtr.flush().unwrap();
        String::from_utf8(wtr.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(OutputFormat::parse("json").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("md").unwrap(), OutputFormat::Markdown);
        assert!(OutputFormat::parse("xml").is_err());
    }

    #[test]
    fn test_stage_rows_skip_absent_stages() {
        let rows = build_stage_rows(&PipelineSummary::default());
        assert!(rows.iter().all(|r| r.stage != "representatives"));
        assert!(rows.iter().all(|r| r.stage != "export"));
        assert_eq!(rows[0].stage, "ingest");
        assert_eq!(rows.last().map(|r| r.metric.as_str()), Some("senate debates"));
    }

    #[test]
    fn test_group_rows_mapping() {
        let contested = group("h-42", 40, 60, true);
        let silent = group("s-7", 0, 0, false);
        let rows = build_group_rows(&[&contested, &silent]);
        assert_eq!(rows[0].bill, "h-42");
        assert_eq!(rows[0].debates, 2);
        assert_eq!(rows[0].ratio, "0.40");
        assert!(rows[0].kept);
        assert_eq!(rows[1].ratio, "-");
    }

    #[test]
    fn test_legislator_rows_mapping() {
        let mut rep = Legislator::new(
            "400001",
            PersonName {
                last: "Kaptur".to_string(),
                first: "Marcy".to_string(),
                middle: None,
            },
            Chamber::Representative,
            Party::Democrat,
            "oh",
            Some(9),
        );
        rep.cross_id = Some("14873".to_string());
        rep.scores = Some(Scores { first: -0.3124, second: 0.05 });
        let rows = build_legislator_rows(&[&rep]);
        assert_eq!(rows[0].name, "Marcy Kaptur");
        assert_eq!(rows[0].state, "OH");
        assert_eq!(rows[0].district, "9");
        assert_eq!(rows[0].score, "-0.312");
    }

    #[test]
    fn test_csv_group_headers() {
        let g = group("h-1", 3, 7, true);
        let csv = csv_from_rows(&build_group_rows(&[&g]));
        let header = csv.lines().next().unwrap();
        assert_eq!(header, "Bill,Roll,Debates,Yea,Nay,Yea Share,Kept");
    }

    #[test]
    fn test_markdown_group_structure() {
        let g = group("h-1", 3, 7, true);
        let mut table = Table::new(build_group_rows(&[&g]));
        table.with(Style::markdown());
        let md = table.to_string();
        assert!(md.contains('|'));
        assert!(md.contains("---"));
        assert!(md.lines().next().unwrap().contains("Yea Share"));
    }
}

//! Ideal-point scores and legislator annotations keyed by cross-source id.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use floorvote_records::types::Scores;
use floorvote_records::RecordStore;
use serde::Serialize;

use crate::error::PipelineError;
use crate::tsv;

const SCORE_SOURCE: &str = "score file";
const ANNOTATION_SOURCE: &str = "annotation file";

pub const ANNOTATION_FRESHMAN: &str = "freshman";
pub const ANNOTATION_TEA_PARTY_SCORE: &str = "tea_party_score";
pub const ANNOTATION_INTEREST_GROUP_SCORE: &str = "interest_group_score";

/// Counts for a delimited loader pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub other_cycle: usize,
    pub unknown_reference: usize,
    pub malformed: usize,
}

impl LoadReport {
    pub(crate) fn skip(&mut self, error: PipelineError) -> Result<(), PipelineError> {
        match &error {
            PipelineError::Format { .. } => {
                tracing::warn!(error = %error, "skipping malformed row");
                self.malformed += 1;
                Ok(())
            }
            PipelineError::Reference { .. } => {
                tracing::debug!(error = %error, "skipping row");
                self.unknown_reference += 1;
                Ok(())
            }
            PipelineError::Csv(e) if !e.is_io_error() => {
                tracing::warn!(error = %error, "skipping unreadable row");
                self.malformed += 1;
                Ok(())
            }
            _ => Err(error),
        }
    }
}

enum Row<T> {
    Value(T),
    OtherCycle,
}

fn parse_score_row(record: &StringRecord, congress: u32) -> Result<Row<(String, Scores)>, PipelineError> {
    let cycle: u32 = tsv::parse_field(record, 0, "congress", SCORE_SOURCE)?;
    if cycle != congress {
        return Ok(Row::OtherCycle);
    }
    let cross_id = tsv::field(record, 1, "cross-source id", SCORE_SOURCE)?.to_string();
    let first = tsv::parse_field(record, 7, "first score", SCORE_SOURCE)?;
    let second = tsv::parse_field(record, 8, "second score", SCORE_SOURCE)?;
    Ok(Row::Value((cross_id, Scores { first, second })))
}

/// Attaches scores to legislators from a headerless tab-separated score
/// file. Only rows of `congress` are read.
pub fn load_scores<R: Read>(
    store: &mut RecordStore,
    input: R,
    congress: u32,
) -> Result<LoadReport, PipelineError> {
    let mut report = LoadReport::default();
    let mut rdr = tsv::reader(input, false);
    for result in rdr.records() {
        let outcome = result
            .map_err(PipelineError::from)
            .and_then(|record| parse_score_row(&record, congress))
            .and_then(|row| match row {
                Row::OtherCycle => Ok(false),
                Row::Value((cross_id, scores)) => match store.legislator_by_cross_id_mut(&cross_id) {
                    Some(legislator) => {
                        legislator.scores = Some(scores);
                        Ok(true)
                    }
                    None => Err(PipelineError::reference(SCORE_SOURCE, "legislator", cross_id)),
                },
            });
        match outcome {
            Ok(true) => report.loaded += 1,
            Ok(false) => report.other_cycle += 1,
            Err(e) => report.skip(e)?,
        }
    }
    tracing::info!(loaded = report.loaded, unknown = report.unknown_reference, "loaded legislator scores");
    Ok(report)
}

pub fn load_scores_file(store: &mut RecordStore, path: &Path, congress: u32) -> Result<LoadReport, PipelineError> {
    let file = std::fs::File::open(path)?;
    load_scores(store, file, congress)
}

/// Stores the freshman flag and the two interest-group ratings from a
/// tab-separated annotation file with a header row.
pub fn load_annotations<R: Read>(store: &mut RecordStore, input: R) -> Result<LoadReport, PipelineError> {
    let mut report = LoadReport::default();
    let mut rdr = tsv::reader(input, true);
    for result in rdr.records() {
        let outcome = result.map_err(PipelineError::from).and_then(|record| {
            let cross_id = tsv::field(&record, 0, "cross-source id", ANNOTATION_SOURCE)?;
            let freshman = tsv::field(&record, 6, "freshman flag", ANNOTATION_SOURCE)?;
            let tea_party = tsv::field(&record, 11, "tea party score", ANNOTATION_SOURCE)?;
            let interest_group = tsv::field(&record, 14, "interest group score", ANNOTATION_SOURCE)?;
            let legislator_id = store
                .legislator_by_cross_id(cross_id)
                .map(|l| l.id.clone())
                .ok_or_else(|| PipelineError::reference(ANNOTATION_SOURCE, "legislator", cross_id))?;

            let annotations = store.annotations_mut();
            annotations.set(&legislator_id, ANNOTATION_FRESHMAN, freshman);
            annotations.set(&legislator_id, ANNOTATION_TEA_PARTY_SCORE, tea_party);
            annotations.set(&legislator_id, ANNOTATION_INTEREST_GROUP_SCORE, interest_group);
            Ok(())
        });
        match outcome {
            Ok(()) => report.loaded += 1,
            Err(e) => report.skip(e)?,
        }
    }
    tracing::info!(loaded = report.loaded, "loaded legislator annotations");
    Ok(report)
}

pub fn load_annotations_file(store: &mut RecordStore, path: &Path) -> Result<LoadReport, PipelineError> {
    let file = std::fs::File::open(path)?;
    load_annotations(store, file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use floorvote_records::types::{Chamber, Legislator, Party, PersonName};

    fn store_with(cross_id: &str) -> RecordStore {
        let mut store = RecordStore::new();
        store.insert_legislator(Legislator::new(
            "400211",
            PersonName {
                last: "Kaptur".to_string(),
                first: "Marcy".to_string(),
                middle: None,
            },
            Chamber::Representative,
            Party::Democrat,
            "OH",
            Some(9),
        ));
        store.attach_cross_id("400211", cross_id);
        store
    }

    #[test]
    fn test_load_scores() {
        let mut store = store_with("14873");
        let input = "112\t14873\t24\t9\tOH\t100\tKAPTUR\t-0.312\t0.05\n\
                     111\t14873\t24\t9\tOH\t100\tKAPTUR\t-0.9\t0.9\n\
                     112\t99999\t24\t9\tOH\t100\tNOBODY\t0.1\t0.1\n\
                     112\t14873\t24\n";
        let report = load_scores(&mut store, input.as_bytes(), 112).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.other_cycle, 1);
        assert_eq!(report.unknown_reference, 1);
        assert_eq!(report.malformed, 1);

        let scores = store.legislators().get("400211").unwrap().scores.unwrap();
        assert_eq!(scores, Scores { first: -0.312, second: 0.05 });
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        let mut store = store_with("14873");
        let input = "112\t14873\t\t\t\t\t\tNA\t0.1\n";
        let report = load_scores(&mut store, input.as_bytes(), 112).unwrap();
        assert_eq!(report.malformed, 1);
        assert!(store.legislators().get("400211").unwrap().scores.is_none());
    }

    #[test]
    fn test_load_annotations() {
        let mut store = store_with("14873");
        let header = (0..15).map(|i| format!("c{}", i)).collect::<Vec<_>>().join("\t");
        let row = ["14873", "", "", "", "", "", "1", "", "", "", "", "0.75", "", "", "42"].join("\t");
        let unknown = ["1", "", "", "", "", "", "0", "", "", "", "", "0", "", "", "0"].join("\t");
        let input = format!("{}\n{}\n{}\n", header, row, unknown);

        let report = load_annotations(&mut store, input.as_bytes()).unwrap();
        assert_eq!(report.loaded, 1);
        assert_eq!(report.unknown_reference, 1);

        let annotations = store.annotations();
        assert_eq!(annotations.get("400211", ANNOTATION_FRESHMAN), Some("1"));
        assert_eq!(annotations.get("400211", ANNOTATION_TEA_PARTY_SCORE), Some("0.75"));
        assert_eq!(annotations.get("400211", ANNOTATION_INTEREST_GROUP_SCORE), Some("42"));
    }
}

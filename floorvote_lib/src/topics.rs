//! Policy-agenda topic codebook and Congressional Bills Project labels.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use floorvote_records::types::{BillId, TopicCodes};
use floorvote_records::RecordStore;

use crate::error::PipelineError;
use crate::scores::LoadReport;
use crate::tsv;

const CODEBOOK_SOURCE: &str = "topic codebook";
const LABEL_SOURCE: &str = "bill topic file";

/// Topic code to label lookup, covering both major and minor codes.
#[derive(Debug, Clone, Default)]
pub struct TopicCodebook {
    labels: HashMap<u32, String>,
}

impl TopicCodebook {
    /// Reads a headerless `code<TAB>label` file. Malformed rows are skipped.
    pub fn from_reader<R: Read>(input: R) -> Result<Self, PipelineError> {
        let mut codebook = TopicCodebook::default();
        let mut report = LoadReport::default();
        let mut rdr = tsv::reader(input, false);
        for result in rdr.records() {
            let outcome = result.map_err(PipelineError::from).and_then(|record| {
                let code: u32 = tsv::parse_field(&record, 0, "topic code", CODEBOOK_SOURCE)?;
                let label = tsv::field(&record, 1, "topic label", CODEBOOK_SOURCE)?;
                Ok((code, label.to_string()))
            });
            match outcome {
                Ok((code, label)) => {
                    codebook.labels.insert(code, label);
                    report.loaded += 1;
                }
                Err(e) => report.skip(e)?,
            }
        }
        tracing::info!(size = codebook.len(), malformed = report.malformed, "loaded topic codebook");
        Ok(codebook)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn label(&self, code: u32) -> Option<&str> {
        self.labels.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

enum LabelRow {
    Label(BillId, TopicCodes),
    NoCongress,
    OtherCongress,
}

fn parse_label_row(record: &StringRecord, congress: u32) -> Result<LabelRow, PipelineError> {
    let raw_congress = tsv::field(record, 7, "congress", LABEL_SOURCE)?;
    if raw_congress.is_empty() {
        return Ok(LabelRow::NoCongress);
    }
    let row_congress: u32 = tsv::parse_field(record, 7, "congress", LABEL_SOURCE)?;
    if row_congress != congress {
        return Ok(LabelRow::OtherCongress);
    }

    let number: u32 = tsv::parse_field(record, 2, "bill number", LABEL_SOURCE)?;
    let kind = match tsv::field(record, 3, "bill type", LABEL_SOURCE)? {
        "HR" => "h",
        _ => "s",
    };
    let major = tsv::parse_field(record, 10, "major topic", LABEL_SOURCE)?;
    let minor = tsv::parse_field(record, 11, "minor topic", LABEL_SOURCE)?;
    Ok(LabelRow::Label(BillId::new(kind, number), TopicCodes { major, minor }))
}

/// Attaches topic codes from the Congressional Bills Project file (tab
/// separated, one header row) to the store's bills of `congress`.
///
/// Rows with a blank congress column are skipped. Rows for bills that are
/// not in the store count as unknown references.
pub fn load_bill_topics<R: Read>(
    store: &mut RecordStore,
    input: R,
    congress: u32,
) -> Result<LoadReport, PipelineError> {
    let mut report = LoadReport::default();
    let mut rdr = tsv::reader(input, true);
    for result in rdr.records() {
        let outcome = result
            .map_err(PipelineError::from)
            .and_then(|record| parse_label_row(&record, congress));
        match outcome {
            Ok(LabelRow::Label(bill_id, topic)) => match store.bills_mut().get_mut(&bill_id) {
                Some(bill) => {
                    bill.topic = Some(topic);
                    report.loaded += 1;
                }
                None => report.unknown_reference += 1,
            },
            Ok(LabelRow::NoCongress) => {
                tracing::debug!("skipping topic row without congress");
                report.malformed += 1;
            }
            Ok(LabelRow::OtherCongress) => report.other_cycle += 1,
            Err(e) => report.skip(e)?,
        }
    }
    tracing::info!(labeled = report.loaded, "loaded bill topic labels");
    Ok(report)
}

pub fn load_bill_topics_file(store: &mut RecordStore, path: &Path, congress: u32) -> Result<LoadReport, PipelineError> {
    let file = std::fs::File::open(path)?;
    load_bill_topics(store, file, congress)
}

//! Writes the curated corpus as tab-separated text files.
//!
//! Output layout under the output folder:
//!
//! ```text
//! legislators.tsv
//! bills/info.tsv  bills/subjects.tsv  bills/topics.tsv  bills/mentions.tsv
//! bills/summaries/<bill id>
//! debates/texts/<debate id>.txt  debates/info/<debate id>.info
//! format/texts/<turn id>.txt  format/responses.tsv  format/info.tsv
//! format_annotated/texts/<turn id>.txt  format_annotated/{responses,info,topics}.tsv
//! bill_documents/texts/<bill id>.txt  bill_documents/{subjects,topics}.tsv
//! ```
//!
//! `format_annotated` is only written when legislator annotations were
//! loaded.

use std::fs;
use std::path::Path;

use floorvote_records::types::{Debate, Legislator, Roll};
use floorvote_records::RecordStore;
use serde::Serialize;

use crate::corpus::CorpusSelection;
use crate::error::PipelineError;
use crate::index::RecordIndex;
use crate::scores::{ANNOTATION_FRESHMAN, ANNOTATION_INTEREST_GROUP_SCORE, ANNOTATION_TEA_PARTY_SCORE};
use crate::topics::TopicCodebook;
use crate::tsv;

/// Boilerplate some summaries carry when the bill text never changed.
pub const UNAMENDED_SUMMARY_NOTE: &str =
    "(This measure has not been amended since it was introduced. The summary of that version is repeated here.)";

/// Catch-all major topic, left out of the bill document labels.
pub const MISCELLANEOUS_TOPIC: u32 = 99;

/// A legislator with a cross-source id, as exported.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LegislatorRow {
    pub id: String,
    pub cross_id: String,
    pub party: String,
    pub chamber: String,
    pub state: String,
    pub district: Option<u32>,
    pub score1: Option<f64>,
    pub score2: Option<f64>,
    pub last_name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub debates: Vec<String>,
}

/// A bill with its topic codes resolved to labels.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BillRow {
    pub id: String,
    pub kind: String,
    pub number: u32,
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub major_label: Option<String>,
    pub minor_label: Option<String>,
    pub title: String,
    pub official_title: String,
    pub subjects: Vec<String>,
    pub canonical_roll: Option<String>,
    /// Referencing debate or turn ids.
    pub mentions: Vec<String>,
}

/// A kept debate with its canonical roll and per-turn main bills.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DebateEntry {
    pub debate: String,
    pub roll: Option<String>,
    /// `(turn id, main bill)` in turn order.
    pub turns: Vec<(String, Option<String>)>,
}

/// One turn of a kept debate, labelled with its speaker's first score.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TurnDocument {
    pub id: String,
    pub text: String,
    pub response: f64,
    pub speaker: String,
    pub party: String,
    pub vote: Option<String>,
    pub bill: Option<String>,
    /// Major topic of the roll's bill.
    pub major_topic: Option<u32>,
    pub roll_title: Option<String>,
}

/// A turn document whose response is the speaker's tea-party score.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct AnnotatedTurnDocument {
    #[serde(flatten)]
    pub turn: TurnDocument,
    pub first_score: f64,
    pub freshman: Option<String>,
    pub interest_group_score: Option<String>,
}

/// One bill as a document: official title plus the summary body.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BillDocument {
    pub id: String,
    pub text: String,
    pub subjects: Vec<String>,
    /// Major topic, absent for the miscellaneous topic.
    pub major_topic: Option<u32>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub legislators: usize,
    pub bills: usize,
    pub debates: usize,
    pub turn_documents: usize,
    pub annotated_turn_documents: usize,
    pub bill_documents: usize,
}

/// Drops the summary's opening sentence and the unamended-text note.
pub fn summary_body(summary: &str) -> String {
    let rest = summary.split_once('.').map_or(summary, |(_, rest)| rest);
    rest.replace(UNAMENDED_SUMMARY_NOTE, "").trim().to_string()
}

fn opt<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub struct CorpusExporter<'a> {
    store: &'a RecordStore,
    index: &'a RecordIndex,
    codebook: &'a TopicCodebook,
}

impl<'a> CorpusExporter<'a> {
    pub fn new(store: &'a RecordStore, index: &'a RecordIndex, codebook: &'a TopicCodebook) -> Self {
        CorpusExporter { store, index, codebook }
    }

    fn legislator_row(&self, legislator: &Legislator, cross_id: &str) -> LegislatorRow {
        LegislatorRow {
            id: legislator.id.clone(),
            cross_id: cross_id.to_string(),
            party: legislator.party.to_string(),
            chamber: legislator.chamber.to_string(),
            state: legislator.state.clone(),
            district: legislator.district,
            score1: legislator.scores.map(|s| s.first),
            score2: legislator.scores.map(|s| s.second),
            last_name: legislator.last_name.clone(),
            first_name: legislator.first_name.clone(),
            middle_name: legislator.middle_name.clone(),
            debates: self.index.legislator_debates(&legislator.id).to_vec(),
        }
    }

    /// Legislators holding a cross-source id, in store order.
    pub fn legislator_rows(&self) -> Vec<LegislatorRow> {
        self.store
            .legislators()
            .iter()
            .filter_map(|l| l.cross_id.as_deref().map(|cross_id| self.legislator_row(l, cross_id)))
            .collect()
    }

    pub fn bill_rows(&self) -> Vec<BillRow> {
        self.store
            .bills()
            .iter()
            .map(|bill| {
                let major = bill.topic.map(|t| t.major);
                let minor = bill.topic.map(|t| t.minor);
                BillRow {
                    id: bill.id.to_string(),
                    kind: bill.id.kind().to_string(),
                    number: bill.id.number(),
                    major,
                    minor,
                    major_label: major.and_then(|c| self.codebook.label(c)).map(str::to_string),
                    minor_label: minor.and_then(|c| self.codebook.label(c)).map(str::to_string),
                    title: bill.title.clone(),
                    official_title: bill.official_title.clone(),
                    subjects: bill.subjects.clone(),
                    canonical_roll: bill.canonical_roll.clone(),
                    mentions: self.index.bill_mentions(&bill.id).to_vec(),
                }
            })
            .collect()
    }

    fn kept_debates<'s>(&'s self, selection: &'s CorpusSelection) -> impl Iterator<Item = &'a Debate> + 's {
        selection
            .kept
            .iter()
            .filter_map(|id| self.store.debates().get(id.as_str()))
    }

    pub fn debate_entries(&self, selection: &CorpusSelection) -> Vec<DebateEntry> {
        self.kept_debates(selection)
            .map(|debate| DebateEntry {
                debate: debate.id.clone(),
                roll: debate.roll.clone(),
                turns: debate
                    .turns()
                    .iter()
                    .map(|t| (t.id.clone(), t.main_bill.as_ref().map(ToString::to_string)))
                    .collect(),
            })
            .collect()
    }

    /// One document per turn of a kept debate whose speaker has scores.
    pub fn turn_documents(&self, selection: &CorpusSelection) -> Vec<TurnDocument> {
        let mut documents = Vec::new();
        for debate in self.kept_debates(selection) {
            let roll = debate.roll.as_deref().and_then(|id| self.store.rolls().get(id));
            let major_topic = roll
                .and_then(|r| r.bill.as_ref())
                .and_then(|bill| self.store.bills().get(bill))
                .and_then(|bill| bill.topic)
                .map(|t| t.major);
            for turn in debate.turns() {
                let Some(legislator) = self.store.legislators().get(turn.speaker_id.as_str()) else {
                    continue;
                };
                let Some(scores) = legislator.scores else {
                    tracing::debug!(speaker = %legislator.id, "speaker has no scores, skipping turn");
                    continue;
                };
                documents.push(TurnDocument {
                    id: turn.id.clone(),
                    text: turn.text.clone(),
                    response: scores.first,
                    speaker: legislator.id.clone(),
                    party: legislator.party.to_string(),
                    vote: roll.and_then(|r| r.vote(&legislator.id)).map(|v| v.to_string()),
                    bill: roll.and_then(|r| r.bill.as_ref()).map(ToString::to_string),
                    major_topic,
                    roll_title: roll.and_then(|r| r.title.clone()),
                });
            }
        }
        documents
    }

    /// Turn documents of speakers carrying a tea-party score, with that
    /// score as the response.
    pub fn annotated_turn_documents(&self, selection: &CorpusSelection) -> Vec<AnnotatedTurnDocument> {
        let annotations = self.store.annotations();
        self.turn_documents(selection)
            .into_iter()
            .filter_map(|mut turn| {
                let raw = annotations.get(&turn.speaker, ANNOTATION_TEA_PARTY_SCORE)?;
                let score = match raw.parse::<f64>() {
                    Ok(score) => score,
                    Err(_) => {
                        tracing::warn!(speaker = %turn.speaker, value = raw, "unparsable tea-party score, skipping turn");
                        return None;
                    }
                };
                let first_score = std::mem::replace(&mut turn.response, score);
                Some(AnnotatedTurnDocument {
                    freshman: annotations.get(&turn.speaker, ANNOTATION_FRESHMAN).map(str::to_string),
                    interest_group_score: annotations
                        .get(&turn.speaker, ANNOTATION_INTEREST_GROUP_SCORE)
                        .map(str::to_string),
                    first_score,
                    turn,
                })
            })
            .collect()
    }

    /// Every bill as a document labelled with its subjects and major topic.
    pub fn bill_documents(&self) -> Vec<BillDocument> {
        self.store
            .bills()
            .iter()
            .map(|bill| BillDocument {
                id: bill.id.to_string(),
                text: format!("{} {}\n", bill.official_title, summary_body(&bill.summary)),
                subjects: bill.subjects.clone(),
                major_topic: bill
                    .topic
                    .map(|t| t.major)
                    .filter(|major| *major != MISCELLANEOUS_TOPIC),
            })
            .collect()
    }

    pub fn write_legislators(&self, path: &Path) -> Result<usize, PipelineError> {
        let rows = self.legislator_rows();
        let mut wtr = tsv::writer_from_path(path)?;
        for row in &rows {
            wtr.write_record([
                row.id.clone(),
                row.cross_id.clone(),
                row.party.clone(),
                row.chamber.clone(),
                row.state.clone(),
                opt(&row.district),
                opt(&row.score1),
                opt(&row.score2),
                tsv::sanitize(&row.last_name),
                tsv::sanitize(&row.first_name),
                tsv::sanitize(&opt(&row.middle_name)),
                row.debates.join(","),
            ])?;
        }
        wtr.flush()?;
        Ok(rows.len())
    }

    pub fn write_bills(&self, dir: &Path) -> Result<usize, PipelineError> {
        let summaries = dir.join("summaries");
        fs::create_dir_all(&summaries)?;
        let rows = self.bill_rows();

        let mut info = tsv::writer_from_path(&dir.join("info.tsv"))?;
        let mut subjects = tsv::writer_from_path(&dir.join("subjects.tsv"))?;
        let mut topics = tsv::writer_from_path(&dir.join("topics.tsv"))?;
        let mut mentions = tsv::writer_from_path(&dir.join("mentions.tsv"))?;
        for row in &rows {
            info.write_record([
                row.kind.clone(),
                row.number.to_string(),
                opt(&row.major),
                opt(&row.minor),
                tsv::sanitize(&row.title),
                tsv::sanitize(&row.official_title),
            ])?;

            let mut subject_record = vec![row.id.clone()];
            subject_record.extend(row.subjects.iter().map(|s| tsv::sanitize(s)));
            subjects.write_record(&subject_record)?;

            topics.write_record([
                row.id.clone(),
                opt(&row.major),
                opt(&row.minor),
                opt(&row.major_label),
                opt(&row.minor_label),
            ])?;

            let mut mention_record = vec![row.id.clone()];
            mention_record.extend(row.mentions.iter().cloned());
            mentions.write_record(&mention_record)?;
        }
        info.flush()?;
        subjects.flush()?;
        topics.flush()?;
        mentions.flush()?;

        for bill in self.store.bills().iter() {
            fs::write(summaries.join(bill.id.to_string()), &bill.summary)?;
        }
        Ok(rows.len())
    }

    fn write_roll_info(&self, path: &Path, roll: &Roll) -> Result<(), PipelineError> {
        let mut wtr = tsv::writer_from_path(path)?;
        wtr.write_record([
            roll.id.clone(),
            roll.chamber.clone(),
            roll.number.to_string(),
            opt(&roll.bill),
            roll.category.clone(),
            roll.result.clone(),
            tsv::sanitize(roll.title.as_deref().unwrap_or_default()),
        ])?;
        let mut votes: Vec<(&String, _)> = roll.votes().iter().collect();
        votes.sort_by(|a, b| a.0.cmp(b.0));
        for (legislator_id, vote) in votes {
            wtr.write_record([legislator_id.as_str(), vote.symbol()])?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn write_debates(&self, dir: &Path, selection: &CorpusSelection) -> Result<usize, PipelineError> {
        let texts = dir.join("texts");
        let info = dir.join("info");
        fs::create_dir_all(&texts)?;
        fs::create_dir_all(&info)?;

        let mut written = 0;
        for debate in self.kept_debates(selection) {
            let mut wtr = tsv::writer_from_path(&texts.join(format!("{}.txt", debate.id)))?;
            for turn in debate.turns() {
                wtr.write_record([
                    turn.id.clone(),
                    opt(&turn.main_bill),
                    turn.speaker_id.clone(),
                    tsv::sanitize(&turn.text),
                ])?;
            }
            wtr.flush()?;

            match debate.roll.as_deref().and_then(|id| self.store.rolls().get(id)) {
                Some(roll) => self.write_roll_info(&info.join(format!("{}.info", debate.id)), roll)?,
                None => tracing::warn!(debate = %debate.id, "kept debate has no roll, info file skipped"),
            }
            written += 1;
        }
        Ok(written)
    }

    pub fn write_turn_documents(&self, dir: &Path, selection: &CorpusSelection) -> Result<usize, PipelineError> {
        let texts = dir.join("texts");
        fs::create_dir_all(&texts)?;
        let documents = self.turn_documents(selection);

        let mut responses = tsv::writer_from_path(&dir.join("responses.tsv"))?;
        let mut info = tsv::writer_from_path(&dir.join("info.tsv"))?;
        for doc in &documents {
            fs::write(texts.join(format!("{}.txt", doc.id)), &doc.text)?;
            responses.write_record([doc.id.clone(), doc.response.to_string()])?;
            info.write_record([
                doc.id.clone(),
                doc.speaker.clone(),
                doc.party.clone(),
                opt(&doc.vote),
                doc.response.to_string(),
                opt(&doc.bill),
                tsv::sanitize(doc.roll_title.as_deref().unwrap_or_default()),
            ])?;
        }
        responses.flush()?;
        info.flush()?;
        Ok(documents.len())
    }

    pub fn write_annotated_turn_documents(
        &self,
        dir: &Path,
        selection: &CorpusSelection,
    ) -> Result<usize, PipelineError> {
        let texts = dir.join("texts");
        fs::create_dir_all(&texts)?;
        let documents = self.annotated_turn_documents(selection);

        let mut responses = tsv::writer_from_path(&dir.join("responses.tsv"))?;
        let mut info = tsv::writer_from_path(&dir.join("info.tsv"))?;
        let mut topics = tsv::writer_from_path(&dir.join("topics.tsv"))?;
        for doc in &documents {
            let turn = &doc.turn;
            fs::write(texts.join(format!("{}.txt", turn.id)), &turn.text)?;
            responses.write_record([turn.id.clone(), turn.response.to_string()])?;
            info.write_record([
                turn.id.clone(),
                turn.speaker.clone(),
                turn.party.clone(),
                opt(&turn.vote),
                doc.first_score.to_string(),
                opt(&doc.freshman),
                turn.response.to_string(),
                opt(&doc.interest_group_score),
                opt(&turn.bill),
                tsv::sanitize(turn.roll_title.as_deref().unwrap_or_default()),
            ])?;
            let mut topic_record = vec![turn.id.clone()];
            topic_record.extend(turn.major_topic.map(|m| m.to_string()));
            topics.write_record(&topic_record)?;
        }
        responses.flush()?;
        info.flush()?;
        topics.flush()?;
        Ok(documents.len())
    }

    pub fn write_bill_documents(&self, dir: &Path) -> Result<usize, PipelineError> {
        let texts = dir.join("texts");
        fs::create_dir_all(&texts)?;
        let documents = self.bill_documents();

        let mut subjects = tsv::writer_from_path(&dir.join("subjects.tsv"))?;
        let mut topics = tsv::writer_from_path(&dir.join("topics.tsv"))?;
        for doc in &documents {
            fs::write(texts.join(format!("{}.txt", doc.id)), &doc.text)?;

            let mut subject_record = vec![doc.id.clone()];
            subject_record.extend(doc.subjects.iter().map(|s| tsv::sanitize(s)));
            subjects.write_record(&subject_record)?;

            let mut topic_record = vec![doc.id.clone()];
            topic_record.extend(doc.major_topic.map(|m| m.to_string()));
            topics.write_record(&topic_record)?;
        }
        subjects.flush()?;
        topics.flush()?;
        Ok(documents.len())
    }

    /// Writes every output file under `output_dir`.
    pub fn write_all(&self, output_dir: &Path, selection: &CorpusSelection) -> Result<ExportReport, PipelineError> {
        fs::create_dir_all(output_dir)?;
        let bills_dir = output_dir.join("bills");
        fs::create_dir_all(&bills_dir)?;

        let report = ExportReport {
            legislators: self.write_legislators(&output_dir.join("legislators.tsv"))?,
            bills: self.write_bills(&bills_dir)?,
            debates: self.write_debates(&output_dir.join("debates"), selection)?,
            turn_documents: self.write_turn_documents(&output_dir.join("format"), selection)?,
            annotated_turn_documents: if self.store.annotations().is_empty() {
                0
            } else {
                self.write_annotated_turn_documents(&output_dir.join("format_annotated"), selection)?
            },
            bill_documents: self.write_bill_documents(&output_dir.join("bill_documents"))?,
        };
        tracing::info!(
            output = %output_dir.display(),
            legislators = report.legislators,
            bills = report.bills,
            debates = report.debates,
            turn_documents = report.turn_documents,
            annotated_turn_documents = report.annotated_turn_documents,
            bill_documents = report.bill_documents,
            "exported corpus"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::{BalanceWindow, CorpusFilter};
    use crate::index::Granularity;
    use floorvote_records::types::{Bill, BillId, Chamber, Party, PersonName, Scores, TopicCodes, Vote};

    fn bill_id(s: &str) -> BillId {
        s.parse().unwrap()
    }

    fn fixture() -> (RecordStore, TopicCodebook) {
        let mut store = RecordStore::new();

        let mut yes = Legislator::new(
            "400001",
            PersonName {
                last: "Doe".to_string(),
                first: "Jane".to_string(),
                middle: Some("Q".to_string()),
            },
            Chamber::Representative,
            Party::Democrat,
            "OH",
            Some(3),
        );
        yes.scores = Some(Scores { first: -0.4, second: 0.1 });
        store.insert_legislator(yes);
        store.attach_cross_id("400001", "20001");

        store.insert_legislator(Legislator::new(
            "400002",
            PersonName {
                last: "Roe".to_string(),
                first: "Rich".to_string(),
                middle: None,
            },
            Chamber::Representative,
            Party::Republican,
            "TX",
            Some(7),
        ));
        store.attach_cross_id("400002", "20002");

        store.insert_legislator(Legislator::new(
            "300009",
            PersonName {
                last: "Unresolved".to_string(),
                first: "Sam".to_string(),
                middle: None,
            },
            Chamber::Senator,
            Party::Independent,
            "VT",
            None,
        ));

        let mut bill = Bill::new(bill_id("h-42"));
        bill.title = "Jobs Act".to_string();
        bill.official_title = "To create\tjobs".to_string();
        bill.summary = "Creates jobs.".to_string();
        bill.subjects = vec!["Labor".to_string(), "Economics".to_string()];
        bill.topic = Some(TopicCodes { major: 5, minor: 501 });
        bill.canonical_roll = Some("h2011-12".to_string());
        store.insert_bill(bill);

        let mut roll = Roll::new("h2011-12", "house", 12);
        roll.bill = Some(bill_id("h-42"));
        roll.title = Some("On Passage".to_string());
        roll.category = "passage".to_string();
        roll.result = "Bill Passed".to_string();
        roll.put_vote("400002", Vote::Nay);
        roll.put_vote("400001", Vote::Yea);
        store.insert_roll(roll);

        let mut debate = Debate::new("h2011-03-01-1", "JOBS ACT");
        debate.push_speaking("400001", "I rise\nin support.", vec![bill_id("h-42")], None);
        debate.push_speaking("400002", "I oppose.", vec![], None);
        debate.bill = Some(bill_id("h-42"));
        debate.roll = Some("h2011-12".to_string());
        for turn in debate.turns_mut() {
            turn.main_bill = Some(bill_id("h-42"));
        }
        store.insert_debate(debate);

        let codebook = TopicCodebook::from_reader("5\tLabor and Employment\n501\tWorker Safety\n".as_bytes()).unwrap();
        (store, codebook)
    }

    #[test]
    fn test_legislator_rows_only_resolved() {
        let (store, codebook) = fixture();
        let index = RecordIndex::build(&store, Granularity::Debate);
        let exporter = CorpusExporter::new(&store, &index, &codebook);
        let rows = exporter.legislator_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].cross_id, "20001");
        assert_eq!(rows[0].score1, Some(-0.4));
        assert_eq!(rows[0].debates, vec!["h2011-03-01-1"]);
        assert_eq!(rows[1].score1, None);
    }

    #[test]
    fn test_bill_rows_resolve_labels() {
        let (store, codebook) = fixture();
        let index = RecordIndex::build(&store, Granularity::Turn);
        let exporter = CorpusExporter::new(&store, &index, &codebook);
        let rows = exporter.bill_rows();
        assert_eq!(rows[0].major_label.as_deref(), Some("Labor and Employment"));
        assert_eq!(rows[0].minor_label.as_deref(), Some("Worker Safety"));
        assert_eq!(rows[0].mentions, vec!["h2011-03-01-1_0"]);
    }

    #[test]
    fn test_write_all() {
        let (store, codebook) = fixture();
        let index = RecordIndex::build(&store, Granularity::Debate);
        let selection = CorpusFilter::new(BalanceWindow::default()).select(&store, &index);
        assert_eq!(selection.kept, vec!["h2011-03-01-1"]);

        let exporter = CorpusExporter::new(&store, &index, &codebook);
        let dir = tempfile::tempdir().unwrap();
        let report = exporter.write_all(dir.path(), &selection).unwrap();
        assert_eq!(
            report,
            ExportReport {
                legislators: 2,
                bills: 1,
                debates: 1,
                turn_documents: 1,
                annotated_turn_documents: 0,
                bill_documents: 1,
            }
        );
        assert!(!dir.path().join("format_annotated").exists());

        let read = |rel: &str| std::fs::read_to_string(dir.path().join(rel)).unwrap();

        insta::assert_snapshot!(read("legislators.tsv"), @r"
        400001	20001	Democrat	rep	OH	3	-0.4	0.1	Doe	Jane	Q	h2011-03-01-1
        400002	20002	Republican	rep	TX	7			Roe	Rich		h2011-03-01-1
        ");
        insta::assert_snapshot!(read("bills/info.tsv"), @"h	42	5	501	Jobs Act	To create jobs");
        insta::assert_snapshot!(read("bills/subjects.tsv"), @"h-42	Labor	Economics");
        insta::assert_snapshot!(read("bills/topics.tsv"), @"h-42	5	501	Labor and Employment	Worker Safety");
        insta::assert_snapshot!(read("bills/mentions.tsv"), @"h-42	h2011-03-01-1");
        assert_eq!(read("bills/summaries/h-42"), "Creates jobs.");

        insta::assert_snapshot!(read("debates/texts/h2011-03-01-1.txt"), @r"
        h2011-03-01-1_0	h-42	400001	I rise in support.
        h2011-03-01-1_1	h-42	400002	I oppose.
        ");
        insta::assert_snapshot!(read("debates/info/h2011-03-01-1.info"), @r"
        h2011-12	house	12	h-42	passage	Bill Passed	On Passage
        400001	+
        400002	-
        ");

        assert_eq!(read("format/texts/h2011-03-01-1_0.txt"), "I rise\nin support.");
        insta::assert_snapshot!(read("format/responses.tsv"), @"h2011-03-01-1_0	-0.4");
        insta::assert_snapshot!(read("format/info.tsv"), @"h2011-03-01-1_0	400001	Democrat	+	-0.4	h-42	On Passage");

        assert_eq!(read("bill_documents/texts/h-42.txt"), "To create\tjobs \n");
        insta::assert_snapshot!(read("bill_documents/subjects.tsv"), @"h-42	Labor	Economics");
        insta::assert_snapshot!(read("bill_documents/topics.tsv"), @"h-42	5");
    }

    #[test]
    fn test_summary_body_strips_lead_and_unamended_note() {
        let summary = "Jobs Act - Creates jobs. Directs the Secretary of Labor to act. \
                       (This measure has not been amended since it was introduced. \
                       The summary of that version is repeated here.)";
        assert_eq!(summary_body(summary), "Directs the Secretary of Labor to act.");
        assert_eq!(summary_body("No sentence break"), "No sentence break");
        assert_eq!(summary_body(""), "");
    }

    #[test]
    fn test_bill_documents_drop_miscellaneous_topic() {
        let (mut store, codebook) = fixture();
        let mut misc = Bill::new(bill_id("s-9"));
        misc.official_title = "A resolution honoring the troops.".to_string();
        misc.summary = "Honors the troops. Expresses gratitude.".to_string();
        misc.topic = Some(TopicCodes {
            major: MISCELLANEOUS_TOPIC,
            minor: 9900,
        });
        store.insert_bill(misc);
        store.insert_bill(Bill::new(bill_id("s-10")));

        let index = RecordIndex::build(&store, Granularity::Debate);
        let exporter = CorpusExporter::new(&store, &index, &codebook);
        let docs = exporter.bill_documents();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].major_topic, Some(5));
        assert_eq!(docs[1].text, "A resolution honoring the troops. Expresses gratitude.\n");
        assert_eq!(docs[1].major_topic, None);
        assert_eq!(docs[2].major_topic, None);

        let dir = tempfile::tempdir().unwrap();
        exporter.write_bill_documents(dir.path()).unwrap();
        let topics = std::fs::read_to_string(dir.path().join("topics.tsv")).unwrap();
        assert_eq!(topics, "h-42\t5\ns-9\ns-10\n");
    }

    #[test]
    fn test_annotated_turns_use_tea_party_score() {
        let (mut store, codebook) = fixture();
        let annotations = store.annotations_mut();
        annotations.set("400001", ANNOTATION_FRESHMAN, "1");
        annotations.set("400001", ANNOTATION_TEA_PARTY_SCORE, "0.987654");
        annotations.set("400001", ANNOTATION_INTEREST_GROUP_SCORE, "42");
        // No scores, so never a turn document.
        annotations.set("400002", ANNOTATION_TEA_PARTY_SCORE, "0.5");

        let index = RecordIndex::build(&store, Granularity::Debate);
        let selection = CorpusFilter::new(BalanceWindow::default()).select(&store, &index);
        let exporter = CorpusExporter::new(&store, &index, &codebook);

        let docs = exporter.annotated_turn_documents(&selection);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].turn.response, 0.987654);
        assert_eq!(docs[0].first_score, -0.4);

        let dir = tempfile::tempdir().unwrap();
        let report = exporter.write_all(dir.path(), &selection).unwrap();
        assert_eq!(report.annotated_turn_documents, 1);

        let read = |rel: &str| std::fs::read_to_string(dir.path().join(rel)).unwrap();
        insta::assert_snapshot!(read("format_annotated/responses.tsv"), @"h2011-03-01-1_0	0.987654");
        insta::assert_snapshot!(
            read("format_annotated/info.tsv"),
            @"h2011-03-01-1_0	400001	Democrat	+	-0.4	1	0.987654	42	h-42	On Passage"
        );
        insta::assert_snapshot!(read("format_annotated/topics.tsv"), @"h2011-03-01-1_0	5");
        assert_eq!(read("format_annotated/texts/h2011-03-01-1_0.txt"), "I rise\nin support.");
        // The first-score documents keep their own response.
        insta::assert_snapshot!(read("format/responses.tsv"), @"h2011-03-01-1_0	-0.4");
    }

    #[test]
    fn test_unparsable_tea_party_score_skipped() {
        let (mut store, codebook) = fixture();
        store.annotations_mut().set("400001", ANNOTATION_TEA_PARTY_SCORE, "NA");
        let index = RecordIndex::build(&store, Granularity::Debate);
        let selection = CorpusFilter::new(BalanceWindow::default()).select(&store, &index);
        let exporter = CorpusExporter::new(&store, &index, &codebook);
        assert!(exporter.annotated_turn_documents(&selection).is_empty());
    }
}

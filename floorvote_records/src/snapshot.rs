//! The parsed-record snapshot: the JSON document the upstream parsers emit
//! and the pipeline ingests.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::store::RecordStore;
use crate::types::{Bill, BillId, Chamber, Debate, Legislator, Party, PersonName, Roll, Scores, Vote};

/// Root of `records.json`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RecordSnapshot {
    #[serde(default)]
    pub legislators: Vec<LegislatorRecord>,
    #[serde(default)]
    pub bills: Vec<Bill>,
    #[serde(default)]
    pub rolls: Vec<RollRecord>,
    #[serde(default)]
    pub debates: Vec<DebateRecord>,
}

/// A legislator as parsed from the people records, before district
/// normalization.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LegislatorRecord {
    pub id: String,
    #[serde(default)]
    pub cross_id: Option<String>,
    pub last_name: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub nickname: Option<String>,
    pub chamber: Chamber,
    pub party: Party,
    pub state: String,
    #[serde(default)]
    pub district: Option<i64>,
    #[serde(default)]
    pub scores: Option<Scores>,
}

impl LegislatorRecord {
    pub fn into_legislator(self) -> Legislator {
        let name = PersonName {
            last: self.last_name,
            first: self.first_name,
            middle: self.middle_name.filter(|m| !m.trim().is_empty()),
        };
        let mut legislator =
            Legislator::new(self.id, name, self.chamber, self.party, self.state, self.district);
        if let Some(nickname) = self.nickname {
            legislator = legislator.with_nickname(nickname);
        }
        legislator.cross_id = self.cross_id;
        legislator.scores = self.scores;
        legislator
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RollRecord {
    pub id: String,
    pub chamber: String,
    pub number: u32,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub bill: Option<BillId>,
    #[serde(default)]
    pub timestamp: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub result: String,
    /// legislator id -> vote symbol
    #[serde(default)]
    pub votes: BTreeMap<String, Vote>,
}

/// One uninterrupted block of speech in a transcript.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SpeakingRecord {
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub bills: Vec<BillId>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DebateRecord {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chamber: Option<String>,
    #[serde(default)]
    pub speakings: Vec<SpeakingRecord>,
    /// Document-level mention list. When present it replaces the list
    /// gathered from the speaking blocks.
    #[serde(default)]
    pub bills_mentioned: Vec<BillId>,
}

/// Counts gathered while loading a snapshot into a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub legislators: usize,
    pub bills: usize,
    pub rolls: usize,
    pub debates: usize,
    pub turns: usize,
    /// Rolls dropped because their bill is not in the store.
    pub unknown_bill_rolls: usize,
    /// Records whose id was already taken; the later record wins.
    pub duplicates: usize,
}

impl RecordSnapshot {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Error> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

impl RecordStore {
    /// Builds a store from a snapshot.
    ///
    /// Bills are loaded first so rolls can inherit their bill's official
    /// title. A roll naming a bill that is not in the snapshot is dropped.
    pub fn from_snapshot(snapshot: RecordSnapshot) -> (RecordStore, IngestReport) {
        let mut store = RecordStore::new();
        let mut report = IngestReport::default();

        for bill in snapshot.bills {
            if store.insert_bill(bill).is_some() {
                report.duplicates += 1;
            }
        }

        for record in snapshot.legislators {
            if store.legislators().contains(record.id.as_str()) {
                report.duplicates += 1;
            }
            store.insert_legislator(record.into_legislator());
        }

        for record in snapshot.rolls {
            let title = match (&record.title, &record.bill) {
                (Some(title), _) => Some(title.clone()),
                (None, Some(bill_id)) => store.bills().get(bill_id).map(|b| b.official_title.clone()),
                (None, None) => None,
            };
            if let Some(bill_id) = &record.bill {
                if !store.bills().contains(bill_id) {
                    tracing::warn!(roll = %record.id, bill = %bill_id, "roll references unknown bill, skipping");
                    report.unknown_bill_rolls += 1;
                    continue;
                }
            }

            let mut roll = Roll::new(record.id, record.chamber, record.number);
            roll.title = title;
            roll.bill = record.bill;
            roll.timestamp = record.timestamp;
            roll.category = record.category;
            roll.result = record.result;
            for (legislator_id, vote) in record.votes {
                roll.put_vote(legislator_id, vote);
            }
            if store.insert_roll(roll).is_some() {
                report.duplicates += 1;
            }
        }

        for record in snapshot.debates {
            let mut debate = Debate::new(record.id, record.title);
            debate.chamber = record.chamber;
            for speaking in record.speakings {
                debate.push_speaking(&speaking.speaker, &speaking.text, speaking.bills, speaking.topic);
            }
            if !record.bills_mentioned.is_empty() {
                debate.bills_mentioned = record.bills_mentioned;
            }
            if store.insert_debate(debate).is_some() {
                report.duplicates += 1;
            }
        }

        report.legislators = store.legislators().len();
        report.bills = store.bills().len();
        report.rolls = store.rolls().len();
        report.debates = store.debates().len();
        report.turns = store.debates().iter().map(Debate::num_turns).sum();

        tracing::info!(
            legislators = report.legislators,
            bills = report.bills,
            rolls = report.rolls,
            debates = report.debates,
            turns = report.turns,
            "loaded record snapshot"
        );
        (store, report)
    }
}

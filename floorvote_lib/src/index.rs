//! Back-references between records, built once after ingestion.

use std::collections::HashMap;

use floorvote_records::types::BillId;
use floorvote_records::RecordStore;
use serde::{Deserialize, Serialize};

/// Which unit of a transcript bill mentions are attributed to.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Debate,
    Turn,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Debate => write!(f, "debate"),
            Granularity::Turn => write!(f, "turn"),
        }
    }
}

/// Read-only lookups from bills and legislators to the records that
/// reference them. Every list is in store insertion order without repeats.
#[derive(Debug, Clone, Default)]
pub struct RecordIndex {
    granularity: Granularity,
    bill_rolls: HashMap<BillId, Vec<String>>,
    bill_mentions: HashMap<BillId, Vec<String>>,
    legislator_debates: HashMap<String, Vec<String>>,
}

fn push_unique(list: &mut Vec<String>, id: &str) {
    if !list.iter().any(|existing| existing == id) {
        list.push(id.to_string());
    }
}

impl RecordIndex {
    pub fn build(store: &RecordStore, granularity: Granularity) -> Self {
        let mut index = RecordIndex {
            granularity,
            ..Default::default()
        };

        for roll in store.rolls().iter() {
            if let Some(bill_id) = &roll.bill {
                push_unique(index.bill_rolls.entry(bill_id.clone()).or_default(), &roll.id);
            }
        }

        for debate in store.debates().iter() {
            match granularity {
                Granularity::Debate => {
                    for bill_id in &debate.bills_mentioned {
                        push_unique(index.bill_mentions.entry(bill_id.clone()).or_default(), &debate.id);
                    }
                }
                Granularity::Turn => {
                    for turn in debate.turns() {
                        for bill_id in &turn.bills_mentioned {
                            push_unique(index.bill_mentions.entry(bill_id.clone()).or_default(), &turn.id);
                        }
                    }
                }
            }
            for turn in debate.turns() {
                push_unique(
                    index.legislator_debates.entry(turn.speaker_id.clone()).or_default(),
                    &debate.id,
                );
            }
        }

        tracing::debug!(
            bills_with_rolls = index.bill_rolls.len(),
            bills_mentioned = index.bill_mentions.len(),
            speakers = index.legislator_debates.len(),
            "built record index"
        );
        index
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Roll ids of a bill, in roll insertion order.
    pub fn bill_rolls(&self, bill_id: &BillId) -> &[String] {
        self.bill_rolls.get(bill_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Debate or turn ids (per [`Granularity`]) mentioning a bill.
    pub fn bill_mentions(&self, bill_id: &BillId) -> &[String] {
        self.bill_mentions.get(bill_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Debates a legislator spoke in.
    pub fn legislator_debates(&self, legislator_id: &str) -> &[String] {
        self.legislator_debates
            .get(legislator_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

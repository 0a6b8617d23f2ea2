//! Picks the one roll-call vote that stands for a bill.

use floorvote_records::types::Roll;
use floorvote_records::{Collection, RecordStore};
use serde::Serialize;

use crate::index::RecordIndex;

/// Title prefix of the final passage vote among several passage rolls.
pub const ON_PASSAGE_PREFIX: &str = "On Passage";

/// Returns the canonical roll among `roll_ids`.
///
/// 1. If any roll passed the bill, the last such roll in list order.
/// 2. Otherwise, among passage rolls: the only one, or the first whose
///    title starts with "On Passage".
///
/// Ids missing from `rolls` are ignored.
pub fn canonical_roll<'a>(roll_ids: &'a [String], rolls: &Collection<Roll>) -> Option<&'a str> {
    let known: Vec<(&'a str, &Roll)> = roll_ids
        .iter()
        .filter_map(|id| rolls.get(id.as_str()).map(|roll| (id.as_str(), roll)))
        .collect();

    if let Some((id, _)) = known.iter().rev().find(|(_, roll)| roll.passed_bill()) {
        return Some(*id);
    }

    let passage: Vec<&(&'a str, &Roll)> = known.iter().filter(|(_, roll)| roll.is_passage()).collect();
    match passage.as_slice() {
        [] => None,
        [(id, _)] => Some(*id),
        several => several
            .iter()
            .find(|(_, roll)| roll.title_starts_with(ON_PASSAGE_PREFIX))
            .map(|(id, _)| *id),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RollSelectionReport {
    pub bills_with_rolls: usize,
    pub canonical: usize,
}

/// Annotates every bill with its canonical roll.
pub fn select_rolls(store: &mut RecordStore, index: &RecordIndex) -> RollSelectionReport {
    let mut report = RollSelectionReport::default();
    let mut selected = Vec::new();
    for bill in store.bills().iter() {
        let roll_ids = index.bill_rolls(&bill.id);
        if roll_ids.is_empty() {
            continue;
        }
        report.bills_with_rolls += 1;
        let canonical = canonical_roll(roll_ids, store.rolls()).map(str::to_string);
        if canonical.is_some() {
            report.canonical += 1;
        } else {
            tracing::debug!(bill = %bill.id, rolls = roll_ids.len(), "no canonical roll");
        }
        selected.push((bill.id.clone(), canonical));
    }

    for (bill_id, canonical) in selected {
        if let Some(bill) = store.bills_mut().get_mut(&bill_id) {
            bill.canonical_roll = canonical;
        }
    }
    tracing::info!(
        bills_with_rolls = report.bills_with_rolls,
        canonical = report.canonical,
        "selected canonical rolls"
    );
    report
}

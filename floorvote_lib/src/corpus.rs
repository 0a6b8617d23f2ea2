//! Keeps the debates whose bill had a contested vote.
//!
//! Debates are grouped by their associated bill. Each group is scored by
//! how its speakers voted on the bill's canonical roll, and the whole group
//! is kept or dropped together.

use std::collections::{HashMap, HashSet};

use floorvote_records::types::{BillId, Debate, Roll, Vote};
use floorvote_records::RecordStore;
use serde::{Deserialize, Serialize};

use crate::index::RecordIndex;

/// Open interval of yea ratios a group must fall in to be kept.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct BalanceWindow {
    pub lower: f64,
    pub upper: f64,
}

impl Default for BalanceWindow {
    fn default() -> Self {
        BalanceWindow {
            lower: 0.2,
            upper: 0.8,
        }
    }
}

impl BalanceWindow {
    /// Both bounds are exclusive.
    pub fn contains(&self, ratio: f64) -> bool {
        ratio > self.lower && ratio < self.upper
    }

    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.lower) || !(0.0..=1.0).contains(&self.upper) {
            return Err(format!(
                "balance window bounds must lie in [0, 1], got ({}, {})",
                self.lower, self.upper
            ));
        }
        if self.lower >= self.upper {
            return Err(format!(
                "balance window lower bound {} must be below upper bound {}",
                self.lower, self.upper
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub yea: u32,
    pub nay: u32,
}

impl VoteTally {
    pub fn total(&self) -> u32 {
        self.yea + self.nay
    }

    /// Share of yea votes, or `None` when nobody voted either way.
    pub fn ratio(&self) -> Option<f64> {
        match self.total() {
            0 => None,
            total => Some(self.yea as f64 / total as f64),
        }
    }
}

/// Sums, over every turn of every debate, the speaker's vote on `roll`.
/// Not-voting and absent speakers are ignored.
pub fn tally_debates<'a>(debates: impl IntoIterator<Item = &'a Debate>, roll: &Roll) -> VoteTally {
    let mut tally = VoteTally::default();
    for debate in debates {
        for turn in debate.turns() {
            match roll.vote(&turn.speaker_id) {
                Some(Vote::Yea) => tally.yea += 1,
                Some(Vote::Nay) => tally.nay += 1,
                Some(Vote::NotVoting) | None => {}
            }
        }
    }
    tally
}

/// Debates sharing one associated bill.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DebateGroup {
    pub bill: BillId,
    pub roll: String,
    pub debates: Vec<String>,
    pub tally: VoteTally,
    pub kept: bool,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionReport {
    pub considered: usize,
    pub no_bill: usize,
    pub unknown_bill: usize,
    pub no_rolls: usize,
    pub no_canonical_roll: usize,
    pub groups: usize,
    pub kept_groups: usize,
    pub kept_debates: usize,
    pub house_debates: usize,
    pub senate_debates: usize,
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct CorpusSelection {
    /// Groups in order of first appearance.
    pub groups: Vec<DebateGroup>,
    /// Kept debate ids in debate discovery order.
    pub kept: Vec<String>,
    pub report: SelectionReport,
}

pub struct CorpusFilter {
    window: BalanceWindow,
}

impl CorpusFilter {
    pub fn new(window: BalanceWindow) -> Self {
        CorpusFilter { window }
    }

    pub fn select(&self, store: &RecordStore, index: &RecordIndex) -> CorpusSelection {
        let mut report = SelectionReport::default();
        let mut groups: Vec<DebateGroup> = Vec::new();
        let mut group_pos: HashMap<BillId, usize> = HashMap::new();

        for debate in store.debates().iter() {
            report.considered += 1;
            let Some(bill_id) = &debate.bill else {
                report.no_bill += 1;
                continue;
            };
            let Some(bill) = store.bills().get(bill_id) else {
                report.unknown_bill += 1;
                continue;
            };
            if index.bill_rolls(bill_id).is_empty() {
                report.no_rolls += 1;
                continue;
            }
            let Some(roll_id) = bill.canonical_roll.as_ref().filter(|id| store.rolls().contains(id.as_str())) else {
                report.no_canonical_roll += 1;
                continue;
            };

            let pos = *group_pos.entry(bill_id.clone()).or_insert_with(|| {
                groups.push(DebateGroup {
                    bill: bill_id.clone(),
                    roll: roll_id.clone(),
                    debates: Vec::new(),
                    tally: VoteTally::default(),
                    kept: false,
                });
                groups.len() - 1
            });
            groups[pos].debates.push(debate.id.clone());
        }
        tracing::info!(
            candidates = report.considered - report.no_bill - report.unknown_bill - report.no_rolls - report.no_canonical_roll,
            groups = groups.len(),
            "pre-selected debates"
        );

        for group in groups.iter_mut() {
            let Some(roll) = store.rolls().get(group.roll.as_str()) else {
                continue;
            };
            let debates = group
                .debates
                .iter()
                .filter_map(|id| store.debates().get(id.as_str()));
            group.tally = tally_debates(debates, roll);
            group.kept = group.tally.ratio().is_some_and(|ratio| self.window.contains(ratio));
            tracing::debug!(
                bill = %group.bill,
                yea = group.tally.yea,
                nay = group.tally.nay,
                kept = group.kept,
                "scored debate group"
            );
        }

        let kept_bills: HashSet<&BillId> = groups.iter().filter(|g| g.kept).map(|g| &g.bill).collect();
        let mut kept = Vec::new();
        for debate in store.debates().iter() {
            let in_kept_group = debate
                .bill
                .as_ref()
                .is_some_and(|bill_id| kept_bills.contains(bill_id));
            if !in_kept_group {
                continue;
            }
            if debate.is_house() {
                report.house_debates += 1;
            } else if debate.is_senate() {
                report.senate_debates += 1;
            } else {
                tracing::warn!(debate = %debate.id, "debate is neither House nor Senate");
            }
            kept.push(debate.id.clone());
        }

        report.groups = groups.len();
        report.kept_groups = kept_bills.len();
        report.kept_debates = kept.len();
        tracing::info!(
            kept_debates = report.kept_debates,
            house = report.house_debates,
            senate = report.senate_debates,
            "selected debates with yea ratio in ({}, {})",
            self.window.lower,
            self.window.upper
        );

        CorpusSelection { groups, kept, report }
    }
}

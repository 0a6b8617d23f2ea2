//! Roll-call vote types.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::BillId;

/// Result tag of a roll that passed its bill.
pub const RESULT_BILL_PASSED: &str = "Bill Passed";

/// Category tag of a passage vote.
pub const CATEGORY_PASSAGE: &str = "passage";

/// A single legislator's recorded position on a roll.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(from = "String", into = "String")]
pub enum Vote {
    Yea,
    Nay,
    /// Not voting, present, or any other non-position.
    NotVoting,
}

impl Vote {
    /// Vote symbol as written in the source files.
    pub fn symbol(&self) -> &'static str {
        match self {
            Vote::Yea => "+",
            Vote::Nay => "-",
            Vote::NotVoting => "0",
        }
    }
}

impl From<&str> for Vote {
    fn from(symbol: &str) -> Self {
        match symbol.trim() {
            "+" => Vote::Yea,
            "-" => Vote::Nay,
            _ => Vote::NotVoting,
        }
    }
}

impl From<String> for Vote {
    fn from(symbol: String) -> Self {
        Vote::from(symbol.as_str())
    }
}

impl From<Vote> for String {
    fn from(vote: Vote) -> Self {
        vote.symbol().to_string()
    }
}

impl std::fmt::Display for Vote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Running counts of the positions recorded on a roll.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub yea: u32,
    pub nay: u32,
    pub not_voting: u32,
}

impl Tally {
    fn add(&mut self, vote: Vote) {
        match vote {
            Vote::Yea => self.yea += 1,
            Vote::Nay => self.nay += 1,
            Vote::NotVoting => self.not_voting += 1,
        }
    }

    fn remove(&mut self, vote: Vote) {
        match vote {
            Vote::Yea => self.yea -= 1,
            Vote::Nay => self.nay -= 1,
            Vote::NotVoting => self.not_voting -= 1,
        }
    }
}

/// A recorded roll-call vote.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Roll {
    /// Source-native roll id (e.g. "h2005-132").
    pub id: String,

    /// Chamber the vote was held in ("house" or "senate").
    pub chamber: String,

    /// Sequence number within the session.
    pub number: u32,

    pub title: Option<String>,

    pub bill: Option<BillId>,

    pub timestamp: Option<DateTime<FixedOffset>>,

    pub category: String,

    pub result: String,

    votes: HashMap<String, Vote>,

    tally: Tally,
}

impl Roll {
    pub fn new(id: impl Into<String>, chamber: impl Into<String>, number: u32) -> Self {
        Roll {
            id: id.into(),
            chamber: chamber.into(),
            number,
            title: None,
            bill: None,
            timestamp: None,
            category: String::new(),
            result: String::new(),
            votes: HashMap::new(),
            tally: Tally::default(),
        }
    }

    /// Records a legislator's vote, keeping the tally in step. A second vote
    /// for the same legislator replaces the first.
    pub fn put_vote(&mut self, legislator_id: impl Into<String>, vote: Vote) {
        if let Some(previous) = self.votes.insert(legislator_id.into(), vote) {
            self.tally.remove(previous);
        }
        self.tally.add(vote);
    }

    pub fn vote(&self, legislator_id: &str) -> Option<Vote> {
        self.votes.get(legislator_id).copied()
    }

    pub fn votes(&self) -> &HashMap<String, Vote> {
        &self.votes
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn passed_bill(&self) -> bool {
        self.result == RESULT_BILL_PASSED
    }

    pub fn is_passage(&self) -> bool {
        self.category == CATEGORY_PASSAGE
    }

    pub fn title_starts_with(&self, prefix: &str) -> bool {
        self.title.as_deref().is_some_and(|t| t.starts_with(prefix))
    }
}

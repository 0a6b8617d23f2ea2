//! Legislator-related types.

use serde::{Deserialize, Serialize};

/// Source-native legislator identifier (e.g. "400001").
pub type LegislatorID = String;

/// A member of Congress as known to the scraped source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Legislator {
    /// Source-native identifier.
    pub id: LegislatorID,

    /// Identifier assigned by the roll-call/ideology dataset, once resolved.
    #[serde(default)]
    pub cross_id: Option<String>,

    pub last_name: String,

    pub first_name: String,

    #[serde(default)]
    pub middle_name: Option<String>,

    #[serde(default)]
    pub nickname: Option<String>,

    /// House or Senate role.
    pub chamber: Chamber,

    /// Political party affiliation.
    pub party: Party,

    /// Two-letter postal state code (uppercase).
    pub state: String,

    /// Congressional district. Only set for representatives, always >= 1.
    #[serde(default)]
    pub district: Option<u32>,

    /// Ideal-point scores imported from the score file.
    #[serde(default)]
    pub scores: Option<Scores>,
}

impl Legislator {
    /// Builds a legislator, normalizing the district for the chamber.
    ///
    /// Senators never carry a district. A representative with a raw district
    /// of 0 (or none at all) represents an at-large seat and gets district 1.
    pub fn new(
        id: impl Into<String>,
        name: PersonName,
        chamber: Chamber,
        party: Party,
        state: impl Into<String>,
        raw_district: Option<i64>,
    ) -> Self {
        let district = match chamber {
            Chamber::Senator => None,
            Chamber::Representative => Some(normalize_district(raw_district)),
        };
        Legislator {
            id: id.into(),
            cross_id: None,
            last_name: name.last,
            first_name: name.first,
            middle_name: name.middle,
            nickname: None,
            chamber,
            party,
            state: state.into().to_uppercase(),
            district,
            scores: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        let nickname = nickname.into();
        if !nickname.trim().is_empty() {
            self.nickname = Some(nickname);
        }
        self
    }

    /// "First Middle Last".
    pub fn display_name(&self) -> String {
        match &self.middle_name {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

fn normalize_district(raw: Option<i64>) -> u32 {
    match raw {
        Some(d) if d >= 1 => u32::try_from(d).unwrap_or_else(|_| {
            tracing::warn!(district = d, "district out of range, treating as at-large");
            1
        }),
        _ => 1,
    }
}

/// The parts of a legislator's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName {
    pub last: String,
    pub first: String,
    pub middle: Option<String>,
}

/// Two-dimensional ideal-point scores.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub first: f64,
    pub second: f64,
}

/// Congressional role.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chamber {
    /// Member of the House of Representatives.
    #[serde(rename = "rep")]
    Representative,

    /// Member of the Senate.
    #[serde(rename = "sen")]
    Senator,
}
impl std::fmt::Display for Chamber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Chamber::Representative => "rep",
                Chamber::Senator => "sen",
            }
        )
    }
}

/// Political party affiliation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Party {
    Democrat,

    Republican,

    /// Independent or third party.
    Independent,
}
impl Party {
    /// Maps an ICPSR party code: 100 is Democrat, 200 is Republican,
    /// everything else is treated as Independent.
    pub fn from_code(code: u32) -> Self {
        match code {
            100 => Party::Democrat,
            200 => Party::Republican,
            _ => Party::Independent,
        }
    }
}
impl std::fmt::Display for Party {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Party::Democrat => "Democrat",
                Party::Republican => "Republican",
                Party::Independent => "Independent",
            }
        )?;
        Ok(())
    }
}

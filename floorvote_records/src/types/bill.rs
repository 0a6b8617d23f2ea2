//! Bill-related types.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Composite bill key: chamber prefix plus sequence number, rendered `h-42`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct BillId {
    kind: String,
    number: u32,
}

fn bill_id_pattern(input: &str) -> Result<&'static Regex, Error> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^([a-z]+)-(\d+)$"))
        .as_ref()
        .map_err(|_| Error::InvalidBillId(input.to_string()))
}

impl BillId {
    pub fn new(kind: impl Into<String>, number: u32) -> Self {
        BillId {
            kind: kind.into().to_lowercase(),
            number,
        }
    }

    /// Chamber prefix (`h`, `s`, `hr`, `sj`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// True for bills originating in the House (any `h*` prefix).
    pub fn is_house(&self) -> bool {
        self.kind.starts_with('h')
    }

    pub fn is_senate(&self) -> bool {
        self.kind.starts_with('s')
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind, self.number)
    }
}

impl FromStr for BillId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let caps = bill_id_pattern(s)?
            .captures(&normalized)
            .ok_or_else(|| Error::InvalidBillId(s.to_string()))?;
        let number = caps[2]
            .parse::<u32>()
            .map_err(|_| Error::InvalidBillId(s.to_string()))?;
        Ok(BillId::new(&caps[1], number))
    }
}

impl TryFrom<String> for BillId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<BillId> for String {
    fn from(id: BillId) -> Self {
        id.to_string()
    }
}

/// Policy-agenda topic codes assigned by the Congressional Bills Project.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicCodes {
    pub major: u32,
    pub minor: u32,
}

/// A bill as parsed from the bill records.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Bill {
    pub id: BillId,

    /// Popular title.
    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub official_title: String,

    /// Full bill text, when it was fetched.
    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub summary: String,

    /// Subject-area labels in source order.
    #[serde(default)]
    pub subjects: Vec<String>,

    #[serde(default)]
    pub topic: Option<TopicCodes>,

    /// Canonical roll-call vote, set during roll selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canonical_roll: Option<String>,
}

impl Bill {
    pub fn new(id: BillId) -> Self {
        Bill {
            id,
            title: String::new(),
            official_title: String::new(),
            text: None,
            summary: String::new(),
            subjects: Vec::new(),
            topic: None,
            canonical_roll: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bill_id() {
        let id: BillId = "h-42".parse().unwrap();
        assert_eq!(id.kind(), "h");
        assert_eq!(id.number(), 42);
        assert!(id.is_house());
        assert_eq!(id.to_string(), "h-42");
    }

    #[test]
    fn test_parse_bill_id_normalizes_case() {
        let id: BillId = " HR-7 ".parse().unwrap();
        assert_eq!(id, BillId::new("hr", 7));
    }

    #[test]
    fn test_parse_bill_id_rejects_garbage() {
        assert!("h42".parse::<BillId>().is_err());
        assert!("h-".parse::<BillId>().is_err());
        assert!("-42".parse::<BillId>().is_err());
        assert!("".parse::<BillId>().is_err());
    }

    #[test]
    fn test_bill_id_serde_as_string() {
        let id = BillId::new("s", 1932);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"s-1932\"");
        let back: BillId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert!(serde_json::from_str::<BillId>("\"s1932\"").is_err());
    }
}

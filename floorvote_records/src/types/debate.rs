//! Floor-debate transcript types.

use serde::{Deserialize, Serialize};

use super::BillId;

/// One speaker's contiguous stretch of a debate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Turn {
    /// Debate-scoped id, `{debate}_{n}`.
    pub id: String,

    pub speaker_id: String,

    pub text: String,

    #[serde(default)]
    pub topic: Option<String>,

    /// Bills explicitly marked up inside this turn, in order of appearance.
    #[serde(default)]
    pub bills_mentioned: Vec<BillId>,

    /// Bill this turn is deemed to discuss after carry-forward.
    #[serde(default)]
    pub main_bill: Option<BillId>,
}

/// A floor-debate transcript.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Debate {
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Chamber the transcript was recorded in, when known.
    #[serde(default)]
    pub chamber: Option<String>,

    turns: Vec<Turn>,

    /// Every bill mention in the transcript. Repeats are kept.
    #[serde(default)]
    pub bills_mentioned: Vec<BillId>,

    /// Bill the debate is about, set during association.
    #[serde(default)]
    pub bill: Option<BillId>,

    /// Canonical roll of the associated bill.
    #[serde(default)]
    pub roll: Option<String>,
}

impl Debate {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Debate {
            id: id.into(),
            title: title.into(),
            chamber: None,
            turns: Vec::new(),
            bills_mentioned: Vec::new(),
            bill: None,
            roll: None,
        }
    }

    /// Appends a speaking block. A block by the same speaker as the previous
    /// turn is merged into that turn instead of starting a new one.
    ///
    /// The block's bill mentions are appended to both the turn and the debate.
    pub fn push_speaking(
        &mut self,
        speaker_id: &str,
        text: &str,
        bills: Vec<BillId>,
        topic: Option<String>,
    ) {
        self.bills_mentioned.extend(bills.iter().cloned());

        if let Some(last) = self.turns.last_mut() {
            if last.speaker_id == speaker_id {
                last.text.push(' ');
                last.text.push_str(text);
                last.bills_mentioned.extend(bills);
                return;
            }
        }

        let turn = Turn {
            id: format!("{}_{}", self.id, self.turns.len()),
            speaker_id: speaker_id.to_string(),
            text: text.to_string(),
            topic: topic.filter(|t| !t.trim().is_empty()),
            bills_mentioned: bills,
            main_bill: None,
        };
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn turns_mut(&mut self) -> &mut [Turn] {
        &mut self.turns
    }

    pub fn num_turns(&self) -> usize {
        self.turns.len()
    }

    /// House transcripts carry an `h` id prefix, Senate ones an `s` prefix.
    pub fn is_house(&self) -> bool {
        self.id.starts_with('h')
    }

    pub fn is_senate(&self) -> bool {
        self.id.starts_with('s')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bill(s: &str) -> BillId {
        s.parse().unwrap()
    }

    #[test]
    fn test_consecutive_speakers_merge() {
        let mut debate = Debate::new("h109-1", "A debate");
        debate.push_speaking("a", "first", vec![bill("h-1")], None);
        debate.push_speaking("a", "second", vec![bill("h-2")], None);
        debate.push_speaking("b", "third", vec![], Some("Topic".to_string()));
        debate.push_speaking("a", "fourth", vec![], Some("  ".to_string()));

        assert_eq!(debate.num_turns(), 3);
        let turns = debate.turns();
        assert_eq!(turns[0].id, "h109-1_0");
        assert_eq!(turns[0].text, "first second");
        assert_eq!(turns[0].bills_mentioned, vec![bill("h-1"), bill("h-2")]);
        assert_eq!(turns[1].id, "h109-1_1");
        assert_eq!(turns[1].topic.as_deref(), Some("Topic"));
        assert_eq!(turns[2].id, "h109-1_2");
        assert_eq!(turns[2].topic, None);
        assert_eq!(debate.bills_mentioned, vec![bill("h-1"), bill("h-2")]);
    }

    #[test]
    fn test_chamber_from_id_prefix() {
        assert!(Debate::new("h2005-01-01", "").is_house());
        assert!(Debate::new("s2005-01-01", "").is_senate());
    }
}

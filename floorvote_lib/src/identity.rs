//! Cross-source legislator identity resolution.
//!
//! The record snapshot identifies legislators by source-native ids, while
//! the roll-call scores are keyed by the roster's cross-source ids. Some
//! legislators arrive without a cross-source id; this module fills the gap
//! by matching roster rows against the store's legislators on chamber,
//! party, state, district and fuzzy name similarity.

use std::io::BufRead;
use std::path::Path;

use floorvote_records::types::{Chamber, Legislator, Party, PersonName};
use floorvote_records::RecordStore;
use serde::Serialize;
use strsim::levenshtein;

use crate::error::PipelineError;
use crate::states::StateTable;

/// Names within this normalized distance are considered the same.
pub const NAME_MATCH_THRESHOLD: f64 = 0.3;

/// Levenshtein distance divided by the longer string's length, compared
/// case-insensitively. Two empty strings have distance 0.
pub fn normalized_edit_distance(a: &str, b: &str) -> f64 {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    levenshtein(&a, &b) as f64 / max_len as f64
}

/// Splits a roster name of the form `"Last, First Middle..."`.
pub fn parse_full_name(full_name: &str) -> Result<PersonName, PipelineError> {
    let (last, rest) = full_name
        .split_once(',')
        .ok_or_else(|| PipelineError::format("roster", format!("name without comma: '{}'", full_name)))?;
    let mut given = rest.split_whitespace();
    let first = given
        .next()
        .ok_or_else(|| PipelineError::format("roster", format!("name without first name: '{}'", full_name)))?
        .to_string();
    let middle = given.next().map(str::to_string);
    Ok(PersonName {
        last: last.trim().to_string(),
        first,
        middle,
    })
}

/// One parsed line of a fixed-width roster file.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub cycle: u32,
    pub cross_id: String,
    pub state_code: u32,
    /// Only present in the representatives file.
    pub district: Option<u32>,
    pub party_code: u32,
    pub name: PersonName,
}

fn column<'a>(line: &'a str, start: usize, end: Option<usize>) -> Result<&'a str, PipelineError> {
    let slice = match end {
        Some(end) => line.get(start..end),
        None => line.get(start..),
    };
    slice
        .map(str::trim)
        .ok_or_else(|| PipelineError::format("roster", format!("line too short for column {}: '{}'", start, line)))
}

fn numeric_column(line: &str, start: usize, end: usize) -> Result<u32, PipelineError> {
    let raw = column(line, start, Some(end))?;
    raw.parse::<u32>()
        .map_err(|_| PipelineError::format("roster", format!("non-numeric value '{}' at column {}", raw, start)))
}

/// Reads the congress number in columns `[0, 4)`.
pub fn roster_cycle(line: &str) -> Result<u32, PipelineError> {
    numeric_column(line, 0, 4)
}

/// Parses every column of a roster line. The district column is only read
/// for representatives.
pub fn parse_roster_line(line: &str, chamber: Chamber) -> Result<RosterRow, PipelineError> {
    let cycle = roster_cycle(line)?;
    let cross_id = column(line, 5, Some(10))?.to_string();
    if cross_id.is_empty() {
        return Err(PipelineError::format("roster", format!("empty cross-source id: '{}'", line)));
    }
    let state_code = numeric_column(line, 11, 13)?;
    let district = match chamber {
        Chamber::Representative => Some(numeric_column(line, 13, 16)?),
        Chamber::Senator => None,
    };
    let party_code = numeric_column(line, 25, 28)?;
    let name = parse_full_name(column(line, 41, None)?)?;
    Ok(RosterRow {
        cycle,
        cross_id,
        state_code,
        district,
        party_code,
        name,
    })
}

/// Outcome of resolving a single roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The cross-source id was attached to this legislator.
    Matched(String),
    Unmatched,
    OtherCycle,
    UnknownState,
    AlreadyResolved,
}

/// Per-file resolution counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub matched: usize,
    pub unmatched: usize,
    pub other_cycle: usize,
    pub unknown_state: usize,
    pub already_resolved: usize,
    pub malformed: usize,
}

impl ResolutionReport {
    fn record(&mut self, resolution: &Resolution) {
        match resolution {
            Resolution::Matched(_) => self.matched += 1,
            Resolution::Unmatched => self.unmatched += 1,
            Resolution::OtherCycle => self.other_cycle += 1,
            Resolution::UnknownState => self.unknown_state += 1,
            Resolution::AlreadyResolved => self.already_resolved += 1,
        }
    }
}

/// Fills missing cross-source ids from roster files.
pub struct IdentityResolver<'a> {
    congress: u32,
    states: &'a StateTable,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(congress: u32, states: &'a StateTable) -> Self {
        IdentityResolver { congress, states }
    }

    /// Finds the legislator a roster row refers to.
    ///
    /// Candidates must agree on chamber, party, state and (for
    /// representatives) district. A candidate is accepted when its last
    /// name, first name or nickname is close enough to the row's name. When
    /// several candidates are accepted the last one in store order wins.
    pub fn find_match<'s>(
        &self,
        store: &'s RecordStore,
        row: &RosterRow,
        chamber: Chamber,
        state: &str,
    ) -> Option<&'s Legislator> {
        let party = Party::from_code(row.party_code);
        let mut matched = None;

        for legislator in store.legislators().iter() {
            if legislator.chamber != chamber || legislator.party != party || legislator.state != state {
                continue;
            }
            // Roster district codes are compared raw: an at-large seat (code 0)
            // never equals a normalized legislator district.
            if chamber == Chamber::Representative && legislator.district != row.district {
                continue;
            }

            let last_dist = normalized_edit_distance(&legislator.last_name, &row.name.last);
            let first_dist = normalized_edit_distance(&legislator.first_name, &row.name.first);
            let nickname_dist = legislator
                .nickname
                .as_deref()
                .map(|nick| normalized_edit_distance(nick, &row.name.first))
                .unwrap_or(1.0);

            if last_dist > NAME_MATCH_THRESHOLD
                && first_dist > NAME_MATCH_THRESHOLD
                && nickname_dist > NAME_MATCH_THRESHOLD
            {
                tracing::debug!(
                    last = %format!("{} vs {}", legislator.last_name, row.name.last),
                    first = %format!("{} vs {}", legislator.first_name, row.name.first),
                    chamber = %legislator.chamber,
                    party = %legislator.party,
                    state = %legislator.state,
                    "name mismatch, check if reasonable"
                );
                continue;
            }
            matched = Some(legislator);
        }
        matched
    }

    /// Resolves one roster line against the store, attaching the
    /// cross-source id on a match.
    pub fn resolve_line(
        &self,
        store: &mut RecordStore,
        line: &str,
        chamber: Chamber,
    ) -> Result<Resolution, PipelineError> {
        if roster_cycle(line)? != self.congress {
            return Ok(Resolution::OtherCycle);
        }
        let row = parse_roster_line(line, chamber)?;

        let Some(state) = self.states.abbr_for_code(row.state_code) else {
            return Ok(Resolution::UnknownState);
        };
        if store.has_cross_id(&row.cross_id) {
            return Ok(Resolution::AlreadyResolved);
        }

        let Some(legislator_id) = self
            .find_match(store, &row, chamber, state)
            .map(|l| l.id.clone())
        else {
            return Ok(Resolution::Unmatched);
        };
        store.attach_cross_id(&legislator_id, &row.cross_id);
        Ok(Resolution::Matched(legislator_id))
    }

    /// Resolves every line from a roster reader. Malformed rows are counted
    /// and skipped.
    pub fn resolve_reader<R: BufRead>(
        &self,
        store: &mut RecordStore,
        reader: R,
        chamber: Chamber,
    ) -> Result<ResolutionReport, PipelineError> {
        let mut report = ResolutionReport::default();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match self.resolve_line(store, &line, chamber) {
                Ok(resolution) => report.record(&resolution),
                Err(e) if e.is_row_level() => {
                    tracing::warn!(error = %e, "skipping roster row");
                    report.malformed += 1;
                }
                Err(e) => return Err(e),
            }
        }
        Ok(report)
    }

    /// Resolves a roster file. A missing file is not an error: the roster
    /// files are optional, so the stage logs a warning and returns `None`.
    pub fn resolve_file(
        &self,
        store: &mut RecordStore,
        path: &Path,
        chamber: Chamber,
    ) -> Result<Option<ResolutionReport>, PipelineError> {
        if !path.exists() {
            tracing::warn!(path = %path.display(), "roster file not found, skipping");
            return Ok(None);
        }
        let file = std::fs::File::open(path)?;
        let report = self.resolve_reader(store, std::io::BufReader::new(file), chamber)?;
        tracing::info!(
            path = %path.display(),
            chamber = %chamber,
            matched = report.matched,
            unmatched = report.unmatched,
            malformed = report.malformed,
            "resolved roster"
        );
        Ok(Some(report))
    }
}

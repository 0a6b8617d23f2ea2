//! ICPSR state code table.
//!
//! The roster files identify states by two-digit ICPSR codes while the
//! record snapshot uses postal abbreviations. The table is embedded from
//! `seed_data/state_codes.yml` and validated when it is loaded.

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateTableError {
    #[error("Failed to parse state code YAML: {0}")]
    YamlParse(#[from] serde_yml::Error),
    #[error("Duplicate ICPSR state code: {0}")]
    DuplicateCode(u32),
    #[error("Duplicate state abbreviation: {0}")]
    DuplicateAbbr(String),
    #[error("Invalid state abbreviation: {0}")]
    InvalidAbbr(String),
}

#[derive(Deserialize, Debug)]
struct StateCodeFile {
    states: Vec<State>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub code: u32,
    pub abbr: String,
    pub name: String,
}

/// Lookup between ICPSR codes and postal abbreviations.
#[derive(Debug, Clone)]
pub struct StateTable {
    states: Vec<State>,
    by_code: HashMap<u32, usize>,
    by_abbr: HashMap<String, usize>,
}

impl StateTable {
    /// Parses and validates a state table from YAML content.
    pub fn from_yaml(yaml_content: &str) -> Result<Self, StateTableError> {
        let file: StateCodeFile = serde_yml::from_str(yaml_content)?;

        let mut table = StateTable {
            states: Vec::with_capacity(file.states.len()),
            by_code: HashMap::new(),
            by_abbr: HashMap::new(),
        };
        for mut state in file.states {
            state.abbr = state.abbr.trim().to_uppercase();
            if state.abbr.len() != 2 || !state.abbr.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(StateTableError::InvalidAbbr(state.abbr));
            }
            if table.by_code.contains_key(&state.code) {
                return Err(StateTableError::DuplicateCode(state.code));
            }
            if table.by_abbr.contains_key(&state.abbr) {
                return Err(StateTableError::DuplicateAbbr(state.abbr));
            }
            let pos = table.states.len();
            table.by_code.insert(state.code, pos);
            table.by_abbr.insert(state.abbr.clone(), pos);
            table.states.push(state);
        }
        Ok(table)
    }

    /// Loads the embedded table.
    pub fn load() -> Result<Self, StateTableError> {
        let yaml_content = include_str!("../../seed_data/state_codes.yml");
        Self::from_yaml(yaml_content)
    }

    pub fn abbr_for_code(&self, code: u32) -> Option<&str> {
        self.by_code
            .get(&code)
            .map(|&pos| self.states[pos].abbr.as_str())
    }

    pub fn by_abbr(&self, abbr: &str) -> Option<&State> {
        self.by_abbr
            .get(&abbr.to_uppercase())
            .map(|&pos| &self.states[pos])
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

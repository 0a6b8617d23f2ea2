//! Pipeline configuration, read from a TOML file.
//!
//! ```toml
//! congress = 112
//! input_dir = "data/addinfo"
//! output_dir = "processed"
//! association = "turn"
//!
//! [files]
//! scores = "HANDSL01112D20_BSSE.txt"
//!
//! [balance]
//! lower = 0.2
//! upper = 0.8
//! ```
//!
//! Every key is optional; missing keys take the defaults below.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::corpus::BalanceWindow;
use crate::error::PipelineError;
use crate::index::Granularity;

/// Input file names, relative to `input_dir`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct InputFiles {
    /// Parsed-record snapshot.
    pub records: String,
    /// Fixed-width roster of representatives. Optional.
    pub representatives: String,
    /// Fixed-width roster of senators. Optional.
    pub senators: String,
    pub scores: String,
    pub codebook: String,
    pub bill_topics: String,
    /// Legislator annotation file. Only read when set.
    pub annotations: Option<String>,
}

impl Default for InputFiles {
    fn default() -> Self {
        InputFiles {
            records: "records.json".to_string(),
            representatives: "h01112nw.txt".to_string(),
            senators: "s01112nw.txt".to_string(),
            scores: "HANDSL01112D20_BSSE.txt".to_string(),
            codebook: "policy_agenda_codebook.txt".to_string(),
            bill_topics: "bills93-112-Sept232013.txt".to_string(),
            annotations: None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    pub congress: u32,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub association: Granularity,
    pub files: InputFiles,
    pub balance: BalanceWindow,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            congress: 112,
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("processed"),
            association: Granularity::default(),
            files: InputFiles::default(),
            balance: BalanceWindow::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn input_path(&self, file_name: &str) -> PathBuf {
        self.input_dir.join(file_name)
    }

    pub fn records_path(&self) -> PathBuf {
        self.input_path(&self.files.records)
    }

    pub fn representatives_path(&self) -> PathBuf {
        self.input_path(&self.files.representatives)
    }

    pub fn senators_path(&self) -> PathBuf {
        self.input_path(&self.files.senators)
    }

    pub fn scores_path(&self) -> PathBuf {
        self.input_path(&self.files.scores)
    }

    pub fn codebook_path(&self) -> PathBuf {
        self.input_path(&self.files.codebook)
    }

    pub fn bill_topics_path(&self) -> PathBuf {
        self.input_path(&self.files.bill_topics)
    }

    pub fn annotations_path(&self) -> Option<PathBuf> {
        self.files.annotations.as_deref().map(|f| self.input_path(f))
    }

    /// Checks the settings and that every required input exists. The two
    /// roster files are optional and not checked.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.congress == 0 {
            return Err(PipelineError::Configuration("congress must be positive".to_string()));
        }
        self.balance.validate().map_err(PipelineError::Configuration)?;
        if !self.input_dir.is_dir() {
            return Err(PipelineError::Configuration(format!(
                "input folder {} does not exist",
                self.input_dir.display()
            )));
        }

        let mut required = vec![
            self.records_path(),
            self.scores_path(),
            self.codebook_path(),
            self.bill_topics_path(),
        ];
        required.extend(self.annotations_path());
        for path in required {
            if !path.is_file() {
                return Err(PipelineError::Configuration(format!(
                    "missing input file {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_file() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.congress, 112);
        assert_eq!(config.files.representatives, "h01112nw.txt");
        assert_eq!(config.association, Granularity::Debate);
        assert_eq!(config.balance, BalanceWindow { lower: 0.2, upper: 0.8 });
    }

    #[test]
    fn test_partial_override() {
        let config = PipelineConfig::from_toml_str(
            r#"
            congress = 109
            input_dir = "/data/addinfo"
            association = "turn"

            [files]
            scores = "HANDSL01109D20_BSSE.txt"
            annotations = "tea_party.tsv"

            [balance]
            lower = 0.1
            upper = 0.9
            "#,
        )
        .unwrap();
        assert_eq!(config.congress, 109);
        assert_eq!(config.association, Granularity::Turn);
        assert_eq!(config.scores_path(), PathBuf::from("/data/addinfo/HANDSL01109D20_BSSE.txt"));
        assert_eq!(config.files.codebook, "policy_agenda_codebook.txt");
        assert_eq!(
            config.annotations_path(),
            Some(PathBuf::from("/data/addinfo/tea_party.tsv"))
        );
        assert_eq!(config.balance.lower, 0.1);
    }

    #[test]
    fn test_unknown_association_rejected() {
        let err = PipelineConfig::from_toml_str(r#"association = "paragraph""#).unwrap_err();
        assert!(matches!(err, PipelineError::Toml(_)));
    }

    #[test]
    fn test_validate_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            input_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(msg) if msg.contains("records.json")));

        for name in [
            "records.json",
            "HANDSL01112D20_BSSE.txt",
            "policy_agenda_codebook.txt",
            "bills93-112-Sept232013.txt",
        ] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_window() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            input_dir: dir.path().to_path_buf(),
            balance: BalanceWindow { lower: 0.9, upper: 0.1 },
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(PipelineError::Configuration(_))));
    }
}

//! Library layer for floorvote: identity resolution, roll selection,
//! debate association, corpus filtering and export.
//!
//! Builds on the `floorvote_records` store and drives the stages through
//! [`Pipeline`], configured by a TOML [`PipelineConfig`].

pub mod association;
pub mod config;
pub mod corpus;
pub mod error;
pub mod export;
pub mod identity;
pub mod index;
pub mod pipeline;
pub mod roll_select;
pub mod scores;
pub mod states;
pub mod topics;
mod tsv;

pub use floorvote_records;
pub use floorvote_records::types;
pub use floorvote_records::{RecordSnapshot, RecordStore};

pub use config::PipelineConfig;
pub use corpus::{BalanceWindow, CorpusFilter, CorpusSelection, DebateGroup, SelectionReport, VoteTally};
pub use error::PipelineError;
pub use export::{
    AnnotatedTurnDocument, BillDocument, BillRow, CorpusExporter, DebateEntry, ExportReport, LegislatorRow,
    TurnDocument,
};
pub use identity::{IdentityResolver, ResolutionReport};
pub use index::{Granularity, RecordIndex};
pub use pipeline::{Pipeline, PipelineSummary, PreparedCorpus};
pub use states::StateTable;
pub use topics::TopicCodebook;

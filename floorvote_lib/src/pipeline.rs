//! Runs the curation stages in order.

use floorvote_records::types::Chamber;
use floorvote_records::{IngestReport, RecordSnapshot, RecordStore};
use serde::Serialize;

use crate::association::{associate_bills, AssociationReport};
use crate::config::PipelineConfig;
use crate::corpus::{CorpusFilter, CorpusSelection, SelectionReport};
use crate::error::PipelineError;
use crate::export::{CorpusExporter, ExportReport};
use crate::identity::{IdentityResolver, ResolutionReport};
use crate::index::RecordIndex;
use crate::roll_select::{select_rolls, RollSelectionReport};
use crate::scores::{load_annotations_file, load_scores_file, LoadReport};
use crate::states::StateTable;
use crate::topics::{load_bill_topics_file, TopicCodebook};

/// Stage counts of one run.
#[derive(Serialize, Debug, Clone, Default)]
pub struct PipelineSummary {
    pub ingest: IngestReport,
    pub representatives: Option<ResolutionReport>,
    pub senators: Option<ResolutionReport>,
    pub scores: LoadReport,
    pub annotations: Option<LoadReport>,
    pub topics: LoadReport,
    pub rolls: RollSelectionReport,
    pub association: AssociationReport,
    pub selection: SelectionReport,
    pub export: Option<ExportReport>,
}

/// Everything produced up to and including corpus selection.
pub struct PreparedCorpus {
    pub store: RecordStore,
    pub index: RecordIndex,
    pub codebook: TopicCodebook,
    pub selection: CorpusSelection,
    pub summary: PipelineSummary,
}

impl PreparedCorpus {
    pub fn exporter(&self) -> CorpusExporter<'_> {
        CorpusExporter::new(&self.store, &self.index, &self.codebook)
    }
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Pipeline { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Loads every input, resolves identities, annotates bills and debates
    /// and selects the corpus. Nothing is written.
    pub fn prepare(&self) -> Result<PreparedCorpus, PipelineError> {
        let config = &self.config;
        config.validate()?;
        let states = StateTable::load()?;
        let mut summary = PipelineSummary::default();

        let snapshot = RecordSnapshot::from_path(config.records_path())?;
        let (mut store, ingest) = RecordStore::from_snapshot(snapshot);
        summary.ingest = ingest;

        let resolver = IdentityResolver::new(config.congress, &states);
        summary.representatives =
            resolver.resolve_file(&mut store, &config.representatives_path(), Chamber::Representative)?;
        summary.senators = resolver.resolve_file(&mut store, &config.senators_path(), Chamber::Senator)?;

        summary.scores = load_scores_file(&mut store, &config.scores_path(), config.congress)?;
        if let Some(path) = config.annotations_path() {
            summary.annotations = Some(load_annotations_file(&mut store, &path)?);
        }

        let codebook = TopicCodebook::from_path(&config.codebook_path())?;
        summary.topics = load_bill_topics_file(&mut store, &config.bill_topics_path(), config.congress)?;

        let index = RecordIndex::build(&store, config.association);
        summary.rolls = select_rolls(&mut store, &index);
        summary.association = associate_bills(&mut store);

        let selection = CorpusFilter::new(config.balance).select(&store, &index);
        summary.selection = selection.report;

        Ok(PreparedCorpus {
            store,
            index,
            codebook,
            selection,
            summary,
        })
    }

    /// Runs every stage and writes the corpus to the output folder.
    pub fn run(&self) -> Result<PipelineSummary, PipelineError> {
        let prepared = self.prepare()?;
        let export = prepared
            .exporter()
            .write_all(&self.config.output_dir, &prepared.selection)?;
        let mut summary = prepared.summary;
        summary.export = Some(export);
        Ok(summary)
    }
}

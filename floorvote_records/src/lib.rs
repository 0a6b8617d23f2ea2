mod errors;
pub mod snapshot;
pub mod store;
pub mod types;
pub use self::errors::Error;
pub use self::snapshot::{
    DebateRecord, IngestReport, LegislatorRecord, RecordSnapshot, RollRecord, SpeakingRecord,
};
pub use self::store::{Annotations, Collection, Keyed, RecordStore};

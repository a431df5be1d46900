//! # nidm-ingest
//!
//! Everything mriqc-nidm reads from disk:
//!
//! - [`load_dictionary`]: the field dictionary table (fatal on any defect)
//! - [`load_metadata`]: the software metadata table (fatal on any defect)
//! - [`read_record`]: one QC record, JSON or single-row CSV/TSV
//! - [`discover`]: the QC files under an MRIQC output directory
//!
//! All readers are synchronous; the CLI runs record reads on blocking threads.

pub mod dictionary;
pub mod discovery;
pub mod error;
pub mod metadata;
pub mod record;
mod tabular;

pub use dictionary::{load_dictionary, read_dictionary, validate_terms};
pub use discovery::{Discovery, discover, parse_participant_labels};
pub use error::{DiscoveryError, MalformedDictionaryError, MalformedMetadataError, RecordReadError};
pub use metadata::{LoadedMetadata, METADATA_SCOPE, load_metadata, read_metadata};
pub use record::{QcRecord, ReadOptions, RecordSource, read_record};

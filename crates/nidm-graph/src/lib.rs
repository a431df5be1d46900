//! # nidm-graph
//!
//! Provenance graphs for QC measurements.
//!
//! - [`GraphBuilder`] turns one subject's resolved fields into a [`SubjectGraph`]
//! - [`DatasetGraph`] merges subject graphs by deduplicating union
//! - [`GraphDocument`] is the serialization-neutral form both encoders read
//! - [`GraphWriter`] encodes (Turtle or JSON-LD) and writes atomically
//!
//! Identical inputs always produce byte-identical output.

pub mod builder;
pub mod dataset;
pub mod document;
pub mod encode;
pub mod error;
pub mod model;
pub mod writer;

pub use builder::{Built, GraphBuilder};
pub use dataset::DatasetGraph;
pub use document::{GraphDocument, Literal, Node, Object};
pub use error::WriteError;
pub use model::{Activity, Agent, Statement, SubjectGraph};
pub use writer::{GraphWriter, write_atomic, write_json_atomic};

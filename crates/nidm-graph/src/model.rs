//! Abstract graph objects: one subject's graph and its parts.
//!
//! Nothing here knows about Turtle or JSON-LD; encoders work from the
//! [`GraphDocument`](crate::GraphDocument) these produce.

use std::sync::Arc;

use nidm_core::{EntityId, SoftwareMetadata, SubjectIdentity, TypedValue};

/// One QC measurement: `entity term value` with an optional unit.
///
/// The derived ordering (entity, term, value, unit) is the statement order
/// in every emitted graph, and equality over all four parts is the dedup
/// identity used when graphs are merged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    pub entity: EntityId,
    pub term: String,
    pub value: TypedValue,
    pub unit: Option<String>,
}

/// The provenance agent every measurement is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    pub id: EntityId,
    pub metadata: Arc<SoftwareMetadata>,
}

/// The QC activity linking a subject entity to the agent.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Activity {
    pub id: EntityId,
    pub entity: EntityId,
    pub agent: EntityId,
}

/// One subject's provenance graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectGraph {
    pub identity: SubjectIdentity,
    pub entity: EntityId,
    pub activity: Activity,
    pub agent: Agent,
    /// Sorted and free of duplicates.
    pub statements: Vec<Statement>,
}

impl SubjectGraph {
    /// True when the graph carries only identity and agent statements.
    #[must_use]
    pub fn is_minimal(&self) -> bool {
        self.statements.is_empty()
    }
}

//! Aggregator: many subject graphs → one dataset graph.
//!
//! Merging is a set union keyed by node id. Where two graphs describe the
//! same node differently (e.g. two copies of one record found at different
//! paths, so `dct:source` differs) the smaller description wins, which keeps
//! merge commutative and idempotent.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use nidm_core::{EntityId, SoftwareMetadata, SubjectIdentity};

use crate::model::{Activity, Statement, SubjectGraph};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetGraph {
    pub(crate) entities: BTreeMap<EntityId, SubjectIdentity>,
    pub(crate) activities: BTreeMap<EntityId, Activity>,
    pub(crate) agents: BTreeMap<EntityId, Arc<SoftwareMetadata>>,
    pub(crate) statements: BTreeSet<Statement>,
}

impl DatasetGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Union `graph` into this dataset, deduplicating identical statements.
    pub fn merge(&mut self, graph: &SubjectGraph) {
        keep_min(&mut self.entities, &graph.entity, &graph.identity);
        keep_min(&mut self.activities, &graph.activity.id, &graph.activity);
        keep_min(&mut self.agents, &graph.agent.id, &graph.agent.metadata);
        self.statements.extend(graph.statements.iter().cloned());
    }

    /// Union another dataset into this one.
    pub fn absorb(&mut self, other: &Self) {
        for (id, identity) in &other.entities {
            keep_min(&mut self.entities, id, identity);
        }
        for (id, activity) in &other.activities {
            keep_min(&mut self.activities, id, activity);
        }
        for (id, agent) in &other.agents {
            keep_min(&mut self.agents, id, agent);
        }
        self.statements.extend(other.statements.iter().cloned());
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn statement_count(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn statements(&self) -> impl Iterator<Item = &Statement> {
        self.statements.iter()
    }
}

impl From<&SubjectGraph> for DatasetGraph {
    fn from(graph: &SubjectGraph) -> Self {
        let mut dataset = Self::new();
        dataset.merge(graph);
        dataset
    }
}

fn keep_min<V: Ord + Clone>(map: &mut BTreeMap<EntityId, V>, id: &EntityId, value: &V) {
    match map.get_mut(id) {
        Some(existing) if *value < *existing => *existing = value.clone(),
        Some(_) => {}
        None => {
            map.insert(id.clone(), value.clone());
        }
    }
}

//! Graph Builder: identity + resolved fields + software → [`SubjectGraph`].

use std::sync::Arc;

use nidm_core::ids::{activity_id, agent_id, subject_entity_id};
use nidm_core::{ReportWarning, ResolvedField, SoftwareMetadata, SubjectIdentity};

use crate::model::{Activity, Agent, Statement, SubjectGraph};

/// A built graph and anything the report should know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Built {
    pub graph: SubjectGraph,
    pub warnings: Vec<ReportWarning>,
}

/// Builds subject graphs against one shared software agent.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    agent: Agent,
}

impl GraphBuilder {
    #[must_use]
    pub fn new(software: Arc<SoftwareMetadata>) -> Self {
        Self {
            agent: Agent {
                id: agent_id(&software),
                metadata: software,
            },
        }
    }

    #[must_use]
    pub const fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Build the graph for one record.
    ///
    /// `scope` names the record in any warning (usually its source path).
    /// An empty `fields` list still yields a structurally complete graph.
    /// Every field becomes its own statement, even when two fields carry
    /// the same term and value; only the dataset graph deduplicates.
    #[must_use]
    pub fn build(&self, scope: &str, identity: &SubjectIdentity, fields: &[ResolvedField]) -> Built {
        let entity = subject_entity_id(identity);
        let activity = Activity {
            id: activity_id(&entity, &self.agent.id),
            entity: entity.clone(),
            agent: self.agent.id.clone(),
        };

        let mut statements: Vec<Statement> = fields
            .iter()
            .map(|field| Statement {
                entity: entity.clone(),
                term: field.target_term.clone(),
                value: field.value.clone(),
                unit: field.unit.clone(),
            })
            .collect();
        statements.sort();

        let mut warnings = Vec::new();
        if statements.is_empty() {
            tracing::warn!(subject = %identity.label(), "no resolved fields, emitting minimal graph");
            warnings.push(ReportWarning::new(
                scope,
                format!("{} has no resolved fields; wrote identity and agent only", identity.label()),
            ));
        }

        Built {
            graph: SubjectGraph {
                identity: identity.clone(),
                entity,
                activity,
                agent: self.agent.clone(),
                statements,
            },
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nidm_core::TypedValue;
    use pretty_assertions::assert_eq;

    fn builder() -> GraphBuilder {
        GraphBuilder::new(Arc::new(SoftwareMetadata {
            name: "MRIQC".into(),
            version: "24.0.2".into(),
            vendor_uri: None,
            description: None,
        }))
    }

    fn identity() -> SubjectIdentity {
        SubjectIdentity {
            subject: "0051456".into(),
            suffix: Some("T1w".into()),
            ..SubjectIdentity::default()
        }
    }

    fn snr() -> ResolvedField {
        ResolvedField {
            source_key: "snr".into(),
            target_term: "qc:SignalToNoiseRatio".into(),
            value: TypedValue::Numeric("12.5".into()),
            unit: Some("dimensionless".into()),
        }
    }

    #[test]
    fn one_statement_per_field_on_the_subject_entity() {
        let built = builder().build("a.json", &identity(), &[snr()]);

        assert!(built.warnings.is_empty());
        let graph = built.graph;
        assert_eq!(graph.entity, subject_entity_id(&identity()));
        assert_eq!(
            graph.statements,
            [Statement {
                entity: graph.entity.clone(),
                term: "qc:SignalToNoiseRatio".into(),
                value: TypedValue::Numeric("12.5".into()),
                unit: Some("dimensionless".into()),
            }]
        );
        assert_eq!(graph.activity.entity, graph.entity);
        assert_eq!(graph.activity.agent, graph.agent.id);
    }

    #[test]
    fn empty_fields_give_minimal_graph_and_warning() {
        let built = builder().build("a.json", &identity(), &[]);

        assert!(built.graph.is_minimal());
        assert_eq!(built.warnings.len(), 1);
        assert_eq!(built.warnings[0].scope, "a.json");
    }

    #[test]
    fn building_twice_is_identical() {
        let builder = builder();
        let a = builder.build("a.json", &identity(), &[snr()]);
        let b = builder.build("a.json", &identity(), &[snr()]);
        assert_eq!(a, b);
    }

    #[test]
    fn identical_fields_each_keep_a_statement() {
        let alias = ResolvedField {
            source_key: "SNR".into(),
            ..snr()
        };
        let built = builder().build("a.json", &identity(), &[snr(), alias]);
        assert_eq!(built.graph.statements.len(), 2);
    }
}

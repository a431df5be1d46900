//! Serialization-neutral graph document shared by the Turtle and JSON-LD
//! encoders.
//!
//! Node order: agents, then each subject entity followed by its activities,
//! all by id. Property order within a node is fixed by construction, and
//! measurements follow statement order.

use nidm_core::TypedValue;
use nidm_core::vocab::{
    DCT_DESCRIPTION, DCT_SOURCE, NIDM_ACQUISITION, NIDM_IMAGE_SUFFIX, NIDM_QC_MEASUREMENTS,
    NIDM_RUN, NIDM_SESSION, NIDM_SOFTWARE_VERSION, NIDM_SUBJECT_LABEL, NIDM_TASK, NIDM_UNIT,
    NIDM_VENDOR_URI, PROV_ACTIVITY, PROV_AGENT, PROV_ENTITY, PROV_SOFTWARE_AGENT,
    PROV_WAS_ASSOCIATED_WITH, PROV_WAS_ATTRIBUTED_TO, PROV_WAS_GENERATED_BY, RDF_VALUE,
    RDFS_LABEL,
};

use crate::dataset::DatasetGraph;
use crate::model::{Statement, SubjectGraph};

const XSD_ANY_URI: &str = "xsd:anyURI";

/// An RDF literal. `datatype: None` is a plain string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub lexical: String,
    pub datatype: Option<&'static str>,
}

impl Literal {
    #[must_use]
    pub fn plain(lexical: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: None,
        }
    }

    #[must_use]
    pub fn typed(value: &TypedValue) -> Self {
        match value {
            TypedValue::Text(text) => Self::plain(text.clone()),
            other => Self {
                lexical: other.lexical(),
                datatype: Some(other.xsd_datatype()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Object {
    /// Another node, by CURIE or absolute IRI.
    Node(String),
    Literal(Literal),
    /// An anonymous node with its own properties.
    Blank(Vec<(String, Object)>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub types: Vec<&'static str>,
    pub properties: Vec<(String, Object)>,
}

impl Node {
    fn new(id: impl Into<String>, types: &[&'static str]) -> Self {
        Self {
            id: id.into(),
            types: types.to_vec(),
            properties: Vec::new(),
        }
    }

    fn push(&mut self, term: &str, object: Object) {
        self.properties.push((term.to_string(), object));
    }

    fn push_literal(&mut self, term: &str, value: Option<&String>) {
        if let Some(value) = value {
            self.push(term, Object::Literal(Literal::plain(value.clone())));
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphDocument {
    pub nodes: Vec<Node>,
}

impl From<&DatasetGraph> for GraphDocument {
    fn from(dataset: &DatasetGraph) -> Self {
        let mut nodes = Vec::new();

        for (id, software) in &dataset.agents {
            let mut agent = Node::new(id.as_str(), &[PROV_AGENT, PROV_SOFTWARE_AGENT]);
            agent.push_literal(RDFS_LABEL, Some(&software.name));
            agent.push_literal(NIDM_SOFTWARE_VERSION, Some(&software.version));
            if let Some(uri) = &software.vendor_uri {
                agent.push(
                    NIDM_VENDOR_URI,
                    Object::Literal(Literal {
                        lexical: uri.clone(),
                        datatype: Some(XSD_ANY_URI),
                    }),
                );
            }
            agent.push_literal(DCT_DESCRIPTION, software.description.as_ref());
            nodes.push(agent);
        }

        for (id, identity) in &dataset.entities {
            let activities: Vec<_> = dataset
                .activities
                .values()
                .filter(|activity| activity.entity == *id)
                .collect();

            let mut entity = Node::new(id.as_str(), &[PROV_ENTITY, NIDM_QC_MEASUREMENTS]);
            entity.push_literal(NIDM_SUBJECT_LABEL, Some(&identity.subject));
            entity.push_literal(NIDM_SESSION, identity.session.as_ref());
            entity.push_literal(NIDM_TASK, identity.task.as_ref());
            entity.push_literal(NIDM_ACQUISITION, identity.acquisition.as_ref());
            entity.push_literal(NIDM_RUN, identity.run.as_ref());
            entity.push_literal(NIDM_IMAGE_SUFFIX, identity.suffix.as_ref());
            entity.push_literal(DCT_SOURCE, identity.source_url.as_ref());

            for statement in dataset
                .statements
                .iter()
                .filter(|statement| statement.entity == *id)
            {
                entity.push(&statement.term, measurement(statement));
            }

            for activity in &activities {
                entity.push(PROV_WAS_GENERATED_BY, Object::Node(activity.id.to_string()));
            }
            for activity in &activities {
                entity.push(PROV_WAS_ATTRIBUTED_TO, Object::Node(activity.agent.to_string()));
            }
            nodes.push(entity);

            for activity in activities {
                let mut node = Node::new(activity.id.as_str(), &[PROV_ACTIVITY]);
                node.push(
                    PROV_WAS_ASSOCIATED_WITH,
                    Object::Node(activity.agent.to_string()),
                );
                nodes.push(node);
            }
        }

        Self { nodes }
    }
}

impl From<&SubjectGraph> for GraphDocument {
    fn from(graph: &SubjectGraph) -> Self {
        Self::from(&DatasetGraph::from(graph))
    }
}

fn measurement(statement: &Statement) -> Object {
    let value = Literal::typed(&statement.value);
    match &statement.unit {
        None => Object::Literal(value),
        Some(unit) => Object::Blank(vec![
            (RDF_VALUE.to_string(), Object::Literal(value)),
            (
                NIDM_UNIT.to_string(),
                Object::Literal(Literal::plain(unit.clone())),
            ),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphBuilder;
    use nidm_core::{ResolvedField, SoftwareMetadata, SubjectIdentity};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn document(fields: &[ResolvedField]) -> GraphDocument {
        let builder = GraphBuilder::new(Arc::new(SoftwareMetadata {
            name: "MRIQC".into(),
            version: "24.0.2".into(),
            vendor_uri: Some("https://mriqc.readthedocs.io".into()),
            description: None,
        }));
        let identity = SubjectIdentity {
            subject: "01".into(),
            session: Some("pre".into()),
            suffix: Some("T1w".into()),
            ..SubjectIdentity::default()
        };
        GraphDocument::from(&builder.build("a.json", &identity, fields).graph)
    }

    #[test]
    fn minimal_document_has_agent_entity_and_activity() {
        let doc = document(&[]);
        let types: Vec<_> = doc.nodes.iter().map(|node| node.types.clone()).collect();
        assert_eq!(
            types,
            [
                vec![PROV_AGENT, PROV_SOFTWARE_AGENT],
                vec![PROV_ENTITY, NIDM_QC_MEASUREMENTS],
                vec![PROV_ACTIVITY],
            ]
        );

        let entity = &doc.nodes[1];
        let terms: Vec<_> = entity.properties.iter().map(|(term, _)| term.as_str()).collect();
        assert_eq!(
            terms,
            [
                NIDM_SUBJECT_LABEL,
                NIDM_SESSION,
                NIDM_IMAGE_SUFFIX,
                PROV_WAS_GENERATED_BY,
                PROV_WAS_ATTRIBUTED_TO,
            ]
        );
    }

    #[test]
    fn unit_becomes_blank_node() {
        let doc = document(&[ResolvedField {
            source_key: "snr".into(),
            target_term: "qc:SignalToNoiseRatio".into(),
            value: TypedValue::Numeric("12.5".into()),
            unit: Some("dimensionless".into()),
        }]);

        let entity = &doc.nodes[1];
        let (_, object) = entity
            .properties
            .iter()
            .find(|(term, _)| term == "qc:SignalToNoiseRatio")
            .unwrap();
        assert_eq!(
            *object,
            Object::Blank(vec![
                (
                    RDF_VALUE.to_string(),
                    Object::Literal(Literal {
                        lexical: "12.5".into(),
                        datatype: Some("xsd:decimal"),
                    })
                ),
                (
                    NIDM_UNIT.to_string(),
                    Object::Literal(Literal::plain("dimensionless"))
                ),
            ])
        );
    }
}

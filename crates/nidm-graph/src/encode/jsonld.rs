//! JSON-LD encoder: one `@context` of the configured prefixes and a flat
//! `@graph` of nodes. Typed literals keep their lexical form in `@value`.

use nidm_core::Namespaces;
use serde_json::{Map, Value, json};

use crate::document::{GraphDocument, Literal, Node, Object};

#[must_use]
pub fn to_value(document: &GraphDocument, namespaces: &Namespaces) -> Value {
    let context: Map<String, Value> = namespaces
        .iter()
        .map(|(prefix, iri)| (prefix.to_string(), Value::String(iri.to_string())))
        .collect();
    let graph: Vec<Value> = document.nodes.iter().map(node_value).collect();

    json!({
        "@context": context,
        "@graph": graph,
    })
}

/// Pretty-printed JSON-LD with a trailing newline.
///
/// # Errors
///
/// Returns the underlying `serde_json` error if serialization fails.
pub fn encode(document: &GraphDocument, namespaces: &Namespaces) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(&to_value(document, namespaces))?;
    text.push('\n');
    Ok(text)
}

fn node_value(node: &Node) -> Value {
    let mut object = Map::new();
    object.insert("@id".into(), Value::String(node.id.clone()));
    if !node.types.is_empty() {
        object.insert(
            "@type".into(),
            Value::Array(node.types.iter().map(|ty| Value::String((*ty).to_string())).collect()),
        );
    }
    insert_properties(&mut object, &node.properties);
    Value::Object(object)
}

/// Repeated predicates collect into an array in first-seen order.
fn insert_properties(object: &mut Map<String, Value>, properties: &[(String, Object)]) {
    for (predicate, value) in properties {
        let value = object_value(value);
        match object.get_mut(predicate) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                object.insert(predicate.clone(), value);
            }
        }
    }
}

fn object_value(object: &Object) -> Value {
    match object {
        Object::Node(id) => json!({ "@id": id }),
        Object::Literal(literal) => literal_value(literal),
        Object::Blank(properties) => {
            let mut blank = Map::new();
            insert_properties(&mut blank, properties);
            Value::Object(blank)
        }
    }
}

fn literal_value(literal: &Literal) -> Value {
    match literal.datatype {
        None => Value::String(literal.lexical.clone()),
        Some(datatype) => json!({ "@value": literal.lexical, "@type": datatype }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn nodes_carry_ids_types_and_typed_values() {
        let document = GraphDocument {
            nodes: vec![Node {
                id: "niiri:qc-1".into(),
                types: vec!["prov:Entity", "nidm:QCMeasurements"],
                properties: vec![
                    ("nidm:subjectLabel".into(), Object::Literal(Literal::plain("01"))),
                    (
                        "qc:Cjv".into(),
                        Object::Literal(Literal {
                            lexical: "0.4512301246".into(),
                            datatype: Some("xsd:decimal"),
                        }),
                    ),
                    ("prov:wasGeneratedBy".into(), Object::Node("niiri:activity-1".into())),
                    ("prov:wasGeneratedBy".into(), Object::Node("niiri:activity-2".into())),
                ],
            }],
        };

        let value = to_value(&document, &Namespaces::default());
        assert_eq!(value["@context"]["prov"], "http://www.w3.org/ns/prov#");
        assert_eq!(
            value["@graph"][0],
            json!({
                "@id": "niiri:qc-1",
                "@type": ["prov:Entity", "nidm:QCMeasurements"],
                "nidm:subjectLabel": "01",
                "qc:Cjv": {"@value": "0.4512301246", "@type": "xsd:decimal"},
                "prov:wasGeneratedBy": [
                    {"@id": "niiri:activity-1"},
                    {"@id": "niiri:activity-2"}
                ]
            })
        );
    }

    #[test]
    fn encoded_text_ends_with_newline() {
        let text = encode(&GraphDocument::default(), &Namespaces::default()).unwrap();
        assert!(text.ends_with("}\n"));
    }
}

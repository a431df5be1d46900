//! Turtle encoder.

use std::fmt::Write as _;

use nidm_core::Namespaces;
use nidm_core::vocab::{Term, parse_term};

use crate::document::{GraphDocument, Literal, Node, Object};

const INDENT: &str = "    ";

/// Encode `document` as Turtle. Output is a pure function of its inputs.
#[must_use]
pub fn encode(document: &GraphDocument, namespaces: &Namespaces) -> String {
    let mut out = String::new();
    for (prefix, iri) in namespaces.iter() {
        let _ = writeln!(out, "@prefix {prefix}: <{}> .", escape_iri(iri));
    }

    for node in &document.nodes {
        out.push('\n');
        write_node(&mut out, node, namespaces);
    }
    out
}

fn write_node(out: &mut String, node: &Node, namespaces: &Namespaces) {
    out.push_str(&term(&node.id, namespaces));

    let mut first = true;
    if !node.types.is_empty() {
        let types: Vec<_> = node.types.iter().map(|ty| term(ty, namespaces)).collect();
        let _ = write!(out, " a {}", types.join(", "));
        first = false;
    }

    for (predicate, object) in &node.properties {
        if first {
            out.push(' ');
            first = false;
        } else {
            out.push_str(" ;\n");
            out.push_str(INDENT);
        }
        let _ = write!(
            out,
            "{} {}",
            term(predicate, namespaces),
            object_text(object, namespaces)
        );
    }
    out.push_str(" .\n");
}

fn object_text(object: &Object, namespaces: &Namespaces) -> String {
    match object {
        Object::Node(id) => term(id, namespaces),
        Object::Literal(literal) => literal_text(literal, namespaces),
        Object::Blank(properties) => {
            let inner: Vec<_> = properties
                .iter()
                .map(|(predicate, object)| {
                    format!(
                        "{} {}",
                        term(predicate, namespaces),
                        object_text(object, namespaces)
                    )
                })
                .collect();
            format!("[ {} ]", inner.join(" ; "))
        }
    }
}

fn literal_text(literal: &Literal, namespaces: &Namespaces) -> String {
    let quoted = format!("\"{}\"", escape_string(&literal.lexical));
    match literal.datatype {
        None => quoted,
        Some(datatype) => format!("{quoted}^^{}", term(datatype, namespaces)),
    }
}

/// Render a CURIE or IRI in Turtle form, expanding CURIEs whose local part
/// Turtle cannot write unescaped.
fn term(raw: &str, namespaces: &Namespaces) -> String {
    match parse_term(raw) {
        Some(Term::Curie { prefix, local })
            if namespaces.get(prefix).is_some() && is_plain_local(local) =>
        {
            raw.to_string()
        }
        Some(_) => namespaces
            .expand(raw)
            .map_or_else(|| format!("<{}>", escape_iri(raw)), |iri| format!("<{}>", escape_iri(&iri))),
        None => format!("<{}>", escape_iri(raw)),
    }
}

fn is_plain_local(local: &str) -> bool {
    !local.starts_with('.')
        && !local.ends_with('.')
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

fn escape_string(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn escape_iri(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c <= ' ' || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') {
            let _ = write!(escaped, "\\u{:04X}", u32::from(c));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn node(id: &str, properties: Vec<(&str, Object)>) -> Node {
        Node {
            id: id.to_string(),
            types: vec!["prov:Entity"],
            properties: properties
                .into_iter()
                .map(|(term, object)| (term.to_string(), object))
                .collect(),
        }
    }

    #[test]
    fn renders_types_properties_and_blank_nodes() {
        let document = GraphDocument {
            nodes: vec![node(
                "niiri:qc-1",
                vec![
                    ("nidm:subjectLabel", Object::Literal(Literal::plain("01"))),
                    (
                        "qc:SignalToNoiseRatio",
                        Object::Blank(vec![
                            (
                                "rdf:value".into(),
                                Object::Literal(Literal {
                                    lexical: "12.5".into(),
                                    datatype: Some("xsd:decimal"),
                                }),
                            ),
                            (
                                "nidm:unit".into(),
                                Object::Literal(Literal::plain("dimensionless")),
                            ),
                        ]),
                    ),
                    ("prov:wasGeneratedBy", Object::Node("niiri:activity-1".into())),
                ],
            )],
        };

        let text = encode(&document, &Namespaces::default());
        let body = text.split_once("\n\n").unwrap().1;
        assert_eq!(
            body,
            "niiri:qc-1 a prov:Entity ;\n    \
             nidm:subjectLabel \"01\" ;\n    \
             qc:SignalToNoiseRatio [ rdf:value \"12.5\"^^xsd:decimal ; nidm:unit \"dimensionless\" ] ;\n    \
             prov:wasGeneratedBy niiri:activity-1 .\n"
        );
        assert!(text.starts_with("@prefix dct: <http://purl.org/dc/terms/> .\n"));
    }

    #[test]
    fn escapes_literals() {
        let literal = Literal::plain("say \"hi\"\\\n");
        assert_eq!(
            literal_text(&literal, &Namespaces::default()),
            "\"say \\\"hi\\\"\\\\\\n\""
        );
    }

    #[test]
    fn awkward_locals_and_iris_are_expanded() {
        let namespaces = Namespaces::default();
        assert_eq!(term("qc:snr", &namespaces), "qc:snr");
        assert_eq!(
            term("qc:snr(total)", &namespaces),
            "<http://purl.org/nidash/qc#snr(total)>"
        );
        assert_eq!(
            term("http://example.org/x", &namespaces),
            "<http://example.org/x>"
        );
    }
}

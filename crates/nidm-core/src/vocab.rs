//! Vocabulary terms and namespace prefixes used by the emitted graphs.

use std::collections::BTreeMap;

use crate::errors::CoreError;

pub const PROV_NS: &str = "http://www.w3.org/ns/prov#";
pub const NIDM_NS: &str = "http://purl.org/nidash/nidm#";
pub const NIIRI_NS: &str = "http://iri.nidash.org/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const DCT_NS: &str = "http://purl.org/dc/terms/";
pub const QC_NS: &str = "http://purl.org/nidash/qc#";

pub const RDF_TYPE: &str = "rdf:type";
pub const RDF_VALUE: &str = "rdf:value";
pub const RDFS_LABEL: &str = "rdfs:label";
pub const DCT_DESCRIPTION: &str = "dct:description";
pub const DCT_SOURCE: &str = "dct:source";

pub const PROV_ENTITY: &str = "prov:Entity";
pub const PROV_ACTIVITY: &str = "prov:Activity";
pub const PROV_AGENT: &str = "prov:Agent";
pub const PROV_SOFTWARE_AGENT: &str = "prov:SoftwareAgent";
pub const PROV_WAS_GENERATED_BY: &str = "prov:wasGeneratedBy";
pub const PROV_WAS_ATTRIBUTED_TO: &str = "prov:wasAttributedTo";
pub const PROV_WAS_ASSOCIATED_WITH: &str = "prov:wasAssociatedWith";

pub const NIDM_QC_MEASUREMENTS: &str = "nidm:QCMeasurements";
pub const NIDM_SUBJECT_LABEL: &str = "nidm:subjectLabel";
pub const NIDM_SESSION: &str = "nidm:session";
pub const NIDM_TASK: &str = "nidm:task";
pub const NIDM_ACQUISITION: &str = "nidm:acquisition";
pub const NIDM_RUN: &str = "nidm:run";
pub const NIDM_IMAGE_SUFFIX: &str = "nidm:imageSuffix";
pub const NIDM_SOFTWARE_VERSION: &str = "nidm:softwareVersion";
pub const NIDM_VENDOR_URI: &str = "nidm:vendorUri";
pub const NIDM_UNIT: &str = "nidm:unit";

/// A vocabulary term split into its syntactic form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Term<'a> {
    /// Absolute IRI (`http://...`, `urn:...`).
    Iri(&'a str),
    /// Compact IRI `prefix:local`.
    Curie { prefix: &'a str, local: &'a str },
}

/// Classify a term string. Returns `None` when it is neither form.
#[must_use]
pub fn parse_term(term: &str) -> Option<Term<'_>> {
    if term.is_empty() || term.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"')) {
        return None;
    }
    if term.contains("://") || term.starts_with("urn:") {
        return Some(Term::Iri(term));
    }

    let (prefix, local) = term.split_once(':')?;
    let mut prefix_chars = prefix.chars();
    let valid_prefix = prefix_chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && prefix_chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'));
    if !valid_prefix || local.is_empty() {
        return None;
    }
    Some(Term::Curie { prefix, local })
}

/// Prefix → namespace IRI table shared by both encoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespaces {
    prefixes: BTreeMap<String, String>,
}

impl Default for Namespaces {
    fn default() -> Self {
        let prefixes = [
            ("prov", PROV_NS),
            ("nidm", NIDM_NS),
            ("niiri", NIIRI_NS),
            ("xsd", XSD_NS),
            ("rdf", RDF_NS),
            ("rdfs", RDFS_NS),
            ("dct", DCT_NS),
            ("qc", QC_NS),
        ]
        .into_iter()
        .map(|(prefix, iri)| (prefix.to_string(), iri.to_string()))
        .collect();
        Self { prefixes }
    }
}

impl Namespaces {
    /// Built-in prefixes with `overrides` layered on top.
    #[must_use]
    pub fn with_overrides(overrides: &BTreeMap<String, String>) -> Self {
        let mut namespaces = Self::default();
        for (prefix, iri) in overrides {
            namespaces.prefixes.insert(prefix.clone(), iri.clone());
        }
        namespaces
    }

    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }

    /// Prefixes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.prefixes
            .iter()
            .map(|(prefix, iri)| (prefix.as_str(), iri.as_str()))
    }

    /// Expand a term to its absolute IRI.
    #[must_use]
    pub fn expand(&self, term: &str) -> Option<String> {
        match parse_term(term)? {
            Term::Iri(iri) => Some(iri.to_string()),
            Term::Curie { prefix, local } => self.get(prefix).map(|ns| format!("{ns}{local}")),
        }
    }

    /// Check that a term is usable in an emitted graph.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidTerm`] for malformed terms,
    /// [`CoreError::UnknownPrefix`] for CURIEs with an undeclared prefix.
    pub fn check_term(&self, term: &str) -> Result<(), CoreError> {
        match parse_term(term) {
            None => Err(CoreError::InvalidTerm {
                term: term.to_string(),
            }),
            Some(Term::Iri(_)) => Ok(()),
            Some(Term::Curie { prefix, .. }) if self.get(prefix).is_some() => Ok(()),
            Some(Term::Curie { prefix, .. }) => Err(CoreError::UnknownPrefix {
                term: term.to_string(),
                prefix: prefix.to_string(),
            }),
        }
    }
}

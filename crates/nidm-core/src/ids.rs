//! Deterministic identifiers for graph nodes.
//!
//! Every id is `niiri:<kind>-<hex>` where `<hex>` is the first 16 hex digits
//! of `sha256` over a length-prefixed, field-tagged rendering of the
//! identifying parts. Same inputs always give the same id, which makes
//! re-runs idempotent and lets graphs merge by identity.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::identity::SubjectIdentity;
use crate::software::SoftwareMetadata;

const ID_HEX_LEN: usize = 16;

/// Prefix under which minted instance identifiers live.
pub const INSTANCE_PREFIX: &str = "niiri";

/// A minted node identifier in CURIE form.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Mint an id of `kind` from named, optional parts.
///
/// Absent parts hash differently from empty strings.
#[must_use]
pub fn mint(kind: &str, parts: &[(&str, Option<&str>)]) -> EntityId {
    let mut hasher = Sha256::new();
    hash_field(&mut hasher, kind.as_bytes());
    for (name, value) in parts {
        hash_field(&mut hasher, name.as_bytes());
        match value {
            Some(value) => {
                hasher.update([1u8]);
                hash_field(&mut hasher, value.as_bytes());
            }
            None => hasher.update([0u8]),
        }
    }
    let hex = format!("{:x}", hasher.finalize());
    EntityId(format!("{INSTANCE_PREFIX}:{kind}-{}", &hex[..ID_HEX_LEN]))
}

fn hash_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

/// Id of the QC measurement entity for one record.
#[must_use]
pub fn subject_entity_id(identity: &SubjectIdentity) -> EntityId {
    mint(
        "qc",
        &[
            ("subject", Some(identity.subject.as_str())),
            ("session", identity.session.as_deref()),
            ("task", identity.task.as_deref()),
            ("acquisition", identity.acquisition.as_deref()),
            ("run", identity.run.as_deref()),
            ("suffix", identity.suffix.as_deref()),
        ],
    )
}

/// Id of the software agent.
#[must_use]
pub fn agent_id(software: &SoftwareMetadata) -> EntityId {
    mint(
        "agent",
        &[
            ("name", Some(software.name.as_str())),
            ("version", Some(software.version.as_str())),
        ],
    )
}

/// Id of the QC activity linking one entity to its agent.
#[must_use]
pub fn activity_id(entity: &EntityId, agent: &EntityId) -> EntityId {
    mint(
        "activity",
        &[("entity", Some(entity.as_str())), ("agent", Some(agent.as_str()))],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> SubjectIdentity {
        SubjectIdentity {
            subject: "0051456".into(),
            suffix: Some("T1w".into()),
            ..SubjectIdentity::default()
        }
    }

    #[test]
    fn same_identity_same_id() {
        assert_eq!(subject_entity_id(&identity()), subject_entity_id(&identity()));
    }

    #[test]
    fn id_has_expected_shape() {
        let id = subject_entity_id(&identity());
        let (prefix, local) = id.as_str().split_once(':').unwrap();
        assert_eq!(prefix, "niiri");
        let hex = local.strip_prefix("qc-").unwrap();
        assert_eq!(hex.len(), 16);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn qualifiers_change_the_id() {
        let base = subject_entity_id(&identity());
        let mut with_session = identity();
        with_session.session = Some("1".into());
        assert_ne!(base, subject_entity_id(&with_session));
    }

    #[test]
    fn source_url_does_not_change_the_id() {
        let base = subject_entity_id(&identity());
        let mut with_url = identity();
        with_url.source_url = Some("/data/mriqc/sub-0051456_T1w.html".into());
        assert_eq!(base, subject_entity_id(&with_url));
    }

    #[test]
    fn absent_and_empty_parts_differ() {
        let absent = mint("qc", &[("run", None)]);
        let empty = mint("qc", &[("run", Some(""))]);
        assert_ne!(absent, empty);
    }

    #[test]
    fn part_boundaries_are_unambiguous() {
        let a = mint("qc", &[("subject", Some("ab")), ("run", Some("c"))]);
        let b = mint("qc", &[("subject", Some("a")), ("run", Some("bc"))]);
        assert_ne!(a, b);
    }
}

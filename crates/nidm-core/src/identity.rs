use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Identity of one QC record: the BIDS entities of the image it describes.
///
/// `subject` is the participant label without the `sub-` prefix.
/// `source_url` is descriptive only and never part of any identifier.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub struct SubjectIdentity {
    pub subject: String,
    pub session: Option<String>,
    pub task: Option<String>,
    pub acquisition: Option<String>,
    pub run: Option<String>,
    /// BIDS suffix / modality (`T1w`, `bold`, ...).
    pub suffix: Option<String>,
    pub source_url: Option<String>,
}

impl SubjectIdentity {
    #[must_use]
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..Self::default()
        }
    }

    /// BIDS-style label, e.g. `sub-01_ses-pre_run-1_T1w`.
    #[must_use]
    pub fn label(&self) -> String {
        let mut parts = vec![format!("sub-{}", self.subject)];
        let entities = [
            ("ses", &self.session),
            ("task", &self.task),
            ("acq", &self.acquisition),
            ("run", &self.run),
        ];
        for (entity, value) in entities {
            if let Some(value) = value {
                parts.push(format!("{entity}-{value}"));
            }
        }
        if let Some(suffix) = &self.suffix {
            parts.push(suffix.clone());
        }
        parts.join("_")
    }
}

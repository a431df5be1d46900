//! Final-mile encoders for [`GraphDocument`]s.

pub mod jsonld;
pub mod turtle;

use nidm_core::{GraphFormat, Namespaces};

use crate::document::GraphDocument;
use crate::error::WriteError;

/// Encode `document` in `format`.
///
/// # Errors
///
/// Returns [`WriteError::Encode`] if JSON serialization fails.
pub fn encode(
    document: &GraphDocument,
    format: GraphFormat,
    namespaces: &Namespaces,
) -> Result<Vec<u8>, WriteError> {
    let text = match format {
        GraphFormat::Turtle => turtle::encode(document, namespaces),
        GraphFormat::JsonLd => jsonld::encode(document, namespaces)?,
    };
    Ok(text.into_bytes())
}

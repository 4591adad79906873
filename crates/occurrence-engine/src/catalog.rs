//! Catalog ingestion: JSON in, validated definitions out.

use tracing::debug;

use crate::error::Result;
use crate::model::EventDefinition;

/// Parse a JSON array of event definitions and validate each one.
///
/// Recurrence rules are normalized during deserialization, so legacy shapes
/// never reach the expander.
///
/// # Errors
/// Returns `EngineError::Catalog` for malformed JSON and
/// `EngineError::InvalidDefinition` for the first definition that fails
/// [`EventDefinition::validate`].
pub fn parse_catalog(json: &str) -> Result<Vec<EventDefinition>> {
    let definitions: Vec<EventDefinition> = serde_json::from_str(json)?;
    for definition in &definitions {
        definition.validate()?;
    }
    debug!(count = definitions.len(), "parsed catalog");
    Ok(definitions)
}

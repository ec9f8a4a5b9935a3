//! Parsing, validating, exporting, and schema-describing arbitrary
//! (non-built-in) StyleSpecs supplied by a caller.

use eyre::{Context, Result};
use styledoc_schema::StyleSpec;

/// Parse and type-check a caller-supplied spec. Never panics on malformed
/// input; returns a single descriptive error instead.
pub fn validate_custom_spec(json: &str) -> Result<StyleSpec> {
    let spec: StyleSpec = serde_json::from_str(json).wrap_err("custom spec is not valid StyleSpec JSON")?;
    spec.validate().map_err(|err| eyre::eyre!("custom spec failed validation: {err}"))?;
    Ok(spec)
}

/// Render the canonical JSON form of a spec.
pub fn export_spec_to_json(spec: &StyleSpec) -> Result<String> {
    serde_json::to_string_pretty(spec).wrap_err("serializing StyleSpec to JSON")
}

/// The JSON Schema describing the StyleSpec shape, for client-side form
/// generation and documentation.
pub fn get_spec_schema() -> serde_json::Value {
    let schema = schemars::schema_for!(StyleSpec);
    serde_json::to_value(schema).expect("schemars schema always serializes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic_cn::build_generic_spec;

    #[test]
    fn export_then_validate_round_trips() {
        let spec = build_generic_spec(true);
        let json = export_spec_to_json(&spec).unwrap();
        let reparsed = validate_custom_spec(&json).unwrap();
        assert_eq!(reparsed, spec);
    }

    #[test]
    fn validate_custom_spec_rejects_garbage() {
        assert!(validate_custom_spec("{not json").is_err());
        assert!(validate_custom_spec("{}").is_err());
    }

    #[test]
    fn schema_mentions_style_spec_fields() {
        let schema = get_spec_schema();
        let text = schema.to_string();
        assert!(text.contains("page"));
        assert!(text.contains("styles"));
    }
}

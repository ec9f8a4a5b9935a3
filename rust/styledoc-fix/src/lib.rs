//! Deterministic repair of a `.docx` against a `ValidationReport`: builds a
//! `Patch` from the report's suggestions and applies it via targeted XML
//! mutation, without a full mutable DOM.

mod actions;
mod xml_util;

use eyre::{Context, Result};
use styledoc_ooxml::DocxPackage;
use styledoc_schema::{Patch, PatchAction, StyleSpec, ValidationReport};
use styledoc_validate::validate_docx;

/// Collect every violation's suggestion, in report order, into a `Patch`.
pub fn build_patch_from_report(report: &ValidationReport) -> Patch {
    let actions = report
        .violations
        .iter()
        .filter_map(|violation| violation.suggestion.as_ref())
        .filter_map(|suggestion| {
            let mut value = serde_json::Map::new();
            value.insert("action".to_string(), serde_json::Value::String(suggestion.action.clone()));
            value.insert("params".to_string(), serde_json::Value::Object(suggestion.params.clone()));
            serde_json::from_value::<PatchAction>(serde_json::Value::Object(value)).ok()
        })
        .collect();
    Patch::new(actions)
}

/// Apply every action in `patch`, in order, to `package`'s `word/document.xml`.
pub fn apply_patch(package: &DocxPackage, patch: &Patch, spec: &StyleSpec) -> Result<DocxPackage> {
    let mut package = package.clone();
    let mut document_xml = package.read_xml("word/document.xml").wrap_err("reading word/document.xml to patch")?;
    for action in &patch.actions {
        document_xml = actions::apply_single_action(&document_xml, action, spec)
            .wrap_err_with(|| format!("applying patch action {}", action.name()))?;
    }
    package.write_xml("word/document.xml", document_xml);
    Ok(package)
}

/// Validate `docx_bytes` once, build a patch from the findings, and apply
/// it. A single pass; callers that want the full validate/fix iteration
/// loop (e.g. the compiler) drive `validate_docx`/`apply_patch` themselves.
pub fn fix_docx(docx_bytes: &[u8], spec: &StyleSpec) -> Result<Vec<u8>> {
    let package = DocxPackage::from_bytes(docx_bytes)?;
    let report = validate_docx(docx_bytes, spec)?;
    let patch = build_patch_from_report(&report);
    let fixed = apply_patch(&package, &patch, spec)?;
    fixed.to_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;
    use styledoc_template::generate_reference_docx;

    #[test]
    fn fix_docx_resolves_missing_toc_field() {
        let spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        let bytes = package.to_bytes().unwrap();
        let fixed = fix_docx(&bytes, &spec).unwrap();
        let report = validate_docx(&fixed, &spec).unwrap();
        assert!(!report.violations.iter().any(|v| v.id == "field.toc_missing"));
    }

    #[test]
    fn apply_patch_is_idempotent() {
        let spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        let report = validate_docx(&package.to_bytes().unwrap(), &spec).unwrap();
        let patch = build_patch_from_report(&report);
        let once = apply_patch(&package, &patch, &spec).unwrap();
        let twice = apply_patch(&once, &patch, &spec).unwrap();
        assert_eq!(once.to_bytes().unwrap(), twice.to_bytes().unwrap());
    }

    #[test]
    fn set_paragraph_style_action_fixes_unknown_style() {
        let spec = build_generic_spec(true);
        let mut package = generate_reference_docx(&spec).unwrap();
        let document_xml = package.read_xml("word/document.xml").unwrap();
        let document_xml = document_xml.replace(
            "<w:body>",
            r#"<w:body><w:p><w:pPr><w:pStyle w:val="Bogus"/></w:pPr></w:p>"#,
        );
        package.write_xml("word/document.xml", document_xml);

        let report = validate_docx(&package.to_bytes().unwrap(), &spec).unwrap();
        assert!(report.violations.iter().any(|v| v.id == "style.unknown_style"));
        let patch = build_patch_from_report(&report);
        let fixed = apply_patch(&package, &patch, &spec).unwrap();
        let report = validate_docx(&fixed.to_bytes().unwrap(), &spec).unwrap();
        assert!(!report.violations.iter().any(|v| v.id == "style.unknown_style"));
    }
}

//! Checks a compiled `.docx` against a `StyleSpec`, producing a
//! `ValidationReport` of located, actionable violations. Pure: takes package
//! bytes and a spec, returns data, never mutates anything.

mod xml_util;

use std::collections::HashSet;

use eyre::{Context, Result};
use roxmltree::{Document, Node};
use styledoc_ooxml::DocxPackage;
use styledoc_schema::{FixSuggestion, Location, PatchAction, Severity, StyleSpec, ValidationReport, Violation};

use xml_util::{descendants_with_tag, find_child, is_w, w_attr};

/// Tolerance (in OOXML twips) within which a measured margin is considered
/// to match the spec. 10 twips is about 0.18 mm, comfortably below what a
/// human editor would notice or a renderer would introduce through rounding.
pub const DEFAULT_MARGIN_TOLERANCE_TWIPS: i64 = 10;

#[derive(Debug, Clone, Copy)]
pub struct ValidatorOptions {
    pub margin_tolerance_twips: i64,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self { margin_tolerance_twips: DEFAULT_MARGIN_TOLERANCE_TWIPS }
    }
}

const STYLE_ESCAPE_SET: &[&str] = &["Normal", "DefaultParagraphFont"];

/// Validate `docx_bytes` against `spec`, using default validator options.
pub fn validate_docx(docx_bytes: &[u8], spec: &StyleSpec) -> Result<ValidationReport> {
    validate_docx_with_options(docx_bytes, spec, ValidatorOptions::default())
}

pub fn validate_docx_with_options(docx_bytes: &[u8], spec: &StyleSpec, options: ValidatorOptions) -> Result<ValidationReport> {
    let package = DocxPackage::from_bytes(docx_bytes).wrap_err("loading docx for validation")?;
    let document_xml = package.read_xml("word/document.xml").wrap_err("validated docx has no word/document.xml")?;
    let doc = Document::parse(&document_xml).wrap_err("parsing word/document.xml")?;
    let body = find_child(&doc.root_element(), "body").ok_or_else(|| eyre::eyre!("document.xml has no w:body"))?;

    let paragraphs: Vec<Node> = descendants_with_tag(body, "p").collect();

    let mut violations = Vec::new();
    violations.extend(check_margins(&body, spec, options));
    violations.extend(check_required_headings(&paragraphs, spec));
    violations.extend(check_unknown_styles(&paragraphs, spec));
    violations.extend(check_direct_formatting(&paragraphs, spec));
    violations.extend(check_toc_field(&doc, spec));

    Ok(ValidationReport::new(violations))
}

fn paragraph_style_id(paragraph: &Node) -> Option<String> {
    let ppr = find_child(paragraph, "pPr")?;
    let pstyle = find_child(&ppr, "pStyle")?;
    w_attr(&pstyle, "val").map(str::to_string)
}

fn section_properties<'a, 'input>(body: &Node<'a, 'input>, paragraphs: &[Node<'a, 'input>]) -> Option<Node<'a, 'input>> {
    find_child(body, "sectPr").or_else(|| {
        paragraphs.last().and_then(|p| find_child(p, "pPr")).and_then(|ppr| find_child(&ppr, "sectPr"))
    })
}

fn twip_attr(node: &Node, name: &str) -> Option<i64> {
    w_attr(node, name).and_then(|v| v.parse().ok())
}

fn check_margins(body: &Node, spec: &StyleSpec, options: ValidatorOptions) -> Vec<Violation> {
    let paragraphs: Vec<Node> = body.children().filter(|n| is_w(n, "p")).collect();
    let Some(sect_pr) = section_properties(body, &paragraphs) else {
        return vec![missing_section_properties_violation()];
    };
    let Some(pg_mar) = find_child(&sect_pr, "pgMar") else {
        return vec![Violation {
            id: "layout.margins_missing".to_string(),
            severity: Severity::Error,
            message: "section has no w:pgMar element".to_string(),
            location: Location::default(),
            expected: None,
            actual: None,
            suggestion: Some(FixSuggestion::from(&PatchAction::SetPageMargins {
                top_twips: spec.page.margins.top_mm_twips(),
                bottom_twips: spec.page.margins.bottom_mm_twips(),
                left_twips: spec.page.margins.left_mm_twips(),
                right_twips: spec.page.margins.right_mm_twips(),
            })),
        }];
    };

    let expected = [
        ("top", spec.page.margins.top_mm_twips()),
        ("bottom", spec.page.margins.bottom_mm_twips()),
        ("left", spec.page.margins.left_mm_twips()),
        ("right", spec.page.margins.right_mm_twips()),
    ];

    let mut violations = Vec::new();
    let mut any_margin_off = false;
    for (name, expected_twips) in expected {
        let actual_twips = twip_attr(&pg_mar, name).unwrap_or(0);
        if (actual_twips - expected_twips).abs() > options.margin_tolerance_twips {
            any_margin_off = true;
            violations.push(Violation {
                id: format!("layout.margin_{name}"),
                severity: Severity::Error,
                message: format!("page margin {name} is {actual_twips} twips, expected {expected_twips} twips"),
                location: Location::default(),
                expected: Some(expected_twips.to_string()),
                actual: Some(actual_twips.to_string()),
                suggestion: None,
            });
        }
    }
    if any_margin_off {
        let suggestion = FixSuggestion::from(&PatchAction::SetPageMargins {
            top_twips: spec.page.margins.top_mm_twips(),
            bottom_twips: spec.page.margins.bottom_mm_twips(),
            left_twips: spec.page.margins.left_mm_twips(),
            right_twips: spec.page.margins.right_mm_twips(),
        });
        for violation in violations.iter_mut() {
            violation.suggestion = Some(suggestion.clone());
        }
    }
    violations
}

fn missing_section_properties_violation() -> Violation {
    Violation {
        id: "layout.section_properties_missing".to_string(),
        severity: Severity::Error,
        message: "document has no sectPr".to_string(),
        location: Location::default(),
        expected: None,
        actual: None,
        suggestion: None,
    }
}

fn check_required_headings(paragraphs: &[Node], spec: &StyleSpec) -> Vec<Violation> {
    let present: HashSet<String> = paragraphs
        .iter()
        .filter(|p| matches!(paragraph_style_id(p).as_deref(), Some("H1") | Some("FrontHeading")))
        .map(paragraph_text)
        .map(|text| text.trim().to_string())
        .collect();

    spec.structure
        .required_h1_titles
        .iter()
        .filter(|title| !present.contains(title.as_str()))
        .map(|title| Violation {
            id: "structure.required_section_missing".to_string(),
            severity: Severity::Warning,
            message: format!("required heading {title:?} was not found"),
            location: Location::default(),
            expected: Some(title.clone()),
            actual: None,
            suggestion: None,
        })
        .collect()
}

fn paragraph_text(paragraph: &Node) -> String {
    descendants_with_tag(*paragraph, "t").map(|t| t.text().unwrap_or("")).collect()
}

fn check_unknown_styles(paragraphs: &[Node], spec: &StyleSpec) -> Vec<Violation> {
    paragraphs
        .iter()
        .enumerate()
        .filter_map(|(index, paragraph)| {
            let style_id = paragraph_style_id(paragraph)?;
            if spec.styles.contains_key(&style_id) || STYLE_ESCAPE_SET.contains(&style_id.as_str()) {
                return None;
            }
            Some(Violation {
                id: "style.unknown_style".to_string(),
                severity: Severity::Error,
                message: format!("paragraph {index} uses undefined style {style_id:?}"),
                location: Location { paragraph_index: Some(index), ..Default::default() },
                expected: None,
                actual: Some(style_id),
                suggestion: Some(FixSuggestion::from(&PatchAction::SetParagraphStyle { paragraph_index: index, style_id: "Body".to_string() })),
            })
        })
        .collect()
}

const FORBIDDEN_RUN_TAGS: &[(&str, fn(&styledoc_schema::ForbiddenDirectFormatting) -> bool)] = &[
    ("rFonts", |f| f.font),
    ("sz", |f| f.size),
    ("szCs", |f| f.size),
    ("b", |f| f.bold),
    ("bCs", |f| f.bold),
    ("i", |f| f.italic),
    ("iCs", |f| f.italic),
    ("u", |f| f.underline),
    ("color", |f| f.color),
];

fn check_direct_formatting(paragraphs: &[Node], spec: &StyleSpec) -> Vec<Violation> {
    paragraphs
        .iter()
        .enumerate()
        .filter_map(|(index, paragraph)| {
            let has_forbidden_override = descendants_with_tag(*paragraph, "rPr").any(|rpr| {
                FORBIDDEN_RUN_TAGS
                    .iter()
                    .any(|(tag, forbidden)| forbidden(&spec.forbidden_direct_formatting) && find_child(&rpr, tag).is_some())
            });
            if !has_forbidden_override {
                return None;
            }
            Some(Violation {
                id: "style.direct_formatting_forbidden".to_string(),
                severity: Severity::Error,
                message: format!("paragraph {index} has direct run formatting that the spec forbids"),
                location: Location { paragraph_index: Some(index), ..Default::default() },
                expected: None,
                actual: None,
                suggestion: Some(FixSuggestion::from(&PatchAction::ClearDirectRunFormatting { paragraph_index: index })),
            })
        })
        .collect()
}

fn check_toc_field(doc: &Document, spec: &StyleSpec) -> Vec<Violation> {
    if spec.structure.toc_max_level == 0 {
        return Vec::new();
    }
    let has_toc = descendants_with_tag(doc.root_element(), "fldSimple")
        .any(|field| w_attr(&field, "instr").is_some_and(|instr| instr.contains("TOC")));
    if has_toc {
        return Vec::new();
    }
    vec![Violation {
        id: "field.toc_missing".to_string(),
        severity: Severity::Warning,
        message: "no table-of-contents field was found".to_string(),
        location: Location::default(),
        expected: None,
        actual: None,
        suggestion: Some(FixSuggestion::from(&PatchAction::InsertTocField { max_level: spec.structure.toc_max_level })),
    }]
}

trait MarginTwips {
    fn top_mm_twips(&self) -> i64;
    fn bottom_mm_twips(&self) -> i64;
    fn left_mm_twips(&self) -> i64;
    fn right_mm_twips(&self) -> i64;
}

impl MarginTwips for styledoc_schema::MarginMm {
    fn top_mm_twips(&self) -> i64 {
        mm_to_twips(self.top)
    }
    fn bottom_mm_twips(&self) -> i64 {
        mm_to_twips(self.bottom)
    }
    fn left_mm_twips(&self) -> i64 {
        mm_to_twips(self.left + self.binding)
    }
    fn right_mm_twips(&self) -> i64 {
        mm_to_twips(self.right)
    }
}

fn mm_to_twips(mm: f64) -> i64 {
    (mm / 25.4 * 1440.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;
    use styledoc_template::generate_reference_docx;

    #[test]
    fn fresh_reference_package_has_no_margin_violations() {
        let spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        let report = validate_docx(&package.to_bytes().unwrap(), &spec).unwrap();
        assert!(!report.violations.iter().any(|v| v.id.starts_with("layout.margin")), "{:#?}", report.violations);
    }

    #[test]
    fn missing_required_headings_are_reported() {
        let spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        let report = validate_docx(&package.to_bytes().unwrap(), &spec).unwrap();
        assert!(report.violations.iter().any(|v| v.id == "structure.required_section_missing"));
    }

    #[test]
    fn toc_check_is_suppressed_when_max_level_is_zero() {
        let mut spec = build_generic_spec(true);
        spec.structure.toc_max_level = 0;
        let package = generate_reference_docx(&spec).unwrap();
        let report = validate_docx(&package.to_bytes().unwrap(), &spec).unwrap();
        assert!(!report.violations.iter().any(|v| v.id == "field.toc_missing"));
    }
}

use styledoc_schema::{MarginMm, PageNumberFormat, PageSpec};

/// A4 in twips (210mm x 297mm).
pub const A4_WIDTH_TWIPS: i64 = 11906;
pub const A4_HEIGHT_TWIPS: i64 = 16838;

fn mm_to_twips(mm: f64) -> i64 {
    (mm / 25.4 * 1440.0).round() as i64
}

pub fn margins_to_twips(margins: &MarginMm) -> (i64, i64, i64, i64) {
    (
        mm_to_twips(margins.top),
        mm_to_twips(margins.bottom),
        mm_to_twips(margins.left + margins.binding),
        mm_to_twips(margins.right),
    )
}

fn page_number_fmt_val(format: PageNumberFormat) -> &'static str {
    match format {
        PageNumberFormat::RomanUpper => "upperRoman",
        PageNumberFormat::RomanLower => "lowerRoman",
        PageNumberFormat::Decimal => "decimal",
    }
}

/// Build the `<w:sectPr>` fragment (without the footer reference — the
/// caller adds `<w:footerReference>` when the footer part exists).
pub fn build_sect_pr_body(page: &PageSpec, page_number_format: Option<PageNumberFormat>, start: Option<u32>) -> String {
    let (top, bottom, left, right) = margins_to_twips(&page.margins);
    let header = mm_to_twips(page.header_distance_mm);
    let footer = mm_to_twips(page.footer_distance_mm);
    let mut body = format!(
        r#"<w:pgSz w:w="{A4_WIDTH_TWIPS}" w:h="{A4_HEIGHT_TWIPS}"/><w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="{header}" w:footer="{footer}" w:gutter="0"/>"#
    );
    if let Some(format) = page_number_format {
        let start_attr = start.map(|s| format!(r#" w:start="{s}""#)).unwrap_or_default();
        body.push_str(&format!(r#"<w:pgNumType w:fmt="{}"{start_attr}/>"#, page_number_fmt_val(format)));
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn sect_pr_body_includes_margins_and_page_size() {
        let spec = build_generic_spec(true);
        let xml = build_sect_pr_body(&spec.page, spec.page_numbering.map(|p| p.main_matter_format), Some(1));
        assert!(xml.contains(&format!(r#"w:w="{A4_WIDTH_TWIPS}""#)));
        assert!(xml.contains(r#"w:fmt="decimal""#));
    }
}

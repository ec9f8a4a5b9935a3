//! Builders for the small WordprocessingML fragments shared by the style
//! table, the numbering definitions, and the renderer's paragraph/run
//! properties.

use styledoc_schema::{Alignment, LineSpacing, SpacingAmount, StyleDef};

pub fn alignment_val(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

/// `<w:spacing .../>` covering line spacing and before/after spacing.
pub fn spacing_element(line_spacing: LineSpacing, before: Option<SpacingAmount>, after: Option<SpacingAmount>) -> String {
    let (line, line_rule) = match line_spacing {
        LineSpacing::Single => (240, "auto"),
        LineSpacing::Line150 => (360, "auto"),
        LineSpacing::Double => (480, "auto"),
        LineSpacing::Exact { points } => ((points * 20.0).round() as i64, "exact"),
    };
    let mut attrs = format!(r#"w:line="{line}" w:lineRule="{line_rule}""#);
    if let Some(amount) = before {
        attrs.push(' ');
        attrs.push_str(&spacing_attr("before", amount));
    }
    if let Some(amount) = after {
        attrs.push(' ');
        attrs.push_str(&spacing_attr("after", amount));
    }
    format!("<w:spacing {attrs}/>")
}

fn spacing_attr(side: &str, amount: SpacingAmount) -> String {
    match amount {
        SpacingAmount::Points(points) => format!(r#"w:{side}="{}""#, (points * 20.0).round() as i64),
        SpacingAmount::Lines(lines) => format!(r#"w:{side}Lines="{}""#, (lines * 100.0).round() as i64),
    }
}

/// `<w:ind .../>` for first-line / hanging indentation expressed in
/// characters, or an empty string if both are zero.
pub fn indent_element(first_line_chars: f64, hanging_chars: f64) -> String {
    if first_line_chars <= 0.0 && hanging_chars <= 0.0 {
        return String::new();
    }
    let mut attrs = String::new();
    if first_line_chars > 0.0 {
        attrs.push_str(&format!(r#" w:firstLineChars="{}""#, (first_line_chars * 100.0).round() as i64));
    }
    if hanging_chars > 0.0 {
        attrs.push_str(&format!(r#" w:hangingChars="{}""#, (hanging_chars * 100.0).round() as i64));
    }
    format!("<w:ind{attrs}/>")
}

pub fn rfonts_element(style: &StyleDef) -> String {
    format!(
        r#"<w:rFonts w:ascii="{}" w:hAnsi="{}" w:eastAsia="{}"/>"#,
        style.fonts.ascii, style.fonts.h_ansi, style.fonts.east_asia
    )
}

pub fn run_properties(style: &StyleDef) -> String {
    let mut body = String::new();
    body.push_str(&rfonts_element(style));
    if style.run.bold {
        body.push_str("<w:b/><w:bCs/>");
    }
    if style.run.italic {
        body.push_str("<w:i/><w:iCs/>");
    }
    if style.run.underline {
        body.push_str(r#"<w:u w:val="single"/>"#);
    }
    let half_points = (style.run.size_pt * 2.0).round() as i64;
    body.push_str(&format!(r#"<w:sz w:val="{half_points}"/><w:szCs w:val="{half_points}"/>"#));
    format!("<w:rPr>{body}</w:rPr>")
}

pub fn paragraph_properties(style: &StyleDef) -> String {
    let mut body = String::new();
    if let Some(outline) = style.outline_level {
        body.push_str(&format!(r#"<w:outlineLvl w:val="{}"/>"#, outline.get()));
    }
    if style.paragraph.pagination.keep_with_next {
        body.push_str("<w:keepNext/>");
    }
    if style.paragraph.pagination.keep_lines {
        body.push_str("<w:keepLines/>");
    }
    if style.paragraph.pagination.page_break_before {
        body.push_str("<w:pageBreakBefore/>");
    }
    if !style.paragraph.pagination.widows_control {
        body.push_str(r#"<w:widowControl w:val="0"/>"#);
    }
    body.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment_val(style.paragraph.alignment)));
    body.push_str(&spacing_element(style.paragraph.line_spacing, style.paragraph.space_before, style.paragraph.space_after));
    body.push_str(&indent_element(style.paragraph.first_line_indent_chars, style.paragraph.hanging_indent_chars));
    format!("<w:pPr>{body}</w:pPr>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacing_element_uses_exact_rule_for_exact_points() {
        let out = spacing_element(LineSpacing::Exact { points: 28.0 }, None, None);
        assert!(out.contains(r#"w:line="560""#));
        assert!(out.contains(r#"w:lineRule="exact""#));
    }

    #[test]
    fn indent_element_is_empty_when_no_indent_requested() {
        assert_eq!(indent_element(0.0, 0.0), "");
    }

    #[test]
    fn indent_element_emits_first_line_chars() {
        let out = indent_element(2.0, 0.0);
        assert_eq!(out, r#"<w:ind w:firstLineChars="200"/>"#);
    }
}

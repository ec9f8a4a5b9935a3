//! Inline-run rendering. Every run property emitted here is gated on the
//! spec's forbidden-direct-formatting flags: a forbidden kind is dropped and
//! the run falls back to inheriting its paragraph style, matching the
//! validator's own checks so rendered documents never trip them.

use styledoc_schema::{ForbiddenDirectFormatting, Inline, ParagraphContent};

use crate::escape::escape_xml_text;

fn run_xml(text: &str, rpr: &str) -> String {
    let escaped = escape_xml_text(text);
    if rpr.is_empty() {
        format!(r#"<w:r><w:t xml:space="preserve">{escaped}</w:t></w:r>"#)
    } else {
        format!(r#"<w:r><w:rPr>{rpr}</w:rPr><w:t xml:space="preserve">{escaped}</w:t></w:r>"#)
    }
}

fn inline_xml(inline: &Inline, forbidden: &ForbiddenDirectFormatting) -> String {
    match inline {
        Inline::Text { text } => run_xml(text, ""),
        Inline::Bold { text } => run_xml(text, if forbidden.bold { "" } else { "<w:b/><w:bCs/>" }),
        Inline::Italic { text } => run_xml(text, if forbidden.italic { "" } else { "<w:i/><w:iCs/>" }),
        Inline::Underline { text } => run_xml(text, if forbidden.underline { "" } else { r#"<w:u w:val="single"/>"# }),
        Inline::Superscript { text } => run_xml(text, r#"<w:vertAlign w:val="superscript"/>"#),
        Inline::Subscript { text } => run_xml(text, r#"<w:vertAlign w:val="subscript"/>"#),
        Inline::Code { text } => run_xml(
            text,
            if forbidden.font {
                ""
            } else {
                r#"<w:rFonts w:ascii="Consolas" w:hAnsi="Consolas" w:eastAsia="Consolas"/>"#
            },
        ),
    }
}

pub fn inline_runs_xml(inlines: &[Inline], forbidden: &ForbiddenDirectFormatting) -> String {
    inlines.iter().map(|inline| inline_xml(inline, forbidden)).collect()
}

/// Render a paragraph's content (plain text or an inline-run sequence) to
/// concatenated `<w:r>` XML.
pub fn content_runs_xml(content: &ParagraphContent, forbidden: &ForbiddenDirectFormatting) -> String {
    match content {
        ParagraphContent::Text(text) => run_xml(text, ""),
        ParagraphContent::Inlines(inlines) => inline_runs_xml(inlines, forbidden),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_run_is_suppressed_when_forbidden() {
        let forbidden = ForbiddenDirectFormatting { bold: true, ..Default::default() };
        let xml = inline_xml(&Inline::Bold { text: "x".into() }, &forbidden);
        assert!(!xml.contains("<w:b/>"));
        assert!(xml.contains("<w:t"));
    }

    #[test]
    fn bold_run_is_emitted_when_permitted() {
        let xml = inline_xml(&Inline::Bold { text: "x".into() }, &ForbiddenDirectFormatting::default());
        assert!(xml.contains("<w:b/><w:bCs/>"));
    }

    #[test]
    fn text_is_escaped() {
        let xml = run_xml("a & b", "");
        assert!(xml.contains("a &amp; b"));
    }
}

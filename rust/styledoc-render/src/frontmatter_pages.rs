//! Cover-page and table-of-contents fragments, inserted ahead of the body
//! when requested. The TOC field is the same shape the fixer recognizes as
//! already-present, so a renderer-inserted TOC is never duplicated by a
//! later repair pass.

use styledoc_schema::{DocumentMeta, StyleSpec};

use crate::escape::escape_xml_text;
use crate::styleref::resolve;

fn title_paragraph(style_id: &str, text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        escape_xml_text(text)
    )
}

pub fn cover_fragment(meta: &DocumentMeta, spec: &StyleSpec) -> String {
    let mut out = String::new();
    if let Some(title) = &meta.title {
        out.push_str(&title_paragraph(resolve(spec, "Title", "Body"), title));
    }
    if let Some(title_en) = &meta.title_en {
        out.push_str(&title_paragraph(resolve(spec, "TitleEn", "Body"), title_en));
    }
    let meta_style = resolve(spec, "MetaLine", "Body");
    if let Some(author) = &meta.author {
        out.push_str(&title_paragraph(meta_style, author));
    }
    if let Some(advisor) = &meta.advisor {
        out.push_str(&title_paragraph(meta_style, advisor));
    }
    if let Some(program) = &meta.program {
        out.push_str(&title_paragraph(meta_style, program));
    }
    if !out.is_empty() {
        out.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
    }
    out
}

pub fn toc_fragment(spec: &StyleSpec, toc_title: &str) -> String {
    if spec.structure.toc_max_level == 0 {
        return String::new();
    }
    let style_id = resolve(spec, "FrontHeading", "Body");
    let max_level = spec.structure.toc_max_level;
    let title = escape_xml_text(toc_title);
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr><w:fldSimple w:instr="TOC \o &quot;1-{max_level}&quot; \h \z \u"><w:r><w:t xml:space="preserve">{title}</w:t></w:r></w:fldSimple></w:p><w:p><w:r><w:br w:type="page"/></w:r></w:p>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn cover_fragment_includes_title_and_author() {
        let spec = build_generic_spec(true);
        let meta = DocumentMeta { title: Some("My Thesis".into()), author: Some("A. Student".into()), ..Default::default() };
        let xml = cover_fragment(&meta, &spec);
        assert!(xml.contains("My Thesis"));
        assert!(xml.contains("A. Student"));
    }

    #[test]
    fn toc_fragment_is_empty_when_max_level_zero() {
        let mut spec = build_generic_spec(true);
        spec.structure.toc_max_level = 0;
        assert_eq!(toc_fragment(&spec, "目 录"), "");
    }

    #[test]
    fn toc_fragment_carries_max_level_into_instr() {
        let spec = build_generic_spec(true);
        assert!(toc_fragment(&spec, "目 录").contains(r#"1-3"#));
    }
}

//! Renders a `DocAst` into the `word/document.xml` body of a reference
//! `.docx` package produced by the template emitter.

pub mod blocks;
pub mod escape;
pub mod frontmatter_pages;
pub mod run;
pub mod styleref;

use eyre::Result;
use styledoc_ooxml::parts::splice_before_last;
use styledoc_ooxml::DocxPackage;
use styledoc_schema::{DocAst, StyleSpec};

use blocks::RenderState;
use frontmatter_pages::{cover_fragment, toc_fragment};

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub include_cover: bool,
    pub include_toc: bool,
    pub toc_title: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { include_cover: true, include_toc: true, toc_title: "目 录".to_string() }
    }
}

/// Render `doc`'s blocks into `reference`'s `word/document.xml`, ahead of
/// its existing `sectPr`, honoring `options` for the optional cover page and
/// table-of-contents field.
pub fn render_docx(doc: &DocAst, spec: &StyleSpec, reference: DocxPackage, options: &RenderOptions) -> Result<DocxPackage> {
    let mut body = String::new();

    if options.include_cover {
        body.push_str(&cover_fragment(&doc.meta, spec));
    }
    if options.include_toc {
        body.push_str(&toc_fragment(spec, &options.toc_title));
    }

    let mut state = RenderState::new();
    for block in &doc.blocks {
        body.push_str(&blocks::render_block(block, spec, &mut state));
    }

    let mut package = reference;
    let document_xml = package.read_xml("word/document.xml")?;
    let document_xml = splice_before_last(&document_xml, "<w:sectPr", &body)?;
    package.write_xml("word/document.xml", document_xml);
    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_schema::{Block, DocumentMeta, HeadingLevel, ParagraphContent};
    use styledoc_specs::build_generic_spec;
    use styledoc_validate::validate_docx;

    fn sample_doc() -> DocAst {
        DocAst::new(
            DocumentMeta { title: Some("示例论文".into()), author: Some("张三".into()), ..Default::default() },
            vec![
                Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "摘要".into() },
                Block::Paragraph { content: ParagraphContent::Text("这是摘要正文。".into()) },
                Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "引言".into() },
                Block::Paragraph { content: ParagraphContent::Text("正文内容。".into()) },
                Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "致谢".into() },
                Block::Paragraph { content: ParagraphContent::Text("感谢。".into()) },
                Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "参考文献".into() },
                Block::Bibliography { items: vec!["[1] Author, Title.".into()] },
            ],
        )
    }

    #[test]
    fn render_docx_inserts_body_before_sect_pr() {
        let spec = build_generic_spec(true);
        let reference = styledoc_template::generate_reference_docx(&spec).unwrap();
        let doc = sample_doc();
        let rendered = render_docx(&doc, &spec, reference, &RenderOptions::default()).unwrap();
        let xml = rendered.read_xml("word/document.xml").unwrap();
        let body_start = xml.find("<w:body>").unwrap();
        let sect_pr_start = xml.find("<w:sectPr").unwrap();
        let heading_pos = xml.find("摘要").unwrap();
        assert!(body_start < heading_pos && heading_pos < sect_pr_start);
    }

    #[test]
    fn render_docx_without_required_headings_produces_no_toc_or_style_violations() {
        let spec = build_generic_spec(true);
        let reference = styledoc_template::generate_reference_docx(&spec).unwrap();
        let doc = sample_doc();
        let rendered = render_docx(&doc, &spec, reference, &RenderOptions::default()).unwrap();
        let bytes = rendered.to_bytes().unwrap();
        let report = validate_docx(&bytes, &spec).unwrap();
        assert!(!report.violations.iter().any(|v| v.id == "field.toc_missing"));
        assert!(!report.violations.iter().any(|v| v.id == "style.unknown_style"));
    }
}

//! Maps each `Block` variant to paragraph/table WordprocessingML, tracking
//! the abstract/keywords section state that decides which body style a
//! plain paragraph inherits.

use styledoc_schema::{Block, StyleSpec};

use crate::escape::escape_xml_text;
use crate::run::{content_runs_xml, inline_runs_xml};
use crate::styleref::resolve;

const ABSTRACT_HEADING_NAMES: &[&str] = &["摘要", "Abstract", "ABSTRACT"];
const KEYWORDS_HEADING_NAMES: &[&str] = &["关键词", "关键字", "Keywords", "Key Words", "KEY WORDS"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Normal,
    Abstract,
    Keywords,
}

/// Tracks which body style a plain paragraph should inherit, updated as
/// headings are encountered in document order.
#[derive(Debug, Default)]
pub struct RenderState {
    section: Section,
}

impl RenderState {
    pub fn new() -> Self {
        Self::default()
    }

    fn note_heading(&mut self, text: &str) {
        let trimmed = text.trim();
        self.section = if ABSTRACT_HEADING_NAMES.contains(&trimmed) {
            Section::Abstract
        } else if KEYWORDS_HEADING_NAMES.contains(&trimmed) {
            Section::Keywords
        } else {
            Section::Normal
        };
    }
}

fn paragraph_xml(style_id: &str, runs: &str) -> String {
    format!(r#"<w:p><w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>{runs}</w:p>"#)
}

fn text_paragraph(style_id: &str, text: &str) -> String {
    paragraph_xml(style_id, &format!(r#"<w:r><w:t xml:space="preserve">{}</w:t></w:r>"#, escape_xml_text(text)))
}

fn heading_style_id(spec: &StyleSpec, level: styledoc_schema::HeadingLevel) -> String {
    match spec.style(level) {
        Some(style) => style.style_id.clone(),
        None => match level.get() {
            1 => "H1".to_string(),
            2 => "H2".to_string(),
            _ => "H3".to_string(),
        },
    }
}

fn table_xml(spec: &StyleSpec, rows: &[Vec<String>], caption: Option<&str>) -> String {
    let mut out = String::new();
    if let Some(caption) = caption {
        out.push_str(&text_paragraph(resolve(spec, "TableTitle", "Body"), caption));
    }
    let text_style = resolve(spec, "TableText", "Body");
    let mut tbl = String::from(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/></w:tblPr>"#);
    for row in rows {
        let mut tr = String::from("<w:tr>");
        for cell in row {
            tr.push_str(&format!("<w:tc><w:tcPr/>{}</w:tc>", text_paragraph(text_style, cell)));
        }
        tr.push_str("</w:tr>");
        tbl.push_str(&tr);
    }
    tbl.push_str("</w:tbl>");
    out.push_str(&tbl);
    out
}

fn list_xml(spec: &StyleSpec, ordered: bool, items: &[Vec<styledoc_schema::Inline>]) -> String {
    let style_id = if ordered { resolve(spec, "ListNumber", "Body") } else { resolve(spec, "ListBullet", "Body") };
    items
        .iter()
        .map(|item| paragraph_xml(style_id, &inline_runs_xml(item, &spec.forbidden_direct_formatting)))
        .collect()
}

fn figure_xml(spec: &StyleSpec, src: &str, caption: Option<&str>) -> String {
    let mut out = text_paragraph(resolve(spec, "Figure", "Body"), &format!("[{src}]"));
    if let Some(caption) = caption {
        out.push_str(&text_paragraph(resolve(spec, "FigureCaption", "Body"), caption));
    }
    out
}

fn page_break_xml() -> String {
    r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#.to_string()
}

/// A `SectionBreak` is realized as a paragraph whose own `pPr` carries a
/// nested `sectPr`, the OOXML idiom for a mid-document section boundary.
fn section_break_xml(spec: &StyleSpec, next_page: bool) -> String {
    let page_number_format = spec.page_numbering.map(|p| p.main_matter_format);
    let start = spec.page_numbering.map(|p| p.main_matter_start);
    let sect_pr = styledoc_template::build_sect_pr_body(&spec.page, page_number_format, start);
    let break_type = if next_page { "nextPage" } else { "continuous" };
    format!(r#"<w:p><w:pPr><w:sectPr><w:type w:val="{break_type}"/>{sect_pr}</w:sectPr></w:pPr></w:p>"#)
}

pub fn render_block(block: &Block, spec: &StyleSpec, state: &mut RenderState) -> String {
    match block {
        Block::Heading { level, text } => {
            state.note_heading(text);
            text_paragraph(&heading_style_id(spec, *level), text)
        }
        Block::Paragraph { content } => {
            let style_id = match state.section {
                Section::Normal => resolve(spec, "Body", "Normal"),
                Section::Abstract => resolve(spec, "AbstractBody", "Body"),
                Section::Keywords => resolve(spec, "KeywordsBody", "Body"),
            };
            paragraph_xml(style_id, &content_runs_xml(content, &spec.forbidden_direct_formatting))
        }
        Block::List { ordered, items } => list_xml(spec, *ordered, items),
        Block::Table { rows, caption } => table_xml(spec, rows, caption.as_deref()),
        Block::Figure { src, caption } => figure_xml(spec, src, caption.as_deref()),
        Block::PageBreak => page_break_xml(),
        Block::SectionBreak { next_page } => section_break_xml(spec, *next_page),
        Block::Bibliography { items } => {
            let style_id = resolve(spec, "Reference", "Body");
            items.iter().map(|item| text_paragraph(style_id, item)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_schema::HeadingLevel;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn heading_switches_to_abstract_body_style_for_following_paragraph() {
        let spec = build_generic_spec(true);
        let mut state = RenderState::new();
        let heading = Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "摘要".into() };
        let para = Block::Paragraph { content: styledoc_schema::ParagraphContent::Text("body text".into()) };

        render_block(&heading, &spec, &mut state);
        let xml = render_block(&para, &spec, &mut state);
        assert!(xml.contains(r#"w:val="AbstractBody""#));
    }

    #[test]
    fn plain_paragraph_after_normal_heading_uses_body_style() {
        let spec = build_generic_spec(true);
        let mut state = RenderState::new();
        let heading = Block::Heading { level: HeadingLevel::try_from(1).unwrap(), text: "引言".into() };
        let para = Block::Paragraph { content: styledoc_schema::ParagraphContent::Text("body text".into()) };

        render_block(&heading, &spec, &mut state);
        let xml = render_block(&para, &spec, &mut state);
        assert!(xml.contains(r#"w:val="Body""#));
    }

    #[test]
    fn page_break_emits_break_run() {
        assert!(page_break_xml().contains(r#"w:type="page""#));
    }
}

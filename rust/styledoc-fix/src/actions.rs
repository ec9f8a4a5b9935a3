use eyre::{Context, Result};
use roxmltree::{Document, Node};
use styledoc_schema::{ForbiddenDirectFormatting, PatchAction, StyleSpec};

use crate::xml_util::{apply_replacements, find_child, is_w, paragraph_style_id, w_attr};

const FORBIDDEN_RUN_TAGS: &[(&str, fn(&ForbiddenDirectFormatting) -> bool)] = &[
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

fn body<'a, 'input>(doc: &'a Document<'input>) -> Result<Node<'a, 'input>> {
    find_child(&doc.root_element(), "body").ok_or_else(|| eyre::eyre!("document.xml has no w:body"))
}

fn paragraphs<'a, 'input>(body: &Node<'a, 'input>) -> Vec<Node<'a, 'input>> {
    body.children().filter(|n| is_w(n, "p")).collect()
}

fn section_properties<'a, 'input>(body: &Node<'a, 'input>, paragraphs: &[Node<'a, 'input>]) -> Option<Node<'a, 'input>> {
    find_child(body, "sectPr").or_else(|| paragraphs.last().and_then(|p| find_child(p, "pPr")).and_then(|ppr| find_child(&ppr, "sectPr")))
}

fn open_tag_end(xml: &str, node: &Node) -> usize {
    let range = node.range();
    let slice = &xml[range.clone()];
    slice.find('>').map(|offset| range.start + offset + 1).unwrap_or(range.start)
}

fn set_page_margins(xml: &str, top: i64, bottom: i64, left: i64, right: i64) -> Result<String> {
    let doc = Document::parse(xml).wrap_err("parsing document.xml")?;
    let body_node = body(&doc)?;
    let paras = paragraphs(&body_node);
    let sect_pr = section_properties(&body_node, &paras).ok_or_else(|| eyre::eyre!("document has no sectPr to set margins on"))?;

    if let Some(pg_mar) = find_child(&sect_pr, "pgMar") {
        let header = w_attr(&pg_mar, "header").unwrap_or("0");
        let footer = w_attr(&pg_mar, "footer").unwrap_or("0");
        let gutter = w_attr(&pg_mar, "gutter").unwrap_or("0");
        let replacement = format!(
            r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="{header}" w:footer="{footer}" w:gutter="{gutter}"/>"#
        );
        Ok(apply_replacements(xml, vec![(pg_mar.range(), replacement)]))
    } else {
        let insert_at = open_tag_end(xml, &sect_pr);
        let fragment = format!(r#"<w:pgMar w:top="{top}" w:right="{right}" w:bottom="{bottom}" w:left="{left}" w:header="0" w:footer="0" w:gutter="0"/>"#);
        Ok(apply_replacements(xml, vec![(insert_at..insert_at, fragment)]))
    }
}

fn set_paragraph_style(xml: &str, paragraph_index: usize, style_id: &str) -> Result<String> {
    let doc = Document::parse(xml).wrap_err("parsing document.xml")?;
    let body_node = body(&doc)?;
    let paras = paragraphs(&body_node);
    let paragraph = paras
        .get(paragraph_index)
        .ok_or_else(|| eyre::eyre!("paragraph index {paragraph_index} out of range ({} paragraphs)", paras.len()))?;

    if let Some(ppr) = find_child(paragraph, "pPr") {
        if let Some(pstyle) = find_child(&ppr, "pStyle") {
            let replacement = format!(r#"<w:pStyle w:val="{style_id}"/>"#);
            Ok(apply_replacements(xml, vec![(pstyle.range(), replacement)]))
        } else {
            let insert_at = open_tag_end(xml, &ppr);
            let fragment = format!(r#"<w:pStyle w:val="{style_id}"/>"#);
            Ok(apply_replacements(xml, vec![(insert_at..insert_at, fragment)]))
        }
    } else {
        let insert_at = open_tag_end(xml, paragraph);
        let fragment = format!(r#"<w:pPr><w:pStyle w:val="{style_id}"/></w:pPr>"#);
        Ok(apply_replacements(xml, vec![(insert_at..insert_at, fragment)]))
    }
}

fn clear_direct_run_formatting(xml: &str, paragraph_index: usize, forbidden: &ForbiddenDirectFormatting) -> Result<String> {
    let doc = Document::parse(xml).wrap_err("parsing document.xml")?;
    let body_node = body(&doc)?;
    let paras = paragraphs(&body_node);
    let paragraph = paras
        .get(paragraph_index)
        .ok_or_else(|| eyre::eyre!("paragraph index {paragraph_index} out of range ({} paragraphs)", paras.len()))?;

    let mut replacements = Vec::new();
    for rpr in paragraph.descendants().filter(|n| is_w(n, "rPr")) {
        let kept: String = rpr
            .children()
            .filter(|child| {
                child.is_element()
                    && !FORBIDDEN_RUN_TAGS
                        .iter()
                        .any(|(tag, is_forbidden)| child.tag_name().name() == *tag && is_forbidden(forbidden))
            })
            .map(|child| &xml[child.range()])
            .collect();
        let replacement = if kept.is_empty() { String::new() } else { format!("<w:rPr>{kept}</w:rPr>") };
        replacements.push((rpr.range(), replacement));
    }
    Ok(apply_replacements(xml, replacements))
}

fn insert_toc_field(xml: &str, max_level: u8) -> Result<String> {
    let doc = Document::parse(xml).wrap_err("parsing document.xml")?;
    let already_present = doc
        .descendants()
        .filter(|n| is_w(n, "fldSimple"))
        .any(|field| w_attr(&field, "instr").is_some_and(|instr| instr.contains("TOC")));
    if already_present {
        return Ok(xml.to_string());
    }

    let body_node = body(&doc)?;
    let paras = paragraphs(&body_node);
    let insert_at = paras
        .iter()
        .find(|p| matches!(paragraph_style_id(p).as_deref(), Some("H1") | Some("FrontHeading")))
        .map(|p| p.range().start)
        .unwrap_or_else(|| open_tag_end(xml, &body_node));

    let fragment = format!(
        r#"<w:p><w:pPr><w:pStyle w:val="FrontHeading"/></w:pPr><w:fldSimple w:instr="TOC \o &quot;1-{max_level}&quot; \h \z \u"><w:r><w:t>Table of Contents</w:t></w:r></w:fldSimple></w:p>"#
    );
    Ok(apply_replacements(xml, vec![(insert_at..insert_at, fragment)]))
}

pub fn apply_single_action(document_xml: &str, action: &PatchAction, spec: &StyleSpec) -> Result<String> {
    match action {
        PatchAction::SetPageMargins { top_twips, bottom_twips, left_twips, right_twips } => {
            set_page_margins(document_xml, *top_twips, *bottom_twips, *left_twips, *right_twips)
        }
        PatchAction::SetParagraphStyle { paragraph_index, style_id } => {
            set_paragraph_style(document_xml, *paragraph_index, style_id)
        }
        PatchAction::ClearDirectRunFormatting { paragraph_index } => {
            clear_direct_run_formatting(document_xml, *paragraph_index, &spec.forbidden_direct_formatting)
        }
        PatchAction::InsertTocField { max_level } => insert_toc_field(document_xml, *max_level),
    }
}

use eyre::Result;
use styledoc_ooxml::parts::{insert_content_type_override, insert_relationship_with_id};
use styledoc_ooxml::DocxPackage;
use styledoc_schema::StyleSpec;

use crate::fragments::alignment_val;
use crate::numbering_part::build_numbering_xml;
use crate::section_part::build_sect_pr_body;
use crate::styles_part::build_styles_xml;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/></Types>"#;

const ROOT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#;

fn empty_document_xml(sect_pr: &str) -> String {
    format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:sectPr>{sect_pr}</w:sectPr></w:body></w:document>"#
    )
}

fn footer_xml(alignment: styledoc_schema::Alignment) -> String {
    format!(
        r#"<w:ftr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p><w:pPr><w:jc w:val="{jc}"/></w:pPr><w:fldSimple w:instr="PAGE"><w:r><w:t>1</w:t></w:r></w:fldSimple></w:p></w:ftr>"#,
        jc = alignment_val(alignment)
    )
}

/// Build a fresh reference `.docx` package encoding `spec`'s style table,
/// numbering scheme, and section properties.
pub fn generate_reference_docx(spec: &StyleSpec) -> Result<DocxPackage> {
    let mut package = DocxPackage::default();

    let page_number_format = spec.page_numbering.map(|p| p.main_matter_format);
    let start = spec.page_numbering.map(|p| p.main_matter_start);
    let mut sect_pr = build_sect_pr_body(&spec.page, page_number_format, start);

    let mut content_types = CONTENT_TYPES.to_string();
    let mut document_rels = DOCUMENT_RELS.to_string();

    content_types = insert_content_type_override(
        &content_types,
        "/word/document.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml",
    )?;
    content_types = insert_content_type_override(
        &content_types,
        "/word/styles.xml",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml",
    )?;
    document_rels = insert_relationship_with_id(
        &document_rels,
        "rId1",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles",
        "styles.xml",
    )?;
    package.write_xml("word/styles.xml", build_styles_xml(spec));

    if let Some(numbering) = &spec.numbering {
        content_types = insert_content_type_override(
            &content_types,
            "/word/numbering.xml",
            "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml",
        )?;
        document_rels = insert_relationship_with_id(
            &document_rels,
            "rId2",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering",
            "numbering.xml",
        )?;
        package.write_xml("word/numbering.xml", build_numbering_xml(numbering));
    }

    if let Some(page_numbering) = &spec.page_numbering {
        if page_numbering.show_in_footer {
            content_types = insert_content_type_override(
                &content_types,
                "/word/footer1.xml",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml",
            )?;
            document_rels = insert_relationship_with_id(
                &document_rels,
                "rId3",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer",
                "footer1.xml",
            )?;
            package.write_xml("word/footer1.xml", footer_xml(page_numbering.footer_alignment));
            sect_pr = format!(
                r#"<w:footerReference w:type="default" r:id="rId3"/>{sect_pr}"#
            );
        }
    }

    package.write_xml("[Content_Types].xml", content_types);
    package.write_xml("_rels/.rels", ROOT_RELS.to_string());
    package.write_xml("word/_rels/document.xml.rels", document_rels);

    let document_xml = if spec.page_numbering.is_some() {
        empty_document_xml(&sect_pr).replacen(
            "<w:document ",
            r#"<w:document xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
            1,
        )
    } else {
        empty_document_xml(&sect_pr)
    };
    package.write_xml("word/document.xml", document_xml);

    Ok(package)
}

/// Update the styles/numbering/section parts of an existing package to match
/// `spec`, leaving its body content untouched.
pub fn patch_reference_docx(spec: &StyleSpec, mut package: DocxPackage) -> Result<DocxPackage> {
    package.write_xml("word/styles.xml", build_styles_xml(spec));
    if let Some(numbering) = &spec.numbering {
        package.write_xml("word/numbering.xml", build_numbering_xml(numbering));
    }

    let document_xml = package.read_xml("word/document.xml")?;
    let page_number_format = spec.page_numbering.map(|p| p.main_matter_format);
    let start = spec.page_numbering.map(|p| p.main_matter_start);
    let new_sect_pr = build_sect_pr_body(&spec.page, page_number_format, start);
    let document_xml = replace_section_properties(&document_xml, &new_sect_pr)?;
    package.write_xml("word/document.xml", document_xml);

    Ok(package)
}

/// Replace the contents of the (first) `<w:sectPr>` element with `new_body`.
pub fn replace_section_properties(document_xml: &str, new_body: &str) -> Result<String> {
    let start = document_xml
        .find("<w:sectPr")
        .ok_or_else(|| eyre::eyre!("document.xml has no w:sectPr to replace"))?;
    let open_end = document_xml[start..]
        .find('>')
        .map(|offset| start + offset + 1)
        .ok_or_else(|| eyre::eyre!("malformed w:sectPr open tag"))?;
    let close = document_xml[open_end..]
        .find("</w:sectPr>")
        .map(|offset| open_end + offset)
        .ok_or_else(|| eyre::eyre!("document.xml has no matching </w:sectPr>"))?;
    let mut out = String::with_capacity(document_xml.len());
    out.push_str(&document_xml[..open_end]);
    out.push_str(new_body);
    out.push_str(&document_xml[close..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn generate_reference_docx_round_trips_through_bytes() {
        let spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        let bytes = package.to_bytes().unwrap();
        let reloaded = DocxPackage::from_bytes(&bytes).unwrap();
        assert!(reloaded.read_xml("word/styles.xml").unwrap().contains("Body"));
    }

    #[test]
    fn patch_reference_docx_updates_margins_in_place() {
        let mut spec = build_generic_spec(true);
        let package = generate_reference_docx(&spec).unwrap();
        spec.page.margins.top = 30.0;
        let patched = patch_reference_docx(&spec, package).unwrap();
        let xml = patched.read_xml("word/document.xml").unwrap();
        assert!(xml.contains(r#"w:top="1701""#));
    }
}

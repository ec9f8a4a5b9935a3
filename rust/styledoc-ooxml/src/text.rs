//! Plain-text extraction from a `.docx` package, for previewing or feeding
//! uploaded documents back into the compiler as input text.

use eyre::Result;

use crate::package::DocxPackage;
use crate::xml_util::{descendants_with_tag, is_w};

fn paragraph_text(paragraph: roxmltree::Node) -> String {
    descendants_with_tag(paragraph, "t").map(|node| node.text().unwrap_or("")).collect::<String>()
}

/// Extracts every paragraph's text (document body, then table cells),
/// joined with newlines, skipping blank paragraphs. Mirrors reading
/// `python-docx`'s `doc.paragraphs` then `doc.tables` in sequence.
pub fn extract_plain_text(package: &DocxPackage) -> Result<String> {
    let xml = package.read_xml("word/document.xml")?;
    let doc = roxmltree::Document::parse(&xml)?;
    let body = doc.root_element().children().find(|node| is_w(node, "body")).ok_or_else(|| eyre::eyre!("word/document.xml has no <w:body>"))?;

    let mut parts = Vec::new();

    for paragraph in body.children().filter(|node| is_w(node, "p")) {
        let text = paragraph_text(paragraph);
        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed.to_string());
        }
    }

    for table in descendants_with_tag(body, "tbl") {
        for row in descendants_with_tag(table, "tr") {
            for cell in descendants_with_tag(row, "tc") {
                let text = descendants_with_tag(cell, "p").map(paragraph_text).collect::<Vec<_>>().join("\n");
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    parts.push(trimmed.to_string());
                }
            }
        }
    }

    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package::DocxPackage;

    fn package_with_document(document_xml: &str) -> DocxPackage {
        let mut package = DocxPackage::default();
        package.write_xml("word/document.xml", document_xml.to_string());
        package
    }

    #[test]
    fn extracts_paragraph_text_and_skips_blank_paragraphs() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world</w:t></w:r></w:p>
                <w:p></w:p>
                <w:p><w:r><w:t>Second paragraph</w:t></w:r></w:p>
            </w:body>
        </w:document>"#;
        let package = package_with_document(xml);
        let text = extract_plain_text(&package).unwrap();
        assert_eq!(text, "Hello world\nSecond paragraph");
    }

    #[test]
    fn extracts_table_cell_text_after_body_paragraphs() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
            <w:body>
                <w:p><w:r><w:t>Intro</w:t></w:r></w:p>
                <w:tbl>
                    <w:tr><w:tc><w:p><w:r><w:t>A1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>B1</w:t></w:r></w:p></w:tc></w:tr>
                </w:tbl>
            </w:body>
        </w:document>"#;
        let package = package_with_document(xml);
        let text = extract_plain_text(&package).unwrap();
        assert_eq!(text, "Intro\nA1\nB1");
    }
}

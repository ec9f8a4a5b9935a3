//! Small helpers for walking a parsed `word/document.xml` without fighting
//! namespace prefixes.

use roxmltree::Node;

pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORDML_NS)
}

pub fn descendants_with_tag<'a, 'input>(node: Node<'a, 'input>, name: &'a str) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants().filter(move |n| is_w(n, name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn is_w_matches_regardless_of_prefix() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body/></w:document>"#;
        let doc = roxmltree::Document::parse(xml).unwrap();
        let body = doc.root_element().first_element_child().unwrap();
        assert!(is_w(&body, "body"));
    }
}

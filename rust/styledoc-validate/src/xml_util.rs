//! Small helpers for walking a parsed `word/document.xml` without fighting
//! namespace prefixes.

use roxmltree::Node;

pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// True if `node` is a WordprocessingML element with local name `name`,
/// regardless of which prefix the document happened to use for that
/// namespace.
pub fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORDML_NS)
}

pub fn find_child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_w(child, name))
}

pub fn w_attr<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|attr| attr.name() == name && attr.namespace() == Some(WORDML_NS)).map(|attr| attr.value())
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
        let body = find_child(&doc.root_element(), "body").unwrap();
        assert!(is_w(&body, "body"));
    }
}

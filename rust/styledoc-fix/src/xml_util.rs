use roxmltree::Node;

pub const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

pub fn is_w(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(WORDML_NS)
}

pub fn find_child<'a, 'input>(node: &Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_w(child, name))
}

pub fn w_attr<'a>(node: &Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes().find(|attr| attr.name() == name && attr.namespace() == Some(WORDML_NS)).map(|attr| attr.value())
}

pub fn paragraph_style_id(paragraph: &Node) -> Option<String> {
    let ppr = find_child(paragraph, "pPr")?;
    let pstyle = find_child(&ppr, "pStyle")?;
    w_attr(&pstyle, "val").map(str::to_string)
}

/// Apply a set of non-overlapping byte-range replacements to `text`, highest
/// offset first so earlier ranges stay valid.
pub fn apply_replacements(text: &str, mut replacements: Vec<(std::ops::Range<usize>, String)>) -> String {
    replacements.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut out = text.to_string();
    for (range, replacement) in replacements {
        out.replace_range(range, &replacement);
    }
    out
}

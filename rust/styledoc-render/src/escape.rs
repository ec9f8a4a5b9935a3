/// Escape text for inclusion inside a WordprocessingML `<w:t>` element.
pub fn escape_xml_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_xml_attr(text: &str) -> String {
    let mut out = escape_xml_text(text);
    out = out.replace('"', "&quot;");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_ampersand_and_angle_brackets() {
        assert_eq!(escape_xml_text("a & b < c > d"), "a &amp; b &lt; c &gt; d");
    }
}

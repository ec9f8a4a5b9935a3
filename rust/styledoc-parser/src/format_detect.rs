//! Heuristically decide whether free-form input is Markdown or plain text.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Markdown,
    PlainText,
}

/// Count Markdown indicators and classify as Markdown once at least two are
/// present.
pub fn detect_input_format(text: &str) -> InputFormat {
    let head: String = text.chars().take(500).collect();
    let mut indicators = 0;

    if head.trim_start().starts_with("---") {
        indicators += 1;
    }
    if head.lines().any(|line| {
        let trimmed = line.trim_start();
        trimmed.starts_with("# ") || trimmed.starts_with("## ") || trimmed.starts_with("### ")
    }) {
        indicators += 1;
    }
    if head.contains("```") {
        indicators += 1;
    }
    if head.contains("![") {
        indicators += 1;
    }
    if head.lines().any(|line| line.trim_start().starts_with('|') && line.trim_end().ends_with('|')) {
        indicators += 1;
    }
    if head.lines().any(|line| {
        let trimmed = line.trim_start();
        trimmed.starts_with("- ") || trimmed.starts_with("* ") || trimmed.starts_with("1. ")
    }) {
        indicators += 1;
    }

    if indicators >= 2 {
        InputFormat::Markdown
    } else {
        InputFormat::PlainText
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_markdown_with_heading_and_frontmatter() {
        let text = "---\ntitle: x\n---\n# Heading\n";
        assert_eq!(detect_input_format(text), InputFormat::Markdown);
    }

    #[test]
    fn plain_text_with_single_indicator_stays_plaintext() {
        let text = "# Just one heading marker, nothing else of note here.";
        assert_eq!(detect_input_format(text), InputFormat::PlainText);
    }
}

//! A lightweight, regex-delimited front-matter scan: a leading block framed
//! by `---` lines, parsed as YAML but never allowed to hard-fail the parse —
//! malformed or non-object front matter degrades to "no metadata" with a
//! warning rather than rejecting the whole document.

use std::sync::LazyLock;

use regex::Regex;

static FRONT_MATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^-{3,}\n(.*?)\n-{3,}\n?").expect("static front matter regex is valid"));

/// Split `input` into an optional front-matter value and the remaining body.
/// Returns `(None, input)` unchanged when there is no leading `---` block or
/// it does not parse as a YAML mapping.
pub fn split_front_matter(input: &str) -> (Option<serde_json::Value>, &str) {
    let Some(captures) = FRONT_MATTER_RE.captures(input) else {
        return (None, input);
    };
    let whole_match = captures.get(0).expect("group 0 always matches");
    let block = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
    let body = &input[whole_match.end()..];

    match serde_yaml::from_str::<serde_json::Value>(block) {
        Ok(value @ serde_json::Value::Object(_)) => (Some(value), body),
        Ok(_) => {
            tracing::warn!("front matter block did not parse as a mapping; ignoring it");
            (None, body)
        }
        Err(error) => {
            tracing::warn!(%error, "front matter block failed to parse as YAML; ignoring it");
            (None, body)
        }
    }
}

pub fn string_field(value: &serde_json::Value, key: &str) -> Option<String> {
    value.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_front_matter_extracts_mapping_and_body() {
        let input = "---\ntitle: My Thesis\nauthor: A. Student\n---\n# Heading\n";
        let (front, body) = split_front_matter(input);
        let front = front.unwrap();
        assert_eq!(string_field(&front, "title").unwrap(), "My Thesis");
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn split_front_matter_tolerates_absence() {
        let (front, body) = split_front_matter("# Heading\n");
        assert!(front.is_none());
        assert_eq!(body, "# Heading\n");
    }

    #[test]
    fn split_front_matter_ignores_non_mapping_yaml() {
        let (front, _) = split_front_matter("---\n- a\n- b\n---\nbody");
        assert!(front.is_none());
    }
}

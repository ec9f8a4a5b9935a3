//! Targeted string-splice helpers for mutating well-known OOXML parts
//! without a full mutable XML DOM. Every mutation site in this system is a
//! handful of named parts with a well-known closing tag, so a splice before
//! that tag is simpler and just as correct as round-tripping through a
//! general-purpose tree builder.

/// Insert `fragment` immediately before the last occurrence of `before_tag`
/// (e.g. `"</w:body>"`) in `xml`. Returns an error if the tag is absent.
pub fn splice_before_last(xml: &str, before_tag: &str, fragment: &str) -> eyre::Result<String> {
    let at = xml
        .rfind(before_tag)
        .ok_or_else(|| eyre::eyre!("xml part has no {before_tag:?} to splice before"))?;
    let mut out = String::with_capacity(xml.len() + fragment.len());
    out.push_str(&xml[..at]);
    out.push_str(fragment);
    out.push_str(&xml[at..]);
    Ok(out)
}

/// Insert `fragment` immediately after the first occurrence of `after_tag`.
pub fn splice_after_first(xml: &str, after_tag: &str, fragment: &str) -> eyre::Result<String> {
    let at = xml
        .find(after_tag)
        .ok_or_else(|| eyre::eyre!("xml part has no {after_tag:?} to splice after"))?;
    let insert_at = at + after_tag.len();
    let mut out = String::with_capacity(xml.len() + fragment.len());
    out.push_str(&xml[..insert_at]);
    out.push_str(fragment);
    out.push_str(&xml[insert_at..]);
    Ok(out)
}

/// Register a content-type override for `part_name` in `[Content_Types].xml`
/// if one is not already present.
pub fn insert_content_type_override(xml: &str, part_name: &str, content_type: &str) -> eyre::Result<String> {
    let needle = format!(r#"PartName="{part_name}""#);
    if xml.contains(&needle) {
        return Ok(xml.to_string());
    }
    let fragment = format!(r#"<Override PartName="{part_name}" ContentType="{content_type}"/>"#);
    splice_before_last(xml, "</Types>", &fragment)
}

/// Append a relationship to a `.rels` part, auto-assigning the next
/// `rIdN` identifier.
pub fn insert_relationship(xml: &str, rel_type: &str, target: &str) -> eyre::Result<String> {
    let next = next_relationship_id(xml);
    insert_relationship_with_id(xml, &next, rel_type, target)
}

/// Append a relationship to a `.rels` part with a caller-chosen id.
pub fn insert_relationship_with_id(xml: &str, id: &str, rel_type: &str, target: &str) -> eyre::Result<String> {
    let fragment = format!(r#"<Relationship Id="{id}" Type="{rel_type}" Target="{target}"/>"#);
    splice_before_last(xml, "</Relationships>", &fragment)
}

fn next_relationship_id(xml: &str) -> String {
    let max = xml
        .match_indices(r#"Id="rId"#)
        .filter_map(|(pos, _)| {
            let rest = &xml[pos + 4..];
            let end = rest.find('"')?;
            rest[..end].strip_prefix("rId")?.parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splice_before_last_inserts_immediately_before_tag() {
        let xml = "<root><a/></root>";
        let out = splice_before_last(xml, "</root>", "<b/>").unwrap();
        assert_eq!(out, "<root><a/><b/></root>");
    }

    #[test]
    fn splice_before_last_errors_on_missing_tag() {
        assert!(splice_before_last("<root/>", "</missing>", "<b/>").is_err());
    }

    #[test]
    fn insert_relationship_assigns_next_id() {
        let xml = r#"<Relationships><Relationship Id="rId1" Type="t" Target="a"/></Relationships>"#;
        let out = insert_relationship(xml, "t2", "b").unwrap();
        assert!(out.contains(r#"Id="rId2""#));
    }

    #[test]
    fn insert_content_type_override_is_idempotent() {
        let xml = r#"<Types></Types>"#;
        let once = insert_content_type_override(xml, "/word/numbering.xml", "application/x").unwrap();
        let twice = insert_content_type_override(&once, "/word/numbering.xml", "application/x").unwrap();
        assert_eq!(once, twice);
    }
}

use styledoc_schema::{NumberingSpec, NumberingSuffix};

fn suffix_val(suffix: NumberingSuffix) -> &'static str {
    match suffix {
        NumberingSuffix::Space => "space",
        NumberingSuffix::Tab => "tab",
        NumberingSuffix::Nothing => "nothing",
    }
}

/// Build the full content of `word/numbering.xml` for one abstract
/// numbering definition realizing `numbering`, bound to `num_id`/`abstract_num_id`
/// 1 (the template only ever needs a single heading-numbering scheme).
pub fn build_numbering_xml(numbering: &NumberingSpec) -> String {
    let levels: String = numbering
        .levels
        .iter()
        .map(|level| {
            format!(
                r#"<w:lvl w:ilvl="{ilvl}"><w:start w:val="{start}"/><w:numFmt w:val="decimal"/><w:lvlText w:val="{text}"/><w:suff w:val="{suffix}"/><w:pStyle w:val="{style_id}"/></w:lvl>"#,
                ilvl = level.level.get(),
                start = level.start,
                text = level.lvl_text,
                suffix = suffix_val(level.suffix),
                style_id = level.style_id,
            )
        })
        .collect();

    format!(
        r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="1">{levels}</w:abstractNum><w:num w:numId="1"><w:abstractNumId w:val="1"/></w:num></w:numbering>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn build_numbering_xml_has_one_lvl_per_level() {
        let spec = build_generic_spec(true);
        let numbering = spec.numbering.unwrap();
        let xml = build_numbering_xml(&numbering);
        for level in &numbering.levels {
            assert!(xml.contains(&format!(r#"w:ilvl="{}""#, level.level.get())));
        }
    }
}

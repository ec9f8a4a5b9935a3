use styledoc_schema::StyleSpec;

use crate::fragments::{paragraph_properties, run_properties};

/// Build the full content of `word/styles.xml` for `spec`.
pub fn build_styles_xml(spec: &StyleSpec) -> String {
    let mut body = String::from(
        r#"<w:docDefaults><w:rPrDefault><w:rPr><w:sz w:val="24"/></w:rPr></w:rPrDefault></w:docDefaults>"#,
    );
    body.push_str(r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style>"#);
    body.push_str(
        r#"<w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont"><w:name w:val="Default Paragraph Font"/></w:style>"#,
    );

    let mut ids: Vec<&String> = spec.styles.keys().collect();
    ids.sort();
    for id in ids {
        let style = &spec.styles[id];
        let based_on = style
            .based_on
            .as_ref()
            .map(|base| format!(r#"<w:basedOn w:val="{base}"/>"#))
            .unwrap_or_default();
        body.push_str(&format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/>{based_on}{ppr}{rpr}</w:style>"#,
            id = style.style_id,
            name = style.display_name,
            based_on = based_on,
            ppr = paragraph_properties(style),
            rpr = run_properties(style),
        ));
    }

    format!(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{body}</w:styles>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn build_styles_xml_contains_every_spec_style() {
        let spec = build_generic_spec(true);
        let xml = build_styles_xml(&spec);
        for id in spec.styles.keys() {
            assert!(xml.contains(&format!(r#"w:styleId="{id}""#)), "missing {id}");
        }
    }
}

//! Resolve a conventional style name to an id actually present in the spec,
//! falling back gracefully so a custom spec missing an optional style (e.g.
//! no dedicated `Figure` style) still renders something reasonable.

use styledoc_schema::StyleSpec;

pub fn resolve<'a>(spec: &'a StyleSpec, preferred: &'a str, fallback: &'a str) -> &'a str {
    if spec.styles.contains_key(preferred) {
        preferred
    } else if spec.styles.contains_key(fallback) {
        fallback
    } else {
        "Normal"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_specs::build_generic_spec;

    #[test]
    fn falls_back_to_body_when_preferred_style_is_absent() {
        let spec = build_generic_spec(true);
        assert_eq!(resolve(&spec, "Figure", "Body"), "Body");
    }

    #[test]
    fn uses_preferred_style_when_present() {
        let spec = build_generic_spec(true);
        assert_eq!(resolve(&spec, "H1", "Body"), "H1");
    }
}

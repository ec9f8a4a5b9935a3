//! The built-in "Generic_CN" reference spec for Chinese academic theses, and
//! its no-indent variant.

use std::collections::HashMap;

use styledoc_schema::{
    Alignment, ContentNormalization, FontMapping, ForbiddenDirectFormatting, LineSpacing,
    MarginMm, NumberingLevel, NumberingSpec, NumberingSuffix, OutlineLevel, PageNumberFormat,
    PageNumberingSpec, PageSpec, ParagraphPagination, SpacingAmount, StructureSpec, StyleDef,
    StyleParagraph, StyleRun, StyleSpec,
};

const CN_BODY_FONT: &str = "SimSun";
const CN_HEADING_FONT: &str = "SimHei";
const CN_TITLE_FONT: &str = "FangSong";
const CN_QUOTE_FONT: &str = "KaiTi";
const EN_FONT: &str = "Times New Roman";

fn fonts(east_asia: &str) -> FontMapping {
    FontMapping { east_asia: east_asia.to_string(), ascii: EN_FONT.to_string(), h_ansi: EN_FONT.to_string() }
}

fn heading_style(id: &str, name: &str, level: u8, size_pt: f64) -> StyleDef {
    StyleDef {
        style_id: id.to_string(),
        display_name: name.to_string(),
        based_on: Some("Normal".to_string()),
        is_heading: true,
        outline_level: Some(OutlineLevel::try_from(level).expect("heading outline level in range")),
        run: StyleRun { bold: true, italic: false, underline: false, size_pt },
        paragraph: StyleParagraph {
            alignment: Alignment::Left,
            line_spacing: LineSpacing::Line150,
            space_before: Some(SpacingAmount::Points(12.0)),
            space_after: Some(SpacingAmount::Points(6.0)),
            first_line_indent_chars: 0.0,
            hanging_indent_chars: 0.0,
            pagination: ParagraphPagination { keep_with_next: true, keep_lines: true, page_break_before: level == 0, widows_control: true },
        },
        fonts: fonts(CN_HEADING_FONT),
    }
}

fn body_style(id: &str, name: &str, first_line_indent_chars: f64) -> StyleDef {
    StyleDef {
        style_id: id.to_string(),
        display_name: name.to_string(),
        based_on: Some("Normal".to_string()),
        is_heading: false,
        outline_level: None,
        run: StyleRun { bold: false, italic: false, underline: false, size_pt: 12.0 },
        paragraph: StyleParagraph {
            alignment: Alignment::Justify,
            line_spacing: LineSpacing::Exact { points: 28.0 },
            space_before: Some(SpacingAmount::Points(0.0)),
            space_after: Some(SpacingAmount::Points(0.0)),
            first_line_indent_chars,
            hanging_indent_chars: 0.0,
            pagination: ParagraphPagination::default(),
        },
        fonts: fonts(CN_BODY_FONT),
    }
}

/// Build the generic Chinese-thesis reference spec. `first_line_indent`
/// controls whether body paragraphs get the conventional 2-character
/// first-line indent (the "Generic_CN_NoIndent" variant passes `false`).
pub fn build_generic_spec(first_line_indent: bool) -> StyleSpec {
    let indent = if first_line_indent { 2.0 } else { 0.0 };
    let mut styles = HashMap::new();

    styles.insert(
        "Title".to_string(),
        StyleDef {
            style_id: "Title".to_string(),
            display_name: "封面标题".to_string(),
            based_on: Some("Normal".to_string()),
            is_heading: false,
            outline_level: None,
            run: StyleRun { bold: true, italic: false, underline: false, size_pt: 22.0 },
            paragraph: StyleParagraph {
                alignment: Alignment::Center,
                line_spacing: LineSpacing::Line150,
                space_before: Some(SpacingAmount::Points(24.0)),
                space_after: Some(SpacingAmount::Points(24.0)),
                first_line_indent_chars: 0.0,
                hanging_indent_chars: 0.0,
                pagination: ParagraphPagination { page_break_before: true, ..Default::default() },
            },
            fonts: fonts(CN_TITLE_FONT),
        },
    );
    styles.insert(
        "TitleEn".to_string(),
        StyleDef {
            style_id: "TitleEn".to_string(),
            display_name: "Cover Title (English)".to_string(),
            based_on: Some("Title".to_string()),
            is_heading: false,
            outline_level: None,
            run: StyleRun { bold: true, italic: false, underline: false, size_pt: 16.0 },
            paragraph: StyleParagraph {
                alignment: Alignment::Center,
                line_spacing: LineSpacing::Line150,
                space_before: Some(SpacingAmount::Points(6.0)),
                space_after: Some(SpacingAmount::Points(24.0)),
                first_line_indent_chars: 0.0,
                hanging_indent_chars: 0.0,
                pagination: ParagraphPagination::default(),
            },
            fonts: fonts(CN_TITLE_FONT),
        },
    );
    styles.insert(
        "MetaLine".to_string(),
        StyleDef {
            style_id: "MetaLine".to_string(),
            display_name: "封面信息行".to_string(),
            based_on: Some("Normal".to_string()),
            is_heading: false,
            outline_level: None,
            run: StyleRun { bold: false, italic: false, underline: true, size_pt: 14.0 },
            paragraph: StyleParagraph {
                alignment: Alignment::Center,
                line_spacing: LineSpacing::Line150,
                space_before: Some(SpacingAmount::Points(6.0)),
                space_after: Some(SpacingAmount::Points(6.0)),
                first_line_indent_chars: 0.0,
                hanging_indent_chars: 0.0,
                pagination: ParagraphPagination::default(),
            },
            fonts: fonts(CN_BODY_FONT),
        },
    );
    styles.insert("FrontHeading".to_string(), heading_style("FrontHeading", "前置部分标题", 0, 16.0));
    styles.insert("AbstractBody".to_string(), body_style("AbstractBody", "摘要正文", 2.0));
    styles.insert("KeywordsBody".to_string(), body_style("KeywordsBody", "关键词", 0.0));
    styles.insert("H1".to_string(), heading_style("H1", "一级标题", 0, 16.0));
    styles.insert("H2".to_string(), heading_style("H2", "二级标题", 1, 14.0));
    styles.insert("H3".to_string(), heading_style("H3", "三级标题", 2, 12.0));
    styles.insert("Body".to_string(), body_style("Body", "正文", indent));
    styles.insert("Quote".to_string(), {
        let mut style = body_style("Quote", "引用", indent);
        style.fonts = fonts(CN_QUOTE_FONT);
        style
    });
    styles.insert("ListBullet".to_string(), body_style("ListBullet", "项目符号列表", 0.0));
    styles.insert("ListNumber".to_string(), body_style("ListNumber", "编号列表", 0.0));
    styles.insert("FigureCaption".to_string(), {
        let mut style = body_style("FigureCaption", "图题", 0.0);
        style.run.bold = true;
        style.run.size_pt = 10.5;
        style.paragraph.alignment = Alignment::Center;
        style
    });
    styles.insert("TableTitle".to_string(), {
        let mut style = body_style("TableTitle", "表题", 0.0);
        style.run.bold = true;
        style.run.size_pt = 10.5;
        style.paragraph.alignment = Alignment::Center;
        style
    });
    styles.insert("TableText".to_string(), body_style("TableText", "表格正文", 0.0));
    styles.insert("Reference".to_string(), {
        let mut style = body_style("Reference", "参考文献条目", 0.0);
        style.run.size_pt = 10.5;
        style.paragraph.hanging_indent_chars = 2.0;
        style
    });

    let numbering = NumberingSpec {
        levels: vec![
            NumberingLevel {
                level: OutlineLevel::try_from(0).unwrap(),
                style_id: "H1".to_string(),
                lvl_text: "%1".to_string(),
                start: 1,
                suffix: NumberingSuffix::Space,
            },
            NumberingLevel {
                level: OutlineLevel::try_from(1).unwrap(),
                style_id: "H2".to_string(),
                lvl_text: "%1．%2".to_string(),
                start: 1,
                suffix: NumberingSuffix::Space,
            },
            NumberingLevel {
                level: OutlineLevel::try_from(2).unwrap(),
                style_id: "H3".to_string(),
                lvl_text: "%1．%2．%3".to_string(),
                start: 1,
                suffix: NumberingSuffix::Space,
            },
        ],
    };

    StyleSpec {
        name: if first_line_indent { "Generic_CN".to_string() } else { "Generic_CN_NoIndent".to_string() },
        page: PageSpec {
            margins: MarginMm { top: 25.0, bottom: 20.0, left: 25.0, right: 20.0, binding: 5.0 },
            header_distance_mm: 15.0,
            footer_distance_mm: 15.0,
        },
        styles,
        numbering: Some(numbering),
        structure: StructureSpec {
            required_h1_titles: vec![
                "摘要".to_string(),
                "Abstract".to_string(),
                "引言".to_string(),
                "致谢".to_string(),
                "参考文献".to_string(),
            ],
            toc_max_level: 3,
        },
        forbidden_direct_formatting: ForbiddenDirectFormatting { font: true, size: true, bold: true, italic: true, underline: true, color: true },
        page_numbering: Some(PageNumberingSpec {
            front_matter_format: PageNumberFormat::RomanLower,
            main_matter_format: PageNumberFormat::Decimal,
            main_matter_start: 1,
            show_in_footer: true,
            footer_alignment: Alignment::Center,
        }),
        normalization: ContentNormalization { auto_prefix_abstract_keywords: true, auto_number_figures_tables: true },
    }
}

/// The full set of built-in named specs.
pub fn builtin_specs() -> HashMap<String, StyleSpec> {
    let mut specs = HashMap::new();
    let indented = build_generic_spec(true);
    let not_indented = build_generic_spec(false);
    specs.insert(indented.name.clone(), indented);
    specs.insert(not_indented.name.clone(), not_indented);
    specs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_specs_are_internally_valid() {
        for (name, spec) in builtin_specs() {
            assert!(spec.validate().is_ok(), "{name} failed validation");
        }
    }

    #[test]
    fn indent_variants_differ_only_in_body_indent() {
        let indented = build_generic_spec(true);
        let not_indented = build_generic_spec(false);
        assert_eq!(indented.styles["Body"].paragraph.first_line_indent_chars, 2.0);
        assert_eq!(not_indented.styles["Body"].paragraph.first_line_indent_chars, 0.0);
    }

    #[test]
    fn required_headings_present() {
        let spec = build_generic_spec(true);
        assert!(spec.structure.required_h1_titles.contains(&"参考文献".to_string()));
    }
}

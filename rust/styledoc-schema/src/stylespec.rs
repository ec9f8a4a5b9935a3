//! The declarative layout specification ("StyleSpec"): pages, styles,
//! numbering, structural requirements, and forbidden direct formatting.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::units::{HeadingLevel, Millimetres, OutlineLevel, Points};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("style map key {key:?} does not match its style_id {style_id:?}")]
    StyleIdMismatch { key: String, style_id: String },
    #[error("numbering level {level} references unknown style_id {style_id:?}")]
    NumberingUnknownStyle { level: u8, style_id: String },
    #[error("toc_max_level must be in 1..=8, got {0}")]
    TocMaxLevel(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MarginMm {
    pub top: f64,
    pub bottom: f64,
    pub left: f64,
    pub right: f64,
    #[serde(default)]
    pub binding: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageSpec {
    pub margins: MarginMm,
    pub header_distance_mm: f64,
    pub footer_distance_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FontMapping {
    pub east_asia: String,
    pub ascii: String,
    pub h_ansi: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LineSpacing {
    Single,
    Line150,
    Double,
    Exact { points: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum SpacingAmount {
    Points(f64),
    Lines(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParagraphPagination {
    #[serde(default)]
    pub keep_with_next: bool,
    #[serde(default)]
    pub keep_lines: bool,
    #[serde(default)]
    pub page_break_before: bool,
    #[serde(default)]
    pub widows_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleRun {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    pub size_pt: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleParagraph {
    pub alignment: Alignment,
    pub line_spacing: LineSpacing,
    /// Spacing before the paragraph; lines wins over points when both are set.
    pub space_before: Option<SpacingAmount>,
    pub space_after: Option<SpacingAmount>,
    /// First-line indent, in characters (a CJK-friendly unit).
    #[serde(default)]
    pub first_line_indent_chars: f64,
    #[serde(default)]
    pub hanging_indent_chars: f64,
    #[serde(default)]
    pub pagination: ParagraphPagination,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleDef {
    pub style_id: String,
    pub display_name: String,
    pub based_on: Option<String>,
    #[serde(default)]
    pub is_heading: bool,
    pub outline_level: Option<OutlineLevel>,
    pub run: StyleRun,
    pub paragraph: StyleParagraph,
    pub fonts: FontMapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum NumberingSuffix {
    Space,
    Tab,
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumberingLevel {
    pub level: OutlineLevel,
    pub style_id: String,
    pub lvl_text: String,
    #[serde(default = "default_numbering_start")]
    pub start: u32,
    pub suffix: NumberingSuffix,
}

fn default_numbering_start() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NumberingSpec {
    pub levels: Vec<NumberingLevel>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ForbiddenDirectFormatting {
    #[serde(default)]
    pub font: bool,
    #[serde(default)]
    pub size: bool,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub color: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StructureSpec {
    pub required_h1_titles: Vec<String>,
    pub toc_max_level: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PageNumberFormat {
    RomanUpper,
    RomanLower,
    Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PageNumberingSpec {
    pub front_matter_format: PageNumberFormat,
    pub main_matter_format: PageNumberFormat,
    #[serde(default)]
    pub main_matter_start: u32,
    #[serde(default = "default_true")]
    pub show_in_footer: bool,
    pub footer_alignment: Alignment,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentNormalization {
    #[serde(default)]
    pub auto_prefix_abstract_keywords: bool,
    #[serde(default)]
    pub auto_number_figures_tables: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StyleSpec {
    pub name: String,
    pub page: PageSpec,
    pub styles: HashMap<String, StyleDef>,
    pub numbering: Option<NumberingSpec>,
    pub structure: StructureSpec,
    #[serde(default)]
    pub forbidden_direct_formatting: ForbiddenDirectFormatting,
    pub page_numbering: Option<PageNumberingSpec>,
    #[serde(default)]
    pub normalization: ContentNormalization,
}

impl StyleSpec {
    /// Validate the cross-field invariants the `serde` shape cannot express:
    /// map keys must equal their `style_id`, numbering levels must reference
    /// defined styles, and `toc_max_level` must be in range.
    pub fn validate(&self) -> Result<(), SpecError> {
        for (key, def) in &self.styles {
            if key != &def.style_id {
                return Err(SpecError::StyleIdMismatch {
                    key: key.clone(),
                    style_id: def.style_id.clone(),
                });
            }
        }
        if let Some(numbering) = &self.numbering {
            for level in &numbering.levels {
                if !self.styles.contains_key(&level.style_id) {
                    return Err(SpecError::NumberingUnknownStyle {
                        level: level.level.get(),
                        style_id: level.style_id.clone(),
                    });
                }
            }
        }
        if !(1..=8).contains(&self.structure.toc_max_level) && self.structure.toc_max_level != 0 {
            return Err(SpecError::TocMaxLevel(self.structure.toc_max_level));
        }
        Ok(())
    }

    pub fn style(&self, heading_level: HeadingLevel) -> Option<&StyleDef> {
        self.styles
            .values()
            .find(|def| def.is_heading && def.outline_level.map(OutlineLevel::get) == Some(heading_level.get() - 1))
    }
}

pub fn pt_from_chinese_size_name(name: &str) -> Result<Points, String> {
    let value = match name {
        "初号" => 42.0,
        "小初" => 36.0,
        "一号" => 26.0,
        "小一" => 24.0,
        "二号" => 22.0,
        "小二" => 18.0,
        "三号" => 16.0,
        "小三" => 15.0,
        "四号" => 14.0,
        "小四" => 12.0,
        "五号" => 10.5,
        "小五" => 9.0,
        "六号" => 7.5,
        "小六" => 6.5,
        other => return Err(format!("unknown Chinese font size name: {other}")),
    };
    Points::try_from(value).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_spec() -> StyleSpec {
        StyleSpec {
            name: "Test".into(),
            page: PageSpec {
                margins: MarginMm { top: 25.0, bottom: 20.0, left: 25.0, right: 20.0, binding: 0.0 },
                header_distance_mm: 15.0,
                footer_distance_mm: 15.0,
            },
            styles: HashMap::new(),
            numbering: None,
            structure: StructureSpec { required_h1_titles: vec![], toc_max_level: 3 },
            forbidden_direct_formatting: ForbiddenDirectFormatting::default(),
            page_numbering: None,
            normalization: ContentNormalization::default(),
        }
    }

    #[test]
    fn validate_accepts_empty_spec() {
        assert!(minimal_spec().validate().is_ok());
    }

    #[test]
    fn validate_rejects_mismatched_style_key() {
        let mut spec = minimal_spec();
        spec.styles.insert(
            "Wrong".into(),
            StyleDef {
                style_id: "Body".into(),
                display_name: "Body".into(),
                based_on: None,
                is_heading: false,
                outline_level: None,
                run: StyleRun { bold: false, italic: false, underline: false, size_pt: 12.0 },
                paragraph: StyleParagraph {
                    alignment: Alignment::Justify,
                    line_spacing: LineSpacing::Single,
                    space_before: None,
                    space_after: None,
                    first_line_indent_chars: 2.0,
                    hanging_indent_chars: 0.0,
                    pagination: ParagraphPagination::default(),
                },
                fonts: FontMapping { east_asia: "SimSun".into(), ascii: "Times New Roman".into(), h_ansi: "Times New Roman".into() },
            },
        );
        assert_eq!(
            spec.validate(),
            Err(SpecError::StyleIdMismatch { key: "Wrong".into(), style_id: "Body".into() })
        );
    }

    #[test]
    fn chinese_size_lookup() {
        assert_eq!(pt_from_chinese_size_name("小四").unwrap().get(), 12.0);
        assert!(pt_from_chinese_size_name("nonsense").is_err());
    }
}

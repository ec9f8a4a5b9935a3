//! AI-assisted paragraph-type classification, with a deterministic
//! regex-based fallback used whenever the AI service is unavailable, slow,
//! or returns something that doesn't round-trip as well-formed JSON.

use std::sync::LazyLock;

use eyre::Result;
use regex::Regex;
use serde::Deserialize;
use styledoc_ai::{AiService, Message};
use styledoc_schema::{Block, DocAst, DocumentMeta, HeadingLevel, ParagraphContent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParagraphType {
    TitleCn,
    TitleEn,
    AbstractCn,
    AbstractEn,
    KeywordsCn,
    KeywordsEn,
    Heading1,
    Heading2,
    Heading3,
    Body,
    Reference,
    Acknowledgement,
    FigureCaption,
    TableCaption,
}

impl ParagraphType {
    fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "title_cn" => Self::TitleCn,
            "title_en" => Self::TitleEn,
            "abstract_cn" => Self::AbstractCn,
            "abstract_en" => Self::AbstractEn,
            "keywords_cn" => Self::KeywordsCn,
            "keywords_en" => Self::KeywordsEn,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "body" => Self::Body,
            "reference" => Self::Reference,
            "acknowledgement" => Self::Acknowledgement,
            "figure_caption" => Self::FigureCaption,
            "table_caption" => Self::TableCaption,
            _ => return None,
        })
    }
}

static ABSTRACT_CN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*摘\s*要\s*$").unwrap());
static ABSTRACT_EN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*abstract\s*$").unwrap());
static KEYWORDS_CN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*关键[词字]\s*[:：]").unwrap());
static KEYWORDS_EN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^\s*key\s*words?\s*[:：]").unwrap());
static ACKNOWLEDGEMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*致\s*谢\s*$").unwrap());
static REFERENCE_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\[\d+\]").unwrap());

/// Classify a list of paragraph strings purely by regex matching against
/// well-known academic-thesis section markers. Always succeeds.
pub fn classify_regex(paragraphs: &[String]) -> Vec<ParagraphType> {
    paragraphs
        .iter()
        .enumerate()
        .map(|(index, text)| {
            if ABSTRACT_CN_RE.is_match(text) {
                ParagraphType::Heading1
            } else if ABSTRACT_EN_RE.is_match(text) {
                ParagraphType::Heading1
            } else if ACKNOWLEDGEMENT_RE.is_match(text) {
                ParagraphType::Heading1
            } else if KEYWORDS_CN_RE.is_match(text) {
                ParagraphType::KeywordsCn
            } else if KEYWORDS_EN_RE.is_match(text) {
                ParagraphType::KeywordsEn
            } else if REFERENCE_ITEM_RE.is_match(text) {
                ParagraphType::Reference
            } else if index == 0 {
                ParagraphType::TitleCn
            } else {
                ParagraphType::Body
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct TaggedParagraph {
    index: usize,
    #[serde(rename = "type")]
    tag: String,
}

/// Ask `service` to classify `paragraphs`. Falls back to `classify_regex` on
/// any network failure or malformed response.
pub async fn ai_identify_paragraph_types(paragraphs: &[String], service: &dyn AiService) -> Vec<ParagraphType> {
    match try_ai_classify(paragraphs, service).await {
        Ok(types) => types,
        Err(error) => {
            tracing::warn!(%error, "AI paragraph classification failed; falling back to regex classifier");
            classify_regex(paragraphs)
        }
    }
}

async fn try_ai_classify(paragraphs: &[String], service: &dyn AiService) -> Result<Vec<ParagraphType>> {
    let prompt = format!(
        "Classify each paragraph below by index into one of: title_cn, title_en, abstract_cn, abstract_en, \
         keywords_cn, keywords_en, heading_1, heading_2, heading_3, body, reference, acknowledgement, \
         figure_caption, table_caption. Respond with a strict JSON array of {{\"index\":N,\"type\":\"...\"}}.\n\n{}",
        paragraphs.iter().enumerate().map(|(i, p)| format!("{i}: {p}")).collect::<Vec<_>>().join("\n")
    );
    let reply = service.complete(&[Message::user(prompt)]).await?;
    let tagged: Vec<TaggedParagraph> = serde_json::from_str(styledoc_ai::strip_code_fence(&reply))?;

    let regex_fallback = classify_regex(paragraphs);
    let mut result = regex_fallback.clone();
    for entry in tagged {
        if let (Some(slot), Some(parsed)) = (result.get_mut(entry.index), ParagraphType::from_tag(&entry.tag)) {
            *slot = parsed;
        }
    }
    Ok(result)
}

const KNOWN_SECTION_NAMES: &[(&str, &str)] = &[("摘要", "摘要"), ("Abstract", "Abstract"), ("致谢", "致谢"), ("参考文献", "参考文献")];

/// Fold AI- or regex-tagged paragraphs into a `DocAst`.
pub fn parse_with_ai_types(paragraphs: &[String], types: &[ParagraphType]) -> DocAst {
    let mut meta = DocumentMeta::default();
    let mut blocks = Vec::new();

    for (text, kind) in paragraphs.iter().zip(types.iter()) {
        match kind {
            ParagraphType::TitleCn => meta.title = Some(text.clone()),
            ParagraphType::TitleEn => meta.title_en = Some(text.clone()),
            ParagraphType::Heading1 => {
                let known = KNOWN_SECTION_NAMES.iter().find(|(needle, _)| text.contains(needle));
                match known {
                    Some((needle, canonical)) => {
                        blocks.push(Block::Heading { level: HeadingLevel::clamp_new(1), text: canonical.to_string() });
                        if let Some(pos) = text.find(needle) {
                            let remainder = text[pos + needle.len()..].trim();
                            if !remainder.is_empty() {
                                blocks.push(Block::Paragraph { content: ParagraphContent::Text(remainder.to_string()) });
                            }
                        }
                    }
                    None => blocks.push(Block::Heading { level: HeadingLevel::clamp_new(1), text: text.clone() }),
                }
            }
            ParagraphType::Heading2 => blocks.push(Block::Heading { level: HeadingLevel::clamp_new(2), text: text.clone() }),
            ParagraphType::Heading3 => blocks.push(Block::Heading { level: HeadingLevel::clamp_new(3), text: text.clone() }),
            _ => blocks.push(Block::Paragraph { content: ParagraphContent::Text(text.clone()) }),
        }
    }

    DocAst::new(meta, blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use styledoc_ai::StubAiService;

    #[test]
    fn classify_regex_tags_reference_items() {
        let paragraphs = vec!["[1] A Paper.".to_string()];
        assert_eq!(classify_regex(&paragraphs), vec![ParagraphType::Reference]);
    }

    #[tokio::test]
    async fn ai_classify_falls_back_on_bad_json() {
        let stub = StubAiService::new("not json");
        let paragraphs = vec!["[1] A Paper.".to_string()];
        let types = ai_identify_paragraph_types(&paragraphs, &stub).await;
        assert_eq!(types, classify_regex(&paragraphs));
    }
}

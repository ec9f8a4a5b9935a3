//! The patch algebra: a small, stable vocabulary of repair operations that
//! the validator's suggestions name and the fixer applies.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "action", content = "params", rename_all = "snake_case")]
pub enum PatchAction {
    SetPageMargins {
        top_twips: i64,
        bottom_twips: i64,
        left_twips: i64,
        right_twips: i64,
    },
    SetParagraphStyle {
        paragraph_index: usize,
        style_id: String,
    },
    ClearDirectRunFormatting {
        paragraph_index: usize,
    },
    InsertTocField {
        max_level: u8,
    },
}

impl PatchAction {
    pub fn name(&self) -> &'static str {
        match self {
            PatchAction::SetPageMargins { .. } => "set_page_margins",
            PatchAction::SetParagraphStyle { .. } => "set_paragraph_style",
            PatchAction::ClearDirectRunFormatting { .. } => "clear_direct_run_formatting",
            PatchAction::InsertTocField { .. } => "insert_toc_field",
        }
    }

    pub fn params_json(&self) -> serde_json::Map<String, serde_json::Value> {
        match serde_json::to_value(self) {
            Ok(serde_json::Value::Object(mut obj)) => obj
                .remove("params")
                .and_then(|value| value.as_object().cloned())
                .unwrap_or(obj),
            _ => serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Patch {
    pub actions: Vec<PatchAction>,
}

impl Patch {
    pub fn new(actions: Vec<PatchAction>) -> Self {
        Self { actions }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_name_matches_wire_tag() {
        let action = PatchAction::InsertTocField { max_level: 3 };
        assert_eq!(action.name(), "insert_toc_field");
    }
}

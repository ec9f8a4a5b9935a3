//! AI-assisted generation of a StyleSpec from free-form prose requirements.

use eyre::{Context, Result};
use styledoc_ai::{strip_code_fence, AiService, Message};
use styledoc_schema::StyleSpec;

use crate::custom::validate_custom_spec;

const SYSTEM_PROMPT: &str = "You produce a single strict JSON object describing a document StyleSpec. \
Respond with JSON only, no prose, no markdown fences.";

/// Ask `service` to turn `requirements` into a StyleSpec, then type-check
/// the result the same way a hand-authored custom spec is checked.
pub async fn ai_generate_spec(requirements: &str, service: &dyn AiService) -> Result<StyleSpec> {
    let messages = [Message::system(SYSTEM_PROMPT), Message::user(requirements)];
    let reply = service.complete(&messages).await.wrap_err("AI spec generation request failed")?;
    let json = strip_code_fence(&reply);
    validate_custom_spec(json).wrap_err("AI-generated spec failed validation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generic_cn::build_generic_spec;
    use styledoc_ai::StubAiService;

    #[tokio::test]
    async fn ai_generate_spec_accepts_fenced_valid_json() {
        let spec = build_generic_spec(true);
        let json = serde_json::to_string(&spec).unwrap();
        let stub = StubAiService::new(format!("```json\n{json}\n```"));
        let generated = ai_generate_spec("a thesis template", &stub).await.unwrap();
        assert_eq!(generated, spec);
    }

    #[tokio::test]
    async fn ai_generate_spec_rejects_malformed_reply() {
        let stub = StubAiService::new("not json at all");
        assert!(ai_generate_spec("anything", &stub).await.is_err());
    }
}

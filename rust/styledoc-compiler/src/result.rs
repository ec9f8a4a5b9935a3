use styledoc_schema::{DocAst, StyleSpec, ValidationReport};

#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    pub success: bool,
    pub docx_bytes: Option<Vec<u8>>,
    pub ast: Option<DocAst>,
    pub spec: Option<StyleSpec>,
    pub report: Option<ValidationReport>,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl CompileResult {
    pub fn failure(error: impl Into<String>, warnings: Vec<String>) -> Self {
        Self { success: false, error: Some(error.into()), warnings, ..Default::default() }
    }
}

//! Compilation inputs: which format to assume, which spec to compile
//! against, and the fix/front-matter knobs.

use styledoc_schema::StyleSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormatOption {
    #[default]
    Auto,
    Markdown,
    PlainText,
}

#[derive(Debug, Clone)]
pub struct CompileOptions {
    pub input_format: InputFormatOption,
    pub spec_name: Option<String>,
    pub custom_spec: Option<StyleSpec>,
    pub reference_docx_bytes: Option<Vec<u8>>,
    pub include_cover: bool,
    pub include_toc: bool,
    pub toc_title: String,
    pub auto_fix: bool,
    pub max_fix_iterations: u32,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            input_format: InputFormatOption::default(),
            spec_name: None,
            custom_spec: None,
            reference_docx_bytes: None,
            include_cover: true,
            include_toc: true,
            toc_title: "目 录".to_string(),
            auto_fix: true,
            max_fix_iterations: 3,
        }
    }
}

//! The compiler's phase sequence and the progress events it emits.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompilePhase {
    Parse,
    Spec,
    Template,
    Render,
    Validate,
    Fix,
    Done,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompileProgress {
    pub phase: CompilePhase,
    pub progress: f64,
    pub message: String,
    pub detail: Option<String>,
}

impl CompileProgress {
    pub fn new(phase: CompilePhase, progress: f64, message: impl Into<String>, detail: Option<String>) -> Self {
        Self { phase, progress, message: message.into(), detail }
    }
}

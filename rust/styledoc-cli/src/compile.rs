use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use styledoc_ai::HttpAiService;
use styledoc_compiler::{compile_document, compile_document_with_ai, CompileOptions, CompileProgress, InputFormatOption};
use styledoc_specs::validate_custom_spec;

/// Compile a Markdown or plain-text document into a formatted `.docx`
#[derive(Debug, Parser)]
pub struct Cli {
    /// The path of the file to compile
    input: PathBuf,

    /// The path to write the compiled `.docx` to
    ///
    /// Defaults to the input path with its extension replaced by `.docx`.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// The input format to assume
    #[arg(long, value_enum, default_value = "auto")]
    input_format: InputFormatArg,

    /// The name of a built-in style spec to compile against
    #[arg(long, conflicts_with = "spec_file")]
    spec: Option<String>,

    /// The path to a custom style spec JSON file
    #[arg(long, conflicts_with = "spec")]
    spec_file: Option<PathBuf>,

    /// Use AI-assisted paragraph classification for plain-text input
    #[arg(long)]
    ai: bool,

    /// Skip the automatic validation-repair loop
    #[arg(long)]
    no_fix: bool,

    /// Write the validation report as JSON to this path after compiling
    #[arg(long)]
    report: Option<PathBuf>,

    /// Omit the generated cover page
    #[arg(long)]
    no_cover: bool,

    /// Omit the generated table of contents
    #[arg(long)]
    no_toc: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum InputFormatArg {
    Auto,
    Markdown,
    Plaintext,
}

impl From<InputFormatArg> for InputFormatOption {
    fn from(value: InputFormatArg) -> Self {
        match value {
            InputFormatArg::Auto => InputFormatOption::Auto,
            InputFormatArg::Markdown => InputFormatOption::Markdown,
            InputFormatArg::Plaintext => InputFormatOption::PlainText,
        }
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let text = fs::read_to_string(&self.input).wrap_err_with(|| format!("reading `{}`", self.input.display()))?;

        let custom_spec = match &self.spec_file {
            Some(path) => {
                let json = fs::read_to_string(path).wrap_err_with(|| format!("reading `{}`", path.display()))?;
                Some(validate_custom_spec(&json).wrap_err("spec file is not a valid style spec")?)
            }
            None => None,
        };

        let options = CompileOptions {
            input_format: self.input_format.into(),
            spec_name: self.spec.clone(),
            custom_spec,
            include_cover: !self.no_cover,
            include_toc: !self.no_toc,
            auto_fix: !self.no_fix,
            ..CompileOptions::default()
        };

        let bar = ProgressBar::new(100);
        bar.set_style(ProgressStyle::with_template("{spinner:.cyan} {msg}").expect("valid template"));
        let on_progress = move |progress: CompileProgress| {
            bar.set_message(format!("{:?}: {}", progress.phase, progress.message));
            if progress.phase == styledoc_compiler::CompilePhase::Done {
                bar.finish_and_clear();
            }
        };

        let result = if self.ai {
            let ai_service = HttpAiService::from_env()?;
            compile_document_with_ai(&text, &ai_service, &options, Some(on_progress)).await
        } else {
            compile_document(&text, &options, Some(on_progress))
        };

        if !result.success {
            bail!(result.error.unwrap_or_else(|| "compilation failed".to_string()));
        }
        for warning in &result.warnings {
            tracing::warn!("{warning}");
        }

        let docx_bytes = result.docx_bytes.expect("successful compile always carries output bytes");
        let output = self.output.clone().unwrap_or_else(|| self.input.with_extension("docx"));
        fs::write(&output, docx_bytes).wrap_err_with(|| format!("writing `{}`", output.display()))?;
        tracing::info!("wrote `{}`", output.display());

        if let Some(report_path) = &self.report {
            let report = result.report.expect("successful compile always carries a validation report");
            let json = serde_json::to_string_pretty(&report).wrap_err("serializing validation report")?;
            fs::write(report_path, json).wrap_err_with(|| format!("writing `{}`", report_path.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_format_arg_maps_onto_compiler_options() {
        assert_eq!(InputFormatOption::from(InputFormatArg::Auto), InputFormatOption::Auto);
        assert_eq!(InputFormatOption::from(InputFormatArg::Markdown), InputFormatOption::Markdown);
        assert_eq!(InputFormatOption::from(InputFormatArg::Plaintext), InputFormatOption::PlainText);
    }

    #[test]
    fn cli_parses_minimal_arguments() {
        let cli = Cli::parse_from(["compile", "thesis.md"]);
        assert_eq!(cli.input, PathBuf::from("thesis.md"));
        assert!(cli.spec.is_none());
        assert!(!cli.ai);
    }

    #[test]
    fn cli_rejects_spec_and_spec_file_together() {
        let result = Cli::try_parse_from(["compile", "thesis.md", "--spec", "generic_cn", "--spec-file", "x.json"]);
        assert!(result.is_err());
    }
}

//! Orchestrates the full compilation pipeline: parse input text into a
//! `DocAst`, resolve a `StyleSpec`, build or patch a reference template,
//! render, validate, and iteratively repair until the report is clean or
//! `max_fix_iterations` is exhausted.

mod options;
mod phase;
mod result;

pub use options::{CompileOptions, InputFormatOption};
pub use phase::{CompilePhase, CompileProgress};
pub use result::CompileResult;

use eyre::Result;
use styledoc_ai::AiService;
use styledoc_fix::{apply_patch, build_patch_from_report};
use styledoc_ooxml::DocxPackage;
use styledoc_parser::{classify, detect_input_format, InputFormat};
use styledoc_render::{render_docx, RenderOptions};
use styledoc_schema::{DocAst, StyleSpec};
use styledoc_specs::{build_generic_spec, builtin_specs};
use styledoc_template::{generate_reference_docx, patch_reference_docx};
use styledoc_validate::validate_docx;

fn emit<F: FnMut(CompileProgress)>(callback: &mut Option<F>, phase: CompilePhase, progress: f64, message: &str, detail: Option<String>) {
    if let Some(callback) = callback {
        callback(CompileProgress::new(phase, progress, message.to_string(), detail));
    }
}

fn resolve_input_format(text: &str, requested: InputFormatOption) -> InputFormat {
    match requested {
        InputFormatOption::Auto => detect_input_format(text),
        InputFormatOption::Markdown => InputFormat::Markdown,
        InputFormatOption::PlainText => InputFormat::PlainText,
    }
}

fn resolve_spec(options: &CompileOptions) -> StyleSpec {
    if let Some(spec) = &options.custom_spec {
        return spec.clone();
    }
    if let Some(name) = &options.spec_name {
        if let Some(spec) = builtin_specs().get(name) {
            return spec.clone();
        }
    }
    build_generic_spec(true)
}

fn build_reference(spec: &StyleSpec, options: &CompileOptions) -> Result<DocxPackage> {
    match &options.reference_docx_bytes {
        Some(bytes) => patch_reference_docx(spec, DocxPackage::from_bytes(bytes)?),
        None => generate_reference_docx(spec),
    }
}

/// Compile already-parsed `ast` against `options`, threading progress
/// notifications through `callback`. Shared by the AI and non-AI entry
/// points once a `DocAst` exists.
fn compile_from_ast<F: FnMut(CompileProgress)>(
    ast: DocAst,
    options: &CompileOptions,
    callback: &mut Option<F>,
    warnings: &mut Vec<String>,
) -> Result<CompileResult> {
    emit(callback, CompilePhase::Spec, 0.0, "loading format spec", None);
    let spec = resolve_spec(options);
    emit(callback, CompilePhase::Spec, 1.0, "format spec loaded", Some(spec.name.clone()));

    emit(callback, CompilePhase::Template, 0.0, "building reference template", None);
    let reference = build_reference(&spec, options)?;
    emit(callback, CompilePhase::Template, 1.0, "reference template ready", None);

    emit(callback, CompilePhase::Render, 0.0, "rendering document", None);
    let render_options = RenderOptions {
        include_cover: options.include_cover,
        include_toc: options.include_toc,
        toc_title: options.toc_title.clone(),
    };
    let mut package = render_docx(&ast, &spec, reference, &render_options)?;
    emit(callback, CompilePhase::Render, 1.0, "document rendered", None);

    emit(callback, CompilePhase::Validate, 0.0, "validating document", None);
    let mut bytes = package.to_bytes()?;
    let mut report = validate_docx(&bytes, &spec)?;
    emit(
        callback,
        CompilePhase::Validate,
        1.0,
        "validation complete",
        Some(format!("errors: {}, warnings: {}", report.summary.errors, report.summary.warnings)),
    );

    if options.auto_fix && !report.summary.ok {
        emit(callback, CompilePhase::Fix, 0.0, "auto-fixing violations", None);
        for iteration in 0..options.max_fix_iterations {
            let patch = build_patch_from_report(&report);
            package = apply_patch(&package, &patch, &spec)?;
            bytes = package.to_bytes()?;
            report = validate_docx(&bytes, &spec)?;

            let progress = (iteration + 1) as f64 / options.max_fix_iterations as f64;
            emit(callback, CompilePhase::Fix, progress, &format!("fix iteration {}/{}", iteration + 1, options.max_fix_iterations), None);

            if report.summary.ok {
                break;
            }
        }
        if !report.summary.ok {
            warnings.push(format!("{} error(s) remain after auto-fix", report.summary.errors));
        }
        emit(callback, CompilePhase::Fix, 1.0, "auto-fix complete", None);
    }

    emit(callback, CompilePhase::Done, 1.0, "compilation complete", None);

    Ok(CompileResult {
        success: true,
        docx_bytes: Some(bytes),
        ast: Some(ast),
        spec: Some(spec),
        report: Some(report),
        error: None,
        warnings: warnings.clone(),
    })
}

/// Run the full pipeline over raw input text, deciding Markdown vs.
/// plain-text parsing without any AI assistance.
pub fn compile_document<F: FnMut(CompileProgress)>(text: &str, options: &CompileOptions, mut progress_callback: Option<F>) -> CompileResult {
    let mut warnings = Vec::new();

    let outcome: Result<CompileResult> = (|| {
        emit(&mut progress_callback, CompilePhase::Parse, 0.0, "parsing input text", None);
        let format = resolve_input_format(text, options.input_format);
        let ast = match format {
            InputFormat::Markdown => styledoc_parser::parse_markdown(text)?,
            InputFormat::PlainText => styledoc_parser::parse_plaintext(text),
        };
        emit(&mut progress_callback, CompilePhase::Parse, 1.0, "text parsed", Some(format!("{} blocks recognized", ast.blocks.len())));

        compile_from_ast(ast, options, &mut progress_callback, &mut warnings)
    })();

    outcome.unwrap_or_else(|error| CompileResult::failure(error.to_string(), warnings))
}

/// Run the pipeline using `ai_service` to classify plain-text paragraphs
/// (Markdown input bypasses the AI path entirely — its structure is
/// already explicit). Falls back to the non-AI pipeline once if anything
/// upstream of rendering fails.
pub async fn compile_document_with_ai<F: FnMut(CompileProgress)>(
    text: &str,
    ai_service: &dyn AiService,
    options: &CompileOptions,
    mut progress_callback: Option<F>,
) -> CompileResult {
    let mut warnings = Vec::new();

    let outcome: Result<CompileResult> = async {
        emit(&mut progress_callback, CompilePhase::Parse, 0.0, "analyzing text structure with AI assistance", None);
        let format = resolve_input_format(text, options.input_format);
        let ast = match format {
            InputFormat::Markdown => styledoc_parser::parse_markdown(text)?,
            InputFormat::PlainText => {
                let paragraphs: Vec<String> = text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()).map(str::to_string).collect();
                emit(&mut progress_callback, CompilePhase::Parse, 0.3, "calling AI service to classify paragraphs", None);
                let types = classify::ai_identify_paragraph_types(&paragraphs, ai_service).await;
                classify::parse_with_ai_types(&paragraphs, &types)
            }
        };
        emit(&mut progress_callback, CompilePhase::Parse, 1.0, "paragraph recognition complete", Some(format!("{} blocks recognized", ast.blocks.len())));

        compile_from_ast(ast, options, &mut progress_callback, &mut warnings)
    }
    .await;

    match outcome {
        Ok(result) => result,
        Err(error) => {
            warnings.push(format!("AI-assisted compilation failed, falling back to rule-based mode: {error}"));
            compile_document(text, options, progress_callback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_markdown() -> &'static str {
        "---\ntitle: 示例论文\nauthor: 张三\n---\n\
         # 摘要\n\n这是摘要正文。\n\n\
         # Abstract\n\nThis is the abstract.\n\n\
         # 引言\n\n正文内容。\n\n\
         # 致谢\n\n感谢。\n\n\
         # 参考文献\n\n[1] Author, Title.\n"
    }

    #[test]
    fn compile_document_produces_clean_docx_for_complete_thesis() {
        let options = CompileOptions::default();
        let mut phases = Vec::new();
        let result = compile_document(sample_markdown(), &options, Some(|progress: CompileProgress| phases.push(progress.phase)));
        assert!(result.success, "{:?}", result.error);
        let report = result.report.unwrap();
        assert!(report.summary.ok, "{:#?}", report.violations);
        assert!(phases.contains(&CompilePhase::Done));
    }

    #[test]
    fn compile_document_without_progress_callback_still_succeeds() {
        let options = CompileOptions::default();
        let result = compile_document(sample_markdown(), &options, None::<fn(CompileProgress)>);
        assert!(result.success);
    }

    #[tokio::test]
    async fn compile_document_with_ai_falls_back_gracefully_for_markdown() {
        let stub = styledoc_ai::StubAiService::new("not json");
        let options = CompileOptions::default();
        let result = compile_document_with_ai(sample_markdown(), &stub, &options, None::<fn(CompileProgress)>).await;
        assert!(result.success, "{:?}", result.error);
    }
}

//! Shared data model for the styledoc crates: the document tree (`DocAst`),
//! the layout specification (`StyleSpec`), the validator's report, and the
//! fixer's patch algebra.

pub mod ast;
pub mod patch;
pub mod stylespec;
pub mod units;
pub mod validation;

pub use ast::{Block, DocAst, DocumentMeta, Inline, ParagraphContent, TableRow, REFERENCE_HEADING_NAMES};
pub use patch::{Patch, PatchAction};
pub use stylespec::{
    Alignment, ContentNormalization, FontMapping, ForbiddenDirectFormatting, LineSpacing,
    MarginMm, NumberingLevel, NumberingSpec, NumberingSuffix, PageNumberFormat, PageNumberingSpec,
    PageSpec, ParagraphPagination, SpacingAmount, SpecError, StructureSpec, StyleDef,
    StyleParagraph, StyleRun, StyleSpec,
};
pub use units::{HeadingLevel, Millimetres, OutlineLevel, Points, UnitError};
pub use validation::{FixSuggestion, Location, Severity, ValidationReport, ValidationSummary, Violation};

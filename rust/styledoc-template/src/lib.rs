//! Produces (or updates) a "reference" `.docx` package that encodes a
//! `StyleSpec`'s style table, numbering scheme, and section properties, for
//! the renderer to build content on top of.

pub mod fragments;
pub mod numbering_part;
pub mod package;
pub mod section_part;
pub mod styles_part;

pub use package::{generate_reference_docx, patch_reference_docx, replace_section_properties};
pub use section_part::build_sect_pr_body;

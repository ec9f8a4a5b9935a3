//! Providers of `StyleSpec` values: built-in templates, custom-spec
//! validation, and AI-assisted generation from prose requirements.

pub mod ai;
pub mod custom;
pub mod generic_cn;

pub use ai::ai_generate_spec;
pub use custom::{export_spec_to_json, get_spec_schema, validate_custom_spec};
pub use generic_cn::{build_generic_spec, builtin_specs};

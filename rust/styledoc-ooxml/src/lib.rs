//! Read and write `.docx` (OPC/OOXML) packages as in-memory maps of XML
//! parts, and splice well-known parts without a full mutable XML tree.

pub mod package;
pub mod parts;
pub mod text;
pub mod xml_util;

pub use package::{DocxPackage, XML_DECLARATION};
pub use text::extract_plain_text;
pub use roxmltree;

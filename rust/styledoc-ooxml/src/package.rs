use std::fs::File;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use eyre::{Context, Result};
use indexmap::IndexMap;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// A `.docx` (or any OPC/OOXML) package represented as an ordered map from
/// archive member path to raw bytes. Order is preserved across a
/// load/mutate/save cycle so two calls on identical inputs produce
/// byte-identical archives.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    members: IndexMap<String, Vec<u8>>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).wrap_err("opening docx as a zip archive")?;
        let mut members = IndexMap::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name().to_string();
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;
            members.insert(name, content);
        }
        Ok(Self { members })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut file = File::open(path.as_ref()).wrap_err("opening docx file")?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = ZipWriter::new(&mut cursor);
            let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            for (name, content) in &self.members {
                writer.start_file(name, options)?;
                writer.write_all(content)?;
            }
            writer.finish()?;
        }
        Ok(cursor.into_inner())
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).wrap_err("writing docx file")
    }

    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.members.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Read a member as a UTF-8 XML part.
    pub fn read_xml(&self, name: &str) -> Result<String> {
        let bytes = self
            .get(name)
            .ok_or_else(|| eyre::eyre!("docx package has no member named {name:?}"))?;
        String::from_utf8(bytes.to_vec()).wrap_err_with(|| format!("member {name:?} is not valid UTF-8"))
    }

    /// Overwrite (or insert) a member with a string, prepending the standard
    /// XML declaration if the content does not already start with one.
    pub fn write_xml(&mut self, name: &str, content: String) {
        let content = if content.starts_with("<?xml") {
            content
        } else {
            format!("{XML_DECLARATION}\n{content}")
        };
        self.members.insert(name.to_string(), content.into_bytes());
    }

    /// Insert a member only if it is not already present, producing it via
    /// `default`.
    pub fn ensure_member(&mut self, name: &str, default: impl FnOnce() -> String) {
        if !self.members.contains_key(name) {
            self.write_xml(name, default());
        }
    }

    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_package() -> DocxPackage {
        let mut pkg = DocxPackage::default();
        pkg.write_xml("word/document.xml", "<w:document/>".to_string());
        pkg
    }

    #[test]
    fn round_trip_preserves_member_bytes() {
        let pkg = sample_package();
        let bytes = pkg.to_bytes().unwrap();
        let reloaded = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(
            reloaded.read_xml("word/document.xml").unwrap(),
            format!("{XML_DECLARATION}\n<w:document/>")
        );
    }

    #[test]
    fn to_bytes_is_deterministic() {
        let pkg = sample_package();
        assert_eq!(pkg.to_bytes().unwrap(), pkg.to_bytes().unwrap());
    }

    #[test]
    fn write_xml_does_not_double_declare() {
        let mut pkg = DocxPackage::default();
        pkg.write_xml("a.xml", format!("{XML_DECLARATION}\n<a/>"));
        assert_eq!(pkg.read_xml("a.xml").unwrap(), format!("{XML_DECLARATION}\n<a/>"));
    }

    #[test]
    fn ensure_member_is_insert_only() {
        let mut pkg = DocxPackage::default();
        pkg.ensure_member("a.xml", || "<a/>".to_string());
        pkg.ensure_member("a.xml", || "<b/>".to_string());
        assert_eq!(pkg.read_xml("a.xml").unwrap(), format!("{XML_DECLARATION}\n<a/>"));
    }
}

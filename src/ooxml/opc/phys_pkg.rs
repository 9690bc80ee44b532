//! Physical OPC package (ZIP container) writer.
//!
//! Members are written in call order with Deflate compression, into an
//! in-memory buffer.

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Physical package writer for creating ZIP-based OPC packages.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl PhysPkgWriter {
    /// Create a new physical package writer.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// Write a part to the package with Deflate compression.
    ///
    /// # Arguments
    /// * `pack_uri` - The PackURI for the part
    /// * `blob` - The binary content to write
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.archive.start_file(pack_uri.membername(), self.options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    ///
    /// Consumes the writer and returns the complete ZIP archive.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_written_members_read_back() {
        let mut writer = PhysPkgWriter::new();

        let content_types = PackURI::new("/[Content_Types].xml").unwrap();
        let rels = PackURI::new("/_rels/.rels").unwrap();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();

        writer.write(&content_types, b"<Types/>").unwrap();
        writer.write(&rels, b"<Relationships/>").unwrap();
        writer.write(&pres, b"<p:presentation/>").unwrap();

        let zip_data = writer.finish().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(zip_data)).unwrap();
        assert_eq!(archive.len(), 3);
        assert_eq!(archive.by_index(0).unwrap().name(), "[Content_Types].xml");

        let mut member = archive.by_name("ppt/presentation.xml").unwrap();
        assert_eq!(member.compression(), CompressionMethod::Deflated);
        let mut content = String::new();
        member.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<p:presentation/>");
    }

    #[test]
    fn test_duplicate_member_fails() {
        let mut writer = PhysPkgWriter::new();
        let uri = PackURI::new("/a.xml").unwrap();
        writer.write(&uri, b"1").unwrap();
        assert!(writer.write(&uri, b"2").is_err());
    }
}

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;
/// Open Packaging Convention (OPC) objects related to package parts.
///
/// This module provides the Part trait with a binary and an XML
/// implementation. Parts are the fundamental units of content in an OPC
/// package, each with a unique partname, content type, and optional
/// relationships.
use std::fmt;

/// Trait representing a part in an OPC package.
///
/// Each part has a unique partname (PackURI), a content type, and may have
/// relationships to other parts.
pub trait Part: fmt::Debug {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Get mutable access to the relationships for this part.
    fn rels_mut(&mut self) -> &mut Relationships;

    /// Add or get a relationship to another part.
    ///
    /// The target is stored relative to this part's base URI. If a
    /// relationship of the given type to the target already exists, returns
    /// its rId.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname().base_uri());
        let rel = self.rels_mut().get_or_add(reltype, &target_ref);
        rel.r_id().to_string()
    }

    /// Get the target reference for a relationship ID.
    fn target_ref(&self, r_id: &str) -> Result<&str> {
        self.rels()
            .get(r_id)
            .map(|rel| rel.target_ref())
            .ok_or_else(|| OpcError::RelationshipNotFound(format!("rId: {}", r_id)))
    }
}

/// A part that stores binary content, such as an embedded picture.
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl BlobPart {
    /// Create a new BlobPart.
    ///
    /// # Arguments
    /// * `partname` - The partname (URI) of this part
    /// * `content_type` - The content type of this part
    /// * `blob` - The binary content of this part
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

/// A part holding serialized XML.
///
/// The content is kept as a UTF-8 string; `blob` exposes its bytes.
#[derive(Debug)]
pub struct XmlPart {
    partname: PackURI,
    content_type: String,
    xml: String,
    rels: Relationships,
}

impl XmlPart {
    /// Create a new XmlPart.
    pub fn new(partname: PackURI, content_type: impl Into<String>, xml: impl Into<String>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type: content_type.into(),
            xml: xml.into(),
            rels,
        }
    }

    /// Get the XML content.
    #[inline]
    pub fn xml_str(&self) -> &str {
        &self.xml
    }

    /// Replace the XML content, keeping relationships.
    pub fn set_xml(&mut self, xml: impl Into<String>) {
        self.xml = xml.into();
    }
}

impl Part for XmlPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        self.xml.as_bytes()
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_part() {
        let partname = PackURI::new("/ppt/media/image1.png").unwrap();
        let content = vec![0x89, 0x50, 0x4E, 0x47];
        let part = BlobPart::new(partname, "image/png", content.clone());

        assert_eq!(part.content_type(), "image/png");
        assert_eq!(part.blob(), content.as_slice());
        assert!(part.rels().is_empty());
    }

    #[test]
    fn test_relate_to_is_relative() {
        let partname = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        let mut part = XmlPart::new(partname, "application/xml", "<p:sld/>");

        let media = PackURI::new("/ppt/media/image1.png").unwrap();
        let r_id = part.relate_to(&media, "image");
        assert_eq!(r_id, "rId1");
        assert_eq!(part.target_ref("rId1").unwrap(), "../media/image1.png");

        assert_eq!(part.relate_to(&media, "image"), "rId1");
        assert!(part.target_ref("rId9").is_err());
    }

    #[test]
    fn test_xml_part_content() {
        let partname = PackURI::new("/ppt/presentation.xml").unwrap();
        let mut part = XmlPart::new(partname, "application/xml", "<a/>");
        assert_eq!(part.blob(), b"<a/>");

        part.set_xml("<b/>");
        assert_eq!(part.xml_str(), "<b/>");
    }
}

/// The in-memory OPC package that gets serialized by `PackageWriter`.
///
/// OpcPackage holds package-level relationships and every part indexed by its
/// partname. Parts are iterated in partname order so that the written archive
/// is deterministic.
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;

/// Upper bound for numbered partnames such as `/ppt/slides/slide%d.xml`.
const MAX_PARTNAME_INDEX: u32 = 10_000;

pub struct OpcPackage {
    /// Package-level relationships (`/_rels/.rels`)
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: BTreeMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Add a new part to the package.
    ///
    /// Fails if a part with the same partname already exists.
    pub fn add_part(&mut self, part: Box<dyn Part>) -> Result<()> {
        let partname = part.partname().to_string();
        if self.parts.contains_key(&partname) {
            return Err(OpcError::DuplicatePart(partname));
        }
        self.parts.insert(partname, part);
        Ok(())
    }

    /// Get a part by its partname.
    pub fn get_part(&self, partname: &PackURI) -> Result<&dyn Part> {
        self.parts
            .get(partname.as_str())
            .map(|b| &**b as &dyn Part)
            .ok_or_else(|| OpcError::PartNotFound(partname.to_string()))
    }

    /// Iterate over all parts in partname order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    /// Get the number of parts in the package.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Get a reference to the package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package to a part.
    ///
    /// Creates or reuses a relationship from the package to the specified
    /// part and returns its rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(PACKAGE_URI);
        let rel = self.rels.get_or_add(reltype, &target_ref);
        rel.r_id().to_string()
    }

    /// Find the next available partname for a part template.
    ///
    /// The template carries a `%d` placeholder for the number, e.g.
    /// `/ppt/media/image%d.png`. Numbering starts at 1.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=MAX_PARTNAME_INDEX)
            .map(|n| template.replace("%d", &n.to_string()))
            .find(|candidate| !self.parts.contains_key(candidate))
            .ok_or_else(|| {
                OpcError::InvalidPackUri(format!("no free partname for template {}", template))
            })
            .and_then(|candidate| PackURI::new(candidate).map_err(OpcError::InvalidPackUri))
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::part::{BlobPart, XmlPart};

    fn xml_part(name: &str) -> Box<dyn Part> {
        Box::new(XmlPart::new(PackURI::new(name).unwrap(), "application/xml", "<x/>"))
    }

    #[test]
    fn test_add_and_get_part() {
        let mut pkg = OpcPackage::new();
        pkg.add_part(xml_part("/ppt/presentation.xml")).unwrap();

        let partname = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(pkg.get_part(&partname).unwrap().blob(), b"<x/>");
        assert!(pkg.get_part(&PackURI::new("/missing.xml").unwrap()).is_err());
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut pkg = OpcPackage::new();
        pkg.add_part(xml_part("/ppt/presentation.xml")).unwrap();
        let err = pkg.add_part(xml_part("/ppt/presentation.xml")).unwrap_err();
        assert!(matches!(err, OpcError::DuplicatePart(_)));
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = OpcPackage::new();
        let first = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(first.as_str(), "/ppt/media/image1.png");

        pkg.add_part(Box::new(BlobPart::new(first, "image/png", vec![1, 2, 3])))
            .unwrap();
        let second = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(second.as_str(), "/ppt/media/image2.png");
    }

    #[test]
    fn test_parts_iterate_in_partname_order() {
        let mut pkg = OpcPackage::new();
        pkg.add_part(xml_part("/ppt/slides/slide1.xml")).unwrap();
        pkg.add_part(xml_part("/docProps/app.xml")).unwrap();
        pkg.add_part(xml_part("/ppt/presentation.xml")).unwrap();

        let names: Vec<&str> = pkg.iter_parts().map(|p| p.partname().as_str()).collect();
        assert_eq!(
            names,
            vec!["/docProps/app.xml", "/ppt/presentation.xml", "/ppt/slides/slide1.xml"]
        );
    }

    #[test]
    fn test_package_relate_to() {
        let mut pkg = OpcPackage::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(pkg.relate_to(&pres, "office"), "rId1");
        assert_eq!(pkg.rels().get("rId1").unwrap().target_ref(), "ppt/presentation.xml");
    }
}

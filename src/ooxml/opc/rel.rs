use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::opc::error::{OpcError, Result};
/// Relationship-related objects for OPC packages.
///
/// This module provides types for managing relationships between parts in an
/// OPC package. Every relationship this crate writes is internal: it points
/// from a source part to another part of the same package.
use std::collections::HashMap;

/// A single relationship from a source part to a target part.
///
/// Identified by an rId (relationship ID) that is unique within its source.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference, relative to the source's base URI
    target_ref: String,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(r_id: String, reltype: String, target_ref: String) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    /// Numeric suffix of the rId, if it has the usual "rIdN" form.
    fn r_id_number(&self) -> Option<u32> {
        parse_r_id(&self.r_id)
    }
}

#[inline]
fn parse_r_id(r_id: &str) -> Option<u32> {
    r_id.strip_prefix("rId")
        .and_then(|digits| atoi_simd::parse::<u32>(digits.as_bytes()).ok())
}

/// Collection of relationships from a single source.
///
/// Uses a HashMap for O(1) lookup by relationship ID.
#[derive(Debug)]
pub struct Relationships {
    /// Base URI for resolving relative references
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    /// Create a new empty relationships collection.
    ///
    /// # Arguments
    /// * `base_uri` - Base URI of the source part (e.g., "/ppt/slides")
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Base URI of the source part.
    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get a relationship by its ID.
    #[inline]
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.get(r_id)
    }

    /// Get or add a relationship to a target part.
    ///
    /// If a relationship of the given type to the target already exists,
    /// returns that relationship. Otherwise, creates a new one with the
    /// next available rId.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> &Relationship {
        let existing = self
            .rels
            .values()
            .find(|rel| rel.reltype() == reltype && rel.target_ref() == target_ref)
            .map(|rel| rel.r_id().to_string());

        let r_id = existing.unwrap_or_else(|| {
            let r_id = self.next_r_id();
            let rel = Relationship::new(r_id.clone(), reltype.to_string(), target_ref.to_string());
            self.rels.insert(r_id.clone(), rel);
            r_id
        });

        &self.rels[&r_id]
    }

    /// Get the next available relationship ID.
    ///
    /// Generates IDs in the format "rId1", "rId2", etc., filling in gaps
    /// if any exist.
    fn next_r_id(&self) -> String {
        let mut used_numbers: Vec<u32> = self.rels.keys().filter_map(|k| parse_r_id(k)).collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    /// Look up the single relationship of a type.
    pub fn part_with_reltype(&self, reltype: &str) -> Result<&Relationship> {
        self.rels
            .values()
            .find(|rel| rel.reltype() == reltype)
            .ok_or_else(|| OpcError::RelationshipNotFound(reltype.to_string()))
    }

    /// Get an iterator over all relationships.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    /// Get the number of relationships in the collection.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check if the collection is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to XML format.
    ///
    /// Generates the XML for a .rels file, with relationships sorted by rId
    /// number for consistent output (rId2 before rId10).
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by(|a, b| {
            a.r_id_number()
                .cmp(&b.r_id_number())
                .then_with(|| a.r_id().cmp(b.r_id()))
        });

        for rel in rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
            ));
        }

        xml.push_str("</Relationships>");

        xml
    }
}

impl Default for Relationships {
    fn default() -> Self {
        Self::new("/".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert(rels: &mut Relationships, target: &str, r_id: &str) {
        let rel = Relationship::new(r_id.to_string(), "type1".to_string(), target.to_string());
        rels.rels.insert(r_id.to_string(), rel);
    }

    #[test]
    fn test_next_r_id_fills_gaps() {
        let mut rels = Relationships::new("/ppt".to_string());
        assert_eq!(rels.next_r_id(), "rId1");

        insert(&mut rels, "target1", "rId1");
        insert(&mut rels, "target3", "rId3");
        assert_eq!(rels.next_r_id(), "rId2");
        assert_eq!(rels.get_or_add("type1", "target2").r_id(), "rId2");
    }

    #[test]
    fn test_get_or_add_reuses() {
        let mut rels = Relationships::new("/ppt".to_string());

        assert_eq!(rels.get_or_add("type1", "target1").r_id(), "rId1");
        assert_eq!(rels.get_or_add("type1", "target1").r_id(), "rId1");
        assert_eq!(rels.get_or_add("type1", "target2").r_id(), "rId2");
        assert_eq!(rels.get_or_add("type2", "target1").r_id(), "rId3");
        assert_eq!(rels.len(), 3);
    }

    #[test]
    fn test_to_xml_numeric_order() {
        let mut rels = Relationships::new("/ppt".to_string());
        for i in 0..11 {
            rels.get_or_add("t", &format!("slides/slide{}.xml", i + 1));
        }

        let xml = rels.to_xml();
        let pos2 = xml.find(r#"Id="rId2""#).unwrap();
        let pos10 = xml.find(r#"Id="rId10""#).unwrap();
        assert!(pos2 < pos10);
        assert!(xml.contains(r#"Target="slides/slide11.xml""#));
        assert!(xml.ends_with("</Relationships>"));
    }

    #[test]
    fn test_part_with_reltype() {
        let mut rels = Relationships::default();
        rels.get_or_add("office", "ppt/presentation.xml");
        assert_eq!(
            rels.part_with_reltype("office").unwrap().target_ref(),
            "ppt/presentation.xml"
        );
        assert!(rels.part_with_reltype("missing").is_err());
    }
}

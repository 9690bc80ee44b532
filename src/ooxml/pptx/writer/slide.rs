/// Slide types and implementation for PPTX presentations.
use crate::common::unit::Emu;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use std::path::Path;

// Import shared format types
use super::super::fill::{LineStyle, ShapeFill};
use super::super::format::ImageFormat;
use super::shape::MutableShape;

/// Shape id 1 is the slide's shape tree itself.
const FIRST_SHAPE_ID: u32 = 2;

/// A mutable slide in a presentation.
///
/// Shapes are kept in z-order: the first shape added is at the back.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier, 256 and up)
    pub(crate) slide_id: u32,
    /// Shapes on the slide
    pub(crate) shapes: Vec<MutableShape>,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            shapes: Vec::new(),
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Shapes in z-order.
    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    fn next_shape_id(&self) -> u32 {
        self.shapes.len() as u32 + FIRST_SHAPE_ID
    }

    fn push_shape(&mut self, shape: MutableShape) -> &mut MutableShape {
        self.shapes.push(shape);
        let last = self.shapes.len() - 1;
        &mut self.shapes[last]
    }

    /// Add a text box to the slide.
    ///
    /// Returns the shape so its run formatting can be set.
    pub fn add_text_box(
        &mut self,
        text: &str,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
    ) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let shape = MutableShape::new_text_box(shape_id, text.to_string(), x, y, width, height);
        self.push_shape(shape)
    }

    /// Add a rectangle to the slide.
    pub fn add_rectangle(
        &mut self,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill: ShapeFill,
        line: LineStyle,
    ) -> &mut MutableShape {
        let shape_id = self.next_shape_id();
        let shape = MutableShape::new_rectangle(shape_id, x, y, width, height, fill, line);
        self.push_shape(shape)
    }

    /// Add a picture to the slide from a file.
    ///
    /// The picture description is the file name.
    pub fn add_picture<P: AsRef<Path>>(
        &mut self,
        image_path: P,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
    ) -> Result<&mut MutableShape> {
        let image_path = image_path.as_ref();
        let data = std::fs::read(image_path)?;
        let description = image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());

        self.add_picture_from_bytes(data, x, y, width, height, description)
    }

    /// Add a picture to the slide from bytes.
    pub fn add_picture_from_bytes(
        &mut self,
        data: Vec<u8>,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: Option<String>,
    ) -> Result<&mut MutableShape> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidImage("unrecognized image format".to_string()))?;

        let shape_id = self.next_shape_id();
        let desc = description.unwrap_or_else(|| "Picture".to_string());
        let shape = MutableShape::new_picture(shape_id, data, format, x, y, width, height, desc);
        Ok(self.push_shape(shape))
    }

    /// Collect all images from this slide, in z-order.
    pub(crate) fn collect_images(&self) -> Vec<(&[u8], ImageFormat)> {
        self.shapes
            .iter()
            .filter_map(|shape| shape.get_image_data())
            .collect()
    }

    /// Generate slide XML content with image relationship IDs from the mapper.
    ///
    /// # Arguments
    /// * `slide_index` - The index of this slide (used to look up relationships)
    /// * `rel_mapper` - The relationship mapper containing actual relationship IDs
    pub(crate) fn to_xml_with_rels(
        &self,
        slide_index: usize,
        rel_mapper: &RelationshipMapper,
    ) -> Result<String> {
        let mut xml = String::with_capacity(2048 + self.shapes.len() * 1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        ));

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");

        // Write group shape properties (required)
        xml.push_str("<p:nvGrpSpPr>");
        xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
        xml.push_str("<p:cNvGrpSpPr/>");
        xml.push_str("<p:nvPr/>");
        xml.push_str("</p:nvGrpSpPr>");
        xml.push_str("<p:grpSpPr>");
        xml.push_str("<a:xfrm>");
        xml.push_str(r#"<a:off x="0" y="0"/>"#);
        xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
        xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
        xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
        xml.push_str("</a:xfrm>");
        xml.push_str("</p:grpSpPr>");

        let mut image_counter = 0;
        for shape in &self.shapes {
            let rel_id = if shape.is_picture() {
                let rid = rel_mapper.get_image_id(slide_index, image_counter);
                image_counter += 1;
                rid
            } else {
                None
            };

            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");

        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

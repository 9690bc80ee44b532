/// Presentation writer for PPTX.
use crate::common::unit::Emu;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use chrono::{DateTime, Utc};
use std::fmt::Write as FmtWrite;
use std::path::Path;

// Import shared format types
use super::super::format::ImageFormat;
use super::slide::MutableSlide;

/// First id PowerPoint accepts in `p:sldIdLst`.
const FIRST_SLIDE_ID: u32 = 256;

/// A mutable PowerPoint presentation for writing.
///
/// Provides methods to add slides and set document properties, and
/// serializes the result as a .pptx package.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: Emu,
    /// Slide height in EMUs
    slide_height: Emu,
    /// Document title for core properties
    title: Option<String>,
    /// Creation time for core properties
    created: DateTime<Utc>,
}

impl MutablePresentation {
    /// Create a new empty presentation with default dimensions.
    ///
    /// Default size is 10" x 7.5" (standard 4:3 aspect ratio).
    pub fn new() -> Self {
        Self::with_size(9_144_000, 6_858_000)
    }

    /// Create a new empty presentation with the given slide size in EMUs.
    pub fn with_size(slide_width: Emu, slide_height: Emu) -> Self {
        Self {
            slides: Vec::new(),
            slide_width,
            slide_height,
            title: None,
            created: Utc::now(),
        }
    }

    /// Add a new slide at the end of the presentation.
    pub fn add_slide(&mut self) -> &mut MutableSlide {
        let index = self.slides.len();
        let slide = MutableSlide::new(FIRST_SLIDE_ID + index as u32);
        self.slides.push(slide);
        &mut self.slides[index]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Slides in presentation order.
    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> Emu {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> Emu {
        self.slide_height
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the document title written to docProps/core.xml.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Serialize the presentation to .pptx bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        super::package::to_bytes(self)
    }

    /// Write the presentation to a .pptx file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    /// Write the presentation to a stream.
    pub fn write_to<W: std::io::Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes()?)?;
        Ok(())
    }

    /// Collect all images from all slides in the presentation.
    pub(crate) fn collect_all_images(&self) -> Vec<(usize, &[u8], ImageFormat)> {
        let mut all_images = Vec::new();

        for (slide_index, slide) in self.slides.iter().enumerate() {
            for (image_data, image_format) in slide.collect_images() {
                all_images.push((slide_index, image_data, image_format));
            }
        }

        all_images
    }

    /// Generate presentation.xml content with actual relationship IDs.
    ///
    /// # Arguments
    /// * `master_rel_id` - Relationship ID of the slide master
    /// * `slide_rel_ids` - Relationship IDs of the slides, in slide order
    pub(crate) fn generate_presentation_xml_with_rels(
        &self,
        master_rel_id: &str,
        slide_rel_ids: &[String],
    ) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.slides.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )?;

        // Write slide master ID list
        xml.push_str("<p:sldMasterIdLst>");
        write!(
            xml,
            r#"<p:sldMasterId id="2147483648" r:id="{}"/>"#,
            master_rel_id
        )?;
        xml.push_str("</p:sldMasterIdLst>");

        // Write slide ID list
        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        // Write slide size
        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;

        xml.push_str("<p:notesSz cx=\"6858000\" cy=\"9144000\"/>");
        xml.push_str("</p:presentation>");

        Ok(xml)
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 9144000);
        assert_eq!(pres.slide_height(), 6858000);
        assert_eq!(pres.title(), None);
    }

    #[test]
    fn test_add_slide() {
        let mut pres = MutablePresentation::with_size(9_144_000, 5_143_500);
        assert_eq!(pres.add_slide().slide_id(), 256);
        assert_eq!(pres.add_slide().slide_id(), 257);
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(pres.slides()[1].slide_id(), 257);
    }

    #[test]
    fn test_add_text_box() {
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide();
        slide.add_text_box("Hello", 100, 100, 500, 200);
        assert_eq!(pres.slides()[0].shape_count(), 1);
    }

    #[test]
    fn test_xml_generation() {
        let mut pres = MutablePresentation::with_size(9_144_000, 5_143_500);
        pres.add_slide();
        pres.add_slide();

        let xml = pres
            .generate_presentation_xml_with_rels("rId1", &["rId2".to_string(), "rId3".to_string()])
            .unwrap();
        assert!(xml.contains(r#"<p:sldMasterId id="2147483648" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
    }
}

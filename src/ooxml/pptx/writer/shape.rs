/// Shape types and implementation for PPTX presentations.
use crate::common::RGBColor;
use crate::common::unit::{Emu, font_size_centipoints};
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

// Import shared format types
pub use super::super::fill::{LineStyle, ShapeFill};
pub use super::super::format::{ImageFormat, TextFormat};

/// A shape on a slide (text box, rectangle, picture).
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID, unique within the slide
    pub(crate) shape_id: u32,
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    TextBox {
        text: String,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        format: TextFormat,
    },
    Rectangle {
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill: ShapeFill,
        line: LineStyle,
    },
    Picture {
        data: Vec<u8>,
        format: ImageFormat,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: String,
    },
}

impl MutableShape {
    pub(crate) fn new_text_box(
        shape_id: u32,
        text: String,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format: TextFormat::default(),
            },
        }
    }

    pub(crate) fn new_rectangle(
        shape_id: u32,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill: ShapeFill,
        line: LineStyle,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Rectangle {
                x,
                y,
                width,
                height,
                fill,
                line,
            },
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_picture(
        shape_id: u32,
        data: Vec<u8>,
        format: ImageFormat,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: String,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Picture {
                data,
                format,
                x,
                y,
                width,
                height,
                description,
            },
        }
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Position and size as `(x, y, width, height)` in EMU.
    pub fn bounds(&self) -> (Emu, Emu, Emu, Emu) {
        match &self.shape_type {
            ShapeType::TextBox {
                x, y, width, height, ..
            }
            | ShapeType::Rectangle {
                x, y, width, height, ..
            }
            | ShapeType::Picture {
                x, y, width, height, ..
            } => (*x, *y, *width, *height),
        }
    }

    /// Text of a text box.
    pub fn text(&self) -> Option<&str> {
        match &self.shape_type {
            ShapeType::TextBox { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Run formatting of a text box.
    pub fn text_format(&self) -> Option<&TextFormat> {
        match &self.shape_type {
            ShapeType::TextBox { format, .. } => Some(format),
            _ => None,
        }
    }

    /// Fill of a rectangle.
    pub fn fill(&self) -> Option<&ShapeFill> {
        match &self.shape_type {
            ShapeType::Rectangle { fill, .. } => Some(fill),
            _ => None,
        }
    }

    /// Outline of a rectangle.
    pub fn line(&self) -> Option<&LineStyle> {
        match &self.shape_type {
            ShapeType::Rectangle { line, .. } => Some(line),
            _ => None,
        }
    }

    pub fn is_picture(&self) -> bool {
        matches!(self.shape_type, ShapeType::Picture { .. })
    }

    /// Set text formatting for this shape (only for text boxes).
    pub fn set_text_format(&mut self, format: TextFormat) -> &mut Self {
        if let ShapeType::TextBox {
            format: ref mut f, ..
        } = self.shape_type
        {
            *f = format;
        }
        self
    }

    fn update_format(&mut self, update: impl FnOnce(&mut TextFormat)) -> &mut Self {
        if let ShapeType::TextBox {
            format: ref mut f, ..
        } = self.shape_type
        {
            update(f);
        }
        self
    }

    /// Builder method: set font.
    pub fn font(&mut self, font: &str) -> &mut Self {
        self.update_format(|f| f.font = Some(font.to_string()))
    }

    /// Builder method: set font size in points.
    pub fn font_size(&mut self, size: f64) -> &mut Self {
        self.update_format(|f| f.size = Some(size))
    }

    /// Builder method: set bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.update_format(|f| f.bold = Some(bold))
    }

    /// Builder method: set italic.
    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.update_format(|f| f.italic = Some(italic))
    }

    /// Builder method: set underline.
    pub fn underline(&mut self, underline: bool) -> &mut Self {
        self.update_format(|f| f.underline = Some(underline))
    }

    /// Builder method: set text color.
    pub fn color(&mut self, color: RGBColor) -> &mut Self {
        self.update_format(|f| f.color = Some(color))
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn get_image_data(&self) -> Option<(&[u8], ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data.as_slice(), *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need the relationship ID of their embedded image.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        // Names follow PowerPoint: the number is one less than the id
        let ordinal = self.shape_id.saturating_sub(1);

        match &self.shape_type {
            ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    self.shape_id, ordinal
                )?;
                xml.push_str("<p:cNvSpPr txBox=\"1\"/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("<a:noFill/>");
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="none" rtlCol="0">"#);
                xml.push_str(r#"<a:spAutoFit/>"#);
                xml.push_str("</a:bodyPr>");
                xml.push_str("<a:lstStyle/>");
                xml.push_str("<a:p>");

                for (index, line) in text.split('\n').enumerate() {
                    if index > 0 {
                        xml.push_str("<a:br>");
                        write_run_properties(xml, format)?;
                        xml.push_str("</a:br>");
                    }
                    if line.is_empty() {
                        continue;
                    }
                    xml.push_str("<a:r>");
                    write_run_properties(xml, format)?;
                    write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
                    xml.push_str("</a:r>");
                }

                xml.push_str("</a:p>");
                xml.push_str("</p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Rectangle {
                x,
                y,
                width,
                height,
                fill,
                line,
            } => {
                xml.push_str("<p:sp>");
                xml.push_str("<p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Rectangle {}"/>"#,
                    self.shape_id, ordinal
                )?;
                xml.push_str("<p:cNvSpPr/>");
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                fill.write_xml(xml);
                line.write_xml(xml);
                xml.push_str("</p:spPr>");

                xml.push_str("<p:style>");
                xml.push_str(r#"<a:lnRef idx="1"><a:schemeClr val="accent1"/></a:lnRef>"#);
                xml.push_str(r#"<a:fillRef idx="3"><a:schemeClr val="accent1"/></a:fillRef>"#);
                xml.push_str(r#"<a:effectRef idx="2"><a:schemeClr val="accent1"/></a:effectRef>"#);
                xml.push_str(r#"<a:fontRef idx="minor"><a:schemeClr val="lt1"/></a:fontRef>"#);
                xml.push_str("</p:style>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr rtlCol="0" anchor="ctr"/>"#);
                xml.push_str("<a:lstStyle/>");
                xml.push_str(r#"<a:p><a:pPr algn="ctr"/></a:p>"#);
                xml.push_str("</p:txBody>");
                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                x,
                y,
                width,
                height,
                description,
                ..
            } => {
                let rid = rel_id.ok_or_else(|| {
                    OoxmlError::Xml(format!(
                        "picture shape {} has no image relationship",
                        self.shape_id
                    ))
                })?;

                xml.push_str("<p:pic>");
                xml.push_str("<p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    ordinal,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr>"#);
                xml.push_str("<p:nvPr/>");
                xml.push_str("</p:nvPicPr>");

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rid)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, x: Emu, y: Emu, width: Emu, height: Emu) -> Result<()> {
    xml.push_str("<a:xfrm>");
    write!(xml, r#"<a:off x="{}" y="{}"/>"#, x, y)?;
    write!(xml, r#"<a:ext cx="{}" cy="{}"/>"#, width, height)?;
    xml.push_str("</a:xfrm>");
    Ok(())
}

/// Write `a:rPr`. Children follow the schema order: fill, then latin font.
fn write_run_properties(xml: &mut String, format: &TextFormat) -> Result<()> {
    xml.push_str("<a:rPr lang=\"en-US\"");

    if let Some(size) = format.size {
        write!(xml, " sz=\"{}\"", font_size_centipoints(size))?;
    }

    if let Some(bold) = format.bold {
        xml.push_str(if bold { " b=\"1\"" } else { " b=\"0\"" });
    }

    if let Some(true) = format.italic {
        xml.push_str(" i=\"1\"");
    }

    if let Some(true) = format.underline {
        xml.push_str(" u=\"sng\"");
    }

    xml.push_str(" dirty=\"0\">");

    if let Some(color) = format.color {
        write!(
            xml,
            "<a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill>",
            color.to_hex()
        )?;
    }

    if let Some(ref font) = format.font {
        write!(xml, "<a:latin typeface=\"{}\"/>", escape_xml(font))?;
    }

    xml.push_str("</a:rPr>");
    Ok(())
}

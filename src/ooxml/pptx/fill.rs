//! Shape fill and outline support.
//!
//! DrawingML writes these inside `p:spPr`, after the geometry: the fill first,
//! then `a:ln`.

use crate::common::RGBColor;
use crate::common::unit::Emu;

/// A gradient stop (position and color).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position from 0.0 to 1.0
    pub position: f64,
    pub color: RGBColor,
}

impl GradientStop {
    pub fn new(position: f64, color: RGBColor) -> Self {
        Self { position, color }
    }
}

/// Fill of an auto shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeFill {
    /// No fill element; the shape style decides.
    None,
    /// Solid color fill
    Solid(RGBColor),
    /// Linear gradient fill
    LinearGradient {
        /// Gradient angle in degrees, clockwise from left-to-right (90 runs top to bottom)
        angle_deg: f64,
        stops: Vec<GradientStop>,
    },
}

impl ShapeFill {
    /// Create a solid fill.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chartdeck::common::RGBColor;
    /// use chartdeck::ooxml::pptx::ShapeFill;
    ///
    /// let fill = ShapeFill::solid(RGBColor::new(0x0F, 0x1E, 0x32));
    /// assert_eq!(fill, ShapeFill::Solid(RGBColor::from_hex("0F1E32").unwrap()));
    /// ```
    pub fn solid(color: RGBColor) -> Self {
        ShapeFill::Solid(color)
    }

    /// Create a linear gradient fill.
    pub fn linear_gradient(angle_deg: f64, stops: Vec<GradientStop>) -> Self {
        ShapeFill::LinearGradient { angle_deg, stops }
    }

    pub(crate) fn write_xml(&self, xml: &mut String) {
        match self {
            ShapeFill::None => {},
            ShapeFill::Solid(color) => {
                xml.push_str("<a:solidFill><a:srgbClr val=\"");
                xml.push_str(&color.to_hex());
                xml.push_str("\"/></a:solidFill>");
            },
            ShapeFill::LinearGradient { angle_deg, stops } => {
                xml.push_str("<a:gradFill rotWithShape=\"1\">");
                xml.push_str("<a:gsLst>");
                for stop in stops {
                    let pos = (stop.position.clamp(0.0, 1.0) * 100000.0).round() as i32;
                    xml.push_str(&format!("<a:gs pos=\"{}\">", pos));
                    xml.push_str("<a:srgbClr val=\"");
                    xml.push_str(&stop.color.to_hex());
                    xml.push_str("\"/>");
                    xml.push_str("</a:gs>");
                }
                xml.push_str("</a:gsLst>");

                let ang_val = (angle_deg.rem_euclid(360.0) * 60000.0).round() as i64;
                xml.push_str(&format!("<a:lin ang=\"{}\" scaled=\"0\"/>", ang_val));
                xml.push_str("</a:gradFill>");
            },
        }
    }
}

/// Outline of an auto shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineStyle {
    /// Explicit `a:noFill`: the shape has no visible border.
    None,
    /// Solid outline with a width in EMU
    Solid { color: RGBColor, width: Emu },
}

impl LineStyle {
    pub(crate) fn write_xml(&self, xml: &mut String) {
        match self {
            LineStyle::None => xml.push_str("<a:ln><a:noFill/></a:ln>"),
            LineStyle::Solid { color, width } => {
                xml.push_str(&format!("<a:ln w=\"{}\">", width));
                xml.push_str("<a:solidFill><a:srgbClr val=\"");
                xml.push_str(&color.to_hex());
                xml.push_str("\"/></a:solidFill>");
                xml.push_str("</a:ln>");
            },
        }
    }
}

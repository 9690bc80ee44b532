//! Deck colors, fonts and fills.

use crate::common::RGBColor;
use crate::ooxml::pptx::{GradientStop, ShapeFill, TextFormat};
use serde::{Deserialize, Serialize};

/// Named colors of the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Bottom of the title slide gradient
    pub primary: RGBColor,
    /// Top of the title slide gradient
    pub secondary: RGBColor,
    /// Image slide band and slide titles
    pub bottom_box: RGBColor,
    pub accent: RGBColor,
    /// Title slide text
    pub text: RGBColor,
    /// Image slide background
    pub background: RGBColor,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: RGBColor::new(0x33, 0x50, 0xB8),
            secondary: RGBColor::new(0x00, 0x00, 0x00),
            bottom_box: RGBColor::new(0x0F, 0x1E, 0x32),
            accent: RGBColor::new(0xFF, 0x7F, 0x00),
            text: RGBColor::new(0xFF, 0xFF, 0xFF),
            background: RGBColor::WHITE,
        }
    }
}

/// Deck styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub colors: Palette,
    pub font: String,
    /// Title slide gradient direction in degrees, 90 runs top to bottom
    pub gradient_angle: f64,
    /// Position of the primary stop in the title gradient (0.0..=1.0)
    pub gradient_midpoint: f64,
    pub title_size: f64,
    pub subtitle_size: f64,
    pub slide_title_size: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: Palette::default(),
            font: "Arial".to_string(),
            gradient_angle: 90.0,
            gradient_midpoint: 0.5,
            title_size: 40.0,
            subtitle_size: 20.0,
            slide_title_size: 28.0,
        }
    }
}

impl Theme {
    pub fn title_background(&self) -> ShapeFill {
        ShapeFill::linear_gradient(
            self.gradient_angle,
            vec![
                GradientStop::new(0.0, self.colors.secondary),
                GradientStop::new(self.gradient_midpoint.clamp(0.0, 1.0), self.colors.primary),
            ],
        )
    }

    pub fn image_background(&self) -> ShapeFill {
        ShapeFill::solid(self.colors.background)
    }

    pub fn band_fill(&self) -> ShapeFill {
        ShapeFill::solid(self.colors.bottom_box)
    }

    pub fn title_format(&self) -> TextFormat {
        self.text_format(self.title_size, true, self.colors.text)
    }

    /// Subtitle runs are not bold.
    pub fn subtitle_format(&self) -> TextFormat {
        self.text_format(self.subtitle_size, false, self.colors.text)
    }

    pub fn slide_title_format(&self) -> TextFormat {
        self.text_format(self.slide_title_size, true, self.colors.bottom_box)
    }

    fn text_format(&self, size: f64, bold: bool, color: RGBColor) -> TextFormat {
        TextFormat {
            font: Some(self.font.clone()),
            size: Some(size),
            bold: bold.then_some(true),
            color: Some(color),
            ..TextFormat::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette() {
        let colors = Palette::default();
        assert_eq!(colors.primary.to_hex(), "3350B8");
        assert_eq!(colors.bottom_box.to_hex(), "0F1E32");
        assert_eq!(colors.accent.to_hex(), "FF7F00");
    }

    #[test]
    fn test_title_gradient() {
        let ShapeFill::LinearGradient { angle_deg, stops } = Theme::default().title_background()
        else {
            panic!("expected a gradient");
        };
        assert_eq!(angle_deg, 90.0);
        assert_eq!(stops.len(), 2);
        assert_eq!(stops[0].position, 0.0);
        assert_eq!(stops[0].color, RGBColor::BLACK);
        assert_eq!(stops[1].position, 0.5);
        assert_eq!(stops[1].color.to_hex(), "3350B8");
    }

    #[test]
    fn test_text_formats() {
        let theme = Theme::default();
        let title = theme.title_format();
        assert_eq!(title.font.as_deref(), Some("Arial"));
        assert_eq!(title.size, Some(40.0));
        assert_eq!(title.bold, Some(true));

        let subtitle = theme.subtitle_format();
        assert_eq!(subtitle.size, Some(20.0));
        assert_eq!(subtitle.bold, None);

        assert_eq!(theme.slide_title_format().color.map(|c| c.to_hex()).as_deref(), Some("0F1E32"));
    }

    #[test]
    fn test_partial_theme_from_json() {
        let json = r##"{"font": "Calibri", "colors": {"primary": "#112233"}}"##;
        let theme: Theme = serde_json::from_str(json).unwrap();
        assert_eq!(theme.font, "Calibri");
        assert_eq!(theme.colors.primary, RGBColor::new(0x11, 0x22, 0x33));
        assert_eq!(theme.colors.bottom_box, Palette::default().bottom_box);
        assert_eq!(theme.title_size, 40.0);
    }
}

//! Presentation template module.
//!
//! Fixed parts every generated deck carries: one slide master, one blank
//! layout, the theme and the presentation-level property parts. Document
//! properties depend on the deck and are generated here too.

use crate::common::unit::Emu;
use crate::common::xml::escape_xml;
use chrono::{DateTime, Utc};

macro_rules! resource {
    ($path:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/", $path))
    };
}

/// Slide master with an empty shape tree and a single layout reference
/// (`rId1`).
pub fn default_slide_master_xml() -> &'static str {
    resource!("slideMasters/slideMaster1.xml")
}

/// The blank layout, the only layout slides are created from.
pub fn blank_slide_layout_xml() -> &'static str {
    resource!("slideLayouts/slideLayout1.xml")
}

pub fn default_theme_xml() -> &'static str {
    resource!("theme/theme1.xml")
}

pub fn default_table_styles_xml() -> &'static str {
    resource!("tableStyles.xml")
}

pub fn default_view_props_xml() -> &'static str {
    resource!("viewProps.xml")
}

pub fn default_pres_props_xml() -> &'static str {
    resource!("presProps.xml")
}

/// Generate docProps/core.xml.
///
/// Timestamps are written in W3CDTF, the form `dcterms:W3CDTF` requires.
pub fn core_props_xml(title: &str, creator: &str, created: DateTime<Utc>) -> String {
    let stamp = created.format("%Y-%m-%dT%H:%M:%SZ");
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            "<dc:title>{title}</dc:title>",
            "<dc:creator>{creator}</dc:creator>",
            "<cp:lastModifiedBy>{creator}</cp:lastModifiedBy>",
            "<cp:revision>1</cp:revision>",
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created>"#,
            r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#,
            "</cp:coreProperties>"
        ),
        title = escape_xml(title),
        creator = escape_xml(creator),
        stamp = stamp,
    )
}

/// Name PowerPoint shows for a slide size, `None` for custom sizes.
pub fn presentation_format(width: Emu, height: Emu) -> Option<&'static str> {
    [(16, 9), (4, 3), (16, 10)]
        .into_iter()
        .find(|&(w, h)| width * h == height * w && width > 0)
        .map(|ratio| match ratio {
            (16, 9) => "On-screen Show (16:9)",
            (4, 3) => "On-screen Show (4:3)",
            _ => "On-screen Show (16:10)",
        })
}

/// Generate docProps/app.xml.
pub fn app_props_xml(application: &str, slide_count: usize, slide_size: (Emu, Emu)) -> String {
    let format = presentation_format(slide_size.0, slide_size.1)
        .map(|name| format!("<PresentationFormat>{}</PresentationFormat>", name))
        .unwrap_or_default();
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            "\n",
            r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            "<TotalTime>0</TotalTime>",
            "<Application>{application}</Application>",
            "{format}",
            "<Slides>{slides}</Slides>",
            "<Notes>0</Notes>",
            "<HiddenSlides>0</HiddenSlides>",
            "<AppVersion>16.0000</AppVersion>",
            "</Properties>"
        ),
        application = escape_xml(application),
        format = format,
        slides = slide_count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_master_references_layout_rid1() {
        let xml = default_slide_master_xml();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(blank_slide_layout_xml().contains(r#"type="blank""#));
    }

    #[test]
    fn test_core_props() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap();
        let xml = core_props_xml("Sales & Ops", "chartdeck", at);
        assert!(xml.contains("<dc:title>Sales &amp; Ops</dc:title>"));
        assert!(xml.contains(">2024-03-05T14:07:09Z</dcterms:created>"));
    }

    #[test]
    fn test_app_props_slide_count() {
        let xml = app_props_xml("chartdeck", 4, (9_144_000, 5_143_500));
        assert!(xml.contains("<Slides>4</Slides>"));
        assert!(xml.contains("<PresentationFormat>On-screen Show (16:9)</PresentationFormat>"));
    }

    #[test]
    fn test_presentation_format_follows_slide_size() {
        assert_eq!(presentation_format(9_144_000, 6_858_000), Some("On-screen Show (4:3)"));
        assert_eq!(presentation_format(9_144_000, 5_715_000), Some("On-screen Show (16:10)"));
        assert_eq!(presentation_format(9_144_000, 9_144_000), None);

        let custom = app_props_xml("chartdeck", 1, (7_000_000, 5_000_000));
        assert!(!custom.contains("PresentationFormat"));
    }
}

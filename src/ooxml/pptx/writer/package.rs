//! Assembles a `MutablePresentation` into an OPC package.
//!
//! Relationships are created before the XML that references them, so every
//! rId written into presentation.xml and the slides is the real one.

use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::error::OpcError;
use crate::ooxml::opc::part::{BlobPart, Part, XmlPart};
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter};
use crate::ooxml::pptx::template;
use crate::ooxml::pptx::writer::pres::MutablePresentation;
use crate::ooxml::pptx::writer::relmap::RelationshipMapper;
use tracing::debug;

/// Application name written to the document properties.
const APPLICATION: &str = "chartdeck";

/// Title used when the presentation has none.
const DEFAULT_TITLE: &str = "PowerPoint Presentation";

fn uri(name: &str) -> Result<PackURI> {
    Ok(PackURI::new(name).map_err(OpcError::InvalidPackUri)?)
}

pub(crate) fn to_bytes(pres: &MutablePresentation) -> Result<Vec<u8>> {
    let package = build_package(pres)?;
    Ok(PackageWriter::to_bytes(&package)?)
}

pub(crate) fn build_package(pres: &MutablePresentation) -> Result<OpcPackage> {
    let mut package = OpcPackage::new();

    let pres_uri = uri("/ppt/presentation.xml")?;
    let master_uri = uri("/ppt/slideMasters/slideMaster1.xml")?;
    let layout_uri = uri("/ppt/slideLayouts/slideLayout1.xml")?;
    let theme_uri = uri("/ppt/theme/theme1.xml")?;

    // Create the presentation part first to manage relationships
    let mut pres_part = XmlPart::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN, String::new());
    let master_rid = pres_part.relate_to(&master_uri, rt::SLIDE_MASTER);

    // The master template references its layout as rId1
    let mut master_part = XmlPart::new(
        master_uri.clone(),
        ct::PML_SLIDE_MASTER,
        template::default_slide_master_xml(),
    );
    master_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
    master_part.relate_to(&theme_uri, rt::THEME);
    package.add_part(Box::new(master_part))?;

    let mut layout_part = XmlPart::new(
        layout_uri.clone(),
        ct::PML_SLIDE_LAYOUT,
        template::blank_slide_layout_xml(),
    );
    layout_part.relate_to(&master_uri, rt::SLIDE_MASTER);
    package.add_part(Box::new(layout_part))?;

    package.add_part(Box::new(XmlPart::new(
        theme_uri.clone(),
        ct::OFC_THEME,
        template::default_theme_xml(),
    )))?;

    // Embed images, one part per picture
    let mut rel_mapper = RelationshipMapper::new();
    let mut slide_parts: Vec<XmlPart> = Vec::with_capacity(pres.slide_count());
    for index in 0..pres.slide_count() {
        let slide_uri = uri(&format!("/ppt/slides/slide{}.xml", index + 1))?;
        let mut slide_part = XmlPart::new(slide_uri, ct::PML_SLIDE, String::new());
        slide_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
        slide_parts.push(slide_part);
    }

    let mut images_in_slide = vec![0usize; pres.slide_count()];
    for (slide_index, data, format) in pres.collect_all_images() {
        let image_uri =
            package.next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
        let rid = slide_parts[slide_index].relate_to(&image_uri, rt::IMAGE);
        rel_mapper.add_image(slide_index, images_in_slide[slide_index], rid);
        images_in_slide[slide_index] += 1;

        debug!(partname = %image_uri, bytes = data.len(), "embedding image");
        package.add_part(Box::new(BlobPart::new(
            image_uri,
            format.mime_type(),
            data.to_vec(),
        )))?;
    }

    let mut slide_rel_ids = Vec::with_capacity(slide_parts.len());
    for (index, mut slide_part) in slide_parts.into_iter().enumerate() {
        let slide_xml = pres.slides[index].to_xml_with_rels(index, &rel_mapper)?;
        slide_part.set_xml(slide_xml);
        slide_rel_ids.push(pres_part.relate_to(slide_part.partname(), rt::SLIDE));
        debug!(
            slide = index + 1,
            shapes = pres.slides[index].shape_count(),
            "slide written"
        );
        package.add_part(Box::new(slide_part))?;
    }

    // Presentation-level property parts
    let property_parts = [
        (
            "/ppt/presProps.xml",
            ct::PML_PRES_PROPS,
            rt::PRES_PROPS,
            template::default_pres_props_xml(),
        ),
        (
            "/ppt/viewProps.xml",
            ct::PML_VIEW_PROPS,
            rt::VIEW_PROPS,
            template::default_view_props_xml(),
        ),
        (
            "/ppt/tableStyles.xml",
            ct::PML_TABLE_STYLES,
            rt::TABLE_STYLES,
            template::default_table_styles_xml(),
        ),
    ];
    for (name, content_type, reltype, xml) in property_parts {
        let part_uri = uri(name)?;
        pres_part.relate_to(&part_uri, reltype);
        package.add_part(Box::new(XmlPart::new(part_uri, content_type, xml)))?;
    }
    pres_part.relate_to(&theme_uri, rt::THEME);

    let pres_xml = pres.generate_presentation_xml_with_rels(&master_rid, &slide_rel_ids)?;
    pres_part.set_xml(pres_xml);
    package.add_part(Box::new(pres_part))?;
    package.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

    // Document properties
    let core_uri = uri("/docProps/core.xml")?;
    let core_xml = template::core_props_xml(
        pres.title().unwrap_or(DEFAULT_TITLE),
        APPLICATION,
        pres.created(),
    );
    package.add_part(Box::new(XmlPart::new(core_uri.clone(), ct::OPC_CORE_PROPERTIES, core_xml)))?;
    package.relate_to(&core_uri, rt::CORE_PROPERTIES);

    let app_uri = uri("/docProps/app.xml")?;
    let slide_size = (pres.slide_width(), pres.slide_height());
    let app_xml = template::app_props_xml(APPLICATION, pres.slide_count(), slide_size);
    let app_part = XmlPart::new(app_uri.clone(), ct::OFC_EXTENDED_PROPERTIES, app_xml);
    package.add_part(Box::new(app_part))?;
    package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);

    Ok(package)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RGBColor;
    use crate::ooxml::pptx::{LineStyle, ShapeFill};
    use quick_xml::Reader;
    use quick_xml::events::Event;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut png = Vec::new();
        image::RgbImage::new(width, height)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        png
    }

    fn read_member(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut content = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
    }

    fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => panic!("malformed XML: {e}\n{xml}"),
            }
        }
    }

    fn sample_presentation() -> MutablePresentation {
        let mut pres = MutablePresentation::with_size(9_144_000, 5_143_500);
        pres.set_title("Quarterly");

        let title = pres.add_slide();
        let black = ShapeFill::solid(RGBColor::BLACK);
        title.add_rectangle(0, 0, 9_144_000, 5_143_500, black, LineStyle::None);
        title.add_text_box("Quarterly <2024>", 457_200, 914_400, 8_229_600, 1_371_600);

        let charts = pres.add_slide();
        charts
            .add_picture_from_bytes(png_bytes(4, 3), 0, 0, 400, 300, Some("a.png".into()))
            .unwrap();
        charts
            .add_picture_from_bytes(png_bytes(2, 2), 0, 0, 200, 200, Some("b.png".into()))
            .unwrap();
        pres
    }

    #[test]
    fn test_package_members() {
        let bytes = sample_presentation().to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        for name in [
            "[Content_Types].xml",
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "ppt/presentation.xml",
            "ppt/_rels/presentation.xml.rels",
            "ppt/slideMasters/slideMaster1.xml",
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            "ppt/slideLayouts/slideLayout1.xml",
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            "ppt/theme/theme1.xml",
            "ppt/presProps.xml",
            "ppt/viewProps.xml",
            "ppt/tableStyles.xml",
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/_rels/slide2.xml.rels",
            "ppt/media/image1.png",
            "ppt/media/image2.png",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }
    }

    #[test]
    fn test_every_xml_part_is_well_formed() {
        let bytes = sample_presentation().to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<String> = archive.file_names().map(str::to_string).collect();

        for name in names.iter().filter(|n| n.ends_with(".xml") || n.ends_with(".rels")) {
            assert_well_formed(&read_member(&mut archive, name));
        }
    }

    #[test]
    fn test_relationship_ids_match_xml() {
        let bytes = sample_presentation().to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let pres_rels = read_member(&mut archive, "ppt/_rels/presentation.xml.rels");
        assert!(pres_rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster""#));
        assert!(pres_rels.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide" Target="slides/slide1.xml""#));

        let pres_xml = read_member(&mut archive, "ppt/presentation.xml");
        assert!(pres_xml.contains(r#"<p:sldId id="256" r:id="rId2"/>"#));
        assert!(pres_xml.contains(r#"<p:sldId id="257" r:id="rId3"/>"#));

        let master_rels = read_member(&mut archive, "ppt/slideMasters/_rels/slideMaster1.xml.rels");
        assert!(master_rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml""#));

        let slide_rels = read_member(&mut archive, "ppt/slides/_rels/slide2.xml.rels");
        assert!(slide_rels.contains(r#"Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout""#));
        assert!(slide_rels.contains(r#"Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png""#));
        assert!(slide_rels.contains(r#"Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image2.png""#));

        let slide_xml = read_member(&mut archive, "ppt/slides/slide2.xml");
        let first = slide_xml.find(r#"r:embed="rId2""#).unwrap();
        let second = slide_xml.find(r#"r:embed="rId3""#).unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_doc_props() {
        let bytes = sample_presentation().to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();

        let core = read_member(&mut archive, "docProps/core.xml");
        assert!(core.contains("<dc:title>Quarterly</dc:title>"));
        assert!(read_member(&mut archive, "docProps/app.xml").contains("<Slides>2</Slides>"));

        let content_types = read_member(&mut archive, "[Content_Types].xml");
        assert!(content_types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(content_types.contains(r#"<Override PartName="/ppt/slides/slide2.xml""#));
    }

    #[test]
    fn test_empty_presentation_is_valid() {
        let bytes = MutablePresentation::new().to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let pres_xml = read_member(&mut archive, "ppt/presentation.xml");
        assert!(!pres_xml.contains("sldIdLst"));
        assert_well_formed(&pres_xml);

        let app_xml = read_member(&mut archive, "docProps/app.xml");
        assert!(app_xml.contains("<PresentationFormat>On-screen Show (4:3)</PresentationFormat>"));
    }

    #[test]
    fn test_control_characters_in_text_stay_well_formed() {
        let mut pres = MutablePresentation::new();
        pres.set_title("Ops\u{1}");
        pres.add_slide().add_text_box("Sales\u{1}\u{8} Q1", 0, 0, 100, 100);

        let bytes = pres.to_bytes().unwrap();
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let slide = read_member(&mut archive, "ppt/slides/slide1.xml");
        assert_well_formed(&slide);
        assert!(slide.contains("<a:t>Sales Q1</a:t>"));
        assert_well_formed(&read_member(&mut archive, "docProps/core.xml"));
    }
}

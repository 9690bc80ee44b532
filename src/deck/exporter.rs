use super::layout::DeckLayout;
use super::theme::Theme;
use crate::Result;
use crate::ooxml::pptx::{ImageFormat, LineStyle, MutablePresentation};
use std::path::Path;
use tracing::debug;

/// Builds a chart deck: a title slide followed by one slide per chart image.
#[derive(Debug)]
pub struct DeckExporter {
    pres: MutablePresentation,
    theme: Theme,
    layout: DeckLayout,
}

impl DeckExporter {
    /// Create an exporter with the default geometry.
    pub fn new(theme: Theme) -> Self {
        Self::from_parts(theme, DeckLayout::default())
    }

    /// Create an exporter with custom geometry.
    pub fn with_params(theme: Theme, layout: DeckLayout) -> Result<Self> {
        layout.validate()?;
        Ok(Self::from_parts(theme, layout))
    }

    fn from_parts(theme: Theme, layout: DeckLayout) -> Self {
        let pres =
            MutablePresentation::with_size(layout.canvas.width_emu(), layout.canvas.height_emu());
        Self {
            pres,
            theme,
            layout,
        }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn layout(&self) -> &DeckLayout {
        &self.layout
    }

    pub fn presentation(&self) -> &MutablePresentation {
        &self.pres
    }

    pub fn slide_count(&self) -> usize {
        self.pres.slide_count()
    }

    /// Set the document title stored in the package properties.
    pub fn set_document_title(&mut self, title: &str) {
        self.pres.set_title(title);
    }

    /// Add a slide with the gradient background, the title and, when given
    /// and non-empty, the subtitle.
    pub fn add_title_slide(&mut self, title: &str, subtitle: Option<&str>) {
        let geometry = self.layout.title_slide();
        let theme = &self.theme;
        let slide = self.pres.add_slide();

        let r = geometry.background;
        let fill = theme.title_background();
        slide.add_rectangle(r.x, r.y, r.width, r.height, fill, LineStyle::None);

        let r = geometry.title;
        slide
            .add_text_box(title, r.x, r.y, r.width, r.height)
            .set_text_format(theme.title_format());

        if let Some(subtitle) = subtitle.filter(|s| !s.is_empty()) {
            let r = geometry.subtitle;
            slide
                .add_text_box(subtitle, r.x, r.y, r.width, r.height)
                .set_text_format(theme.subtitle_format());
        }

        debug!(slide = self.pres.slide_count(), title, "title slide added");
    }

    /// Add a slide showing the image at `path`.
    pub fn add_image_slide<P: AsRef<Path>>(&mut self, path: P, title: Option<&str>) -> Result<()> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let description = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned());
        self.add_image_slide_from_bytes(data, title, description)
    }

    /// Add a slide showing an encoded image.
    ///
    /// The title box is added only when `title` is given and non-empty.
    /// The slide is only added once the image header has been read, so a
    /// rejected image leaves the deck unchanged.
    pub fn add_image_slide_from_bytes(
        &mut self,
        data: Vec<u8>,
        title: Option<&str>,
        description: Option<String>,
    ) -> Result<()> {
        let (px_width, px_height) = ImageFormat::pixel_size(&data)?;
        let geometry = self.layout.image_slide(px_width, px_height)?;
        let theme = &self.theme;
        let slide = self.pres.add_slide();

        let r = geometry.background;
        slide.add_rectangle(r.x, r.y, r.width, r.height, theme.image_background(), LineStyle::None);

        let r = geometry.band;
        slide.add_rectangle(r.x, r.y, r.width, r.height, theme.band_fill(), LineStyle::None);

        let r = geometry.picture;
        slide.add_picture_from_bytes(data, r.x, r.y, r.width, r.height, description)?;

        if let Some(title) = title.filter(|t| !t.is_empty()) {
            let r = geometry.title;
            slide
                .add_text_box(title, r.x, r.y, r.width, r.height)
                .set_text_format(theme.slide_title_format());
        }

        debug!(
            slide = self.pres.slide_count(),
            px_width,
            px_height,
            picture = ?geometry.picture,
            "image slide added"
        );
        Ok(())
    }

    /// Serialize the deck to .pptx bytes.
    pub fn save(&self) -> Result<Vec<u8>> {
        Ok(self.pres.to_bytes()?)
    }
}

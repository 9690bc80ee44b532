//! Raster chart renderer backed by tiny-skia.
//!
//! Draws the figure title, horizontal gridlines with value labels, axes with
//! category labels, the series, and a legend when there is more than one
//! named series, on a white canvas.

use super::figure::{ChartKind, Figure, Series};
use super::text::{Align, TextPainter};
use super::{FigureRenderer, RenderOptions};
use crate::common::RGBColor;
use crate::{Error, Result};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::debug;

/// Series colors used when a series carries none.
pub const DEFAULT_PALETTE: [RGBColor; 10] = [
    RGBColor::new(0x63, 0x6E, 0xFA),
    RGBColor::new(0xEF, 0x55, 0x3B),
    RGBColor::new(0x00, 0xCC, 0x96),
    RGBColor::new(0xAB, 0x63, 0xFA),
    RGBColor::new(0xFF, 0xA1, 0x5A),
    RGBColor::new(0x19, 0xD3, 0xF3),
    RGBColor::new(0xFF, 0x66, 0x92),
    RGBColor::new(0xB6, 0xE8, 0x80),
    RGBColor::new(0xFF, 0x97, 0xFF),
    RGBColor::new(0xFE, 0xCB, 0x52),
];

const GRID_COLOR: RGBColor = RGBColor::new(0xE5, 0xEC, 0xF6);
const AXIS_COLOR: RGBColor = RGBColor::new(0x44, 0x44, 0x44);
const TEXT_COLOR: RGBColor = RGBColor::new(0x2A, 0x3F, 0x5F);
const GRID_INTERVALS: usize = 5;
const AREA_ALPHA: u8 = 90;

// Font sizes in unscaled pixels
const TITLE_SIZE: f32 = 17.0;
const LABEL_SIZE: f32 = 12.0;
const LEGEND_SWATCH: f32 = 12.0;

/// Whether the figure gets a legend row.
fn has_legend(figure: &Figure) -> bool {
    figure.series.len() > 1 && figure.series.iter().any(|s| !s.name.is_empty())
}

fn has_title(figure: &Figure) -> bool {
    figure.title.as_deref().is_some_and(|t| !t.trim().is_empty())
}

/// Label of a gridline value.
fn format_tick(value: f64) -> String {
    let (value, suffix) = match value.abs() {
        v if v >= 1e9 => (value / 1e9, "B"),
        v if v >= 1e6 => (value / 1e6, "M"),
        _ => (value, ""),
    };
    let rounded = (value * 100.0).round() / 100.0;
    let number = if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.2}", rounded).trim_end_matches('0').to_string()
    };
    format!("{}{}", number, suffix)
}

/// Plot area and value mapping, in output pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct PlotGeometry {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub min: f64,
    pub max: f64,
    pub slots: usize,
}

impl PlotGeometry {
    pub fn new(figure: &Figure, width: u32, height: u32, scale: f32) -> Result<Self> {
        let (min, max) = figure.value_range();
        let top = if has_title(figure) { 64.0 } else { 30.0 };
        let bottom = if has_legend(figure) { 88.0 } else { 60.0 };
        let geometry = Self {
            left: 80.0 * scale,
            top: top * scale,
            right: width as f32 - 40.0 * scale,
            bottom: height as f32 - bottom * scale,
            min,
            max,
            slots: figure.point_count().max(1),
        };

        if geometry.right - geometry.left < 1.0 || geometry.bottom - geometry.top < 1.0 {
            return Err(Error::Render(format!(
                "{}x{} px leaves no room for the plot area",
                width, height
            )));
        }
        Ok(geometry)
    }

    pub fn slot_width(&self) -> f32 {
        (self.right - self.left) / self.slots as f32
    }

    pub fn slot_center(&self, index: usize) -> f32 {
        self.left + (index as f32 + 0.5) * self.slot_width()
    }

    pub fn y_for(&self, value: f64) -> f32 {
        let t = (value - self.min) / (self.max - self.min);
        self.bottom - (t as f32) * (self.bottom - self.top)
    }

    /// Bar of `series_index` at `point_index`, or `None` for a zero-height bar.
    pub fn bar_rect(
        &self,
        series_index: usize,
        series_count: usize,
        point_index: usize,
        value: f64,
    ) -> Option<Rect> {
        let slot = self.slot_width();
        let bar_width = slot * 0.8 / series_count.max(1) as f32;
        let x = self.left
            + point_index as f32 * slot
            + slot * 0.1
            + series_index as f32 * bar_width;

        let base = self.y_for(0.0);
        let tip = self.y_for(value);
        if base == tip {
            return None;
        }
        Rect::from_ltrb(x, base.min(tip), x + bar_width, base.max(tip))
    }
}

/// Renders figures with tiny-skia and encodes them as PNG.
///
/// Series without a color of their own take [`DEFAULT_PALETTE`] in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RasterRenderer;

impl RasterRenderer {
    pub fn new() -> Self {
        Self
    }

    fn series_color(&self, index: usize, series: &Series) -> RGBColor {
        series
            .color
            .unwrap_or(DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()])
    }

    /// Draw the figure into a new pixmap.
    pub fn render_pixmap(&self, figure: &Figure, options: &RenderOptions) -> Result<Pixmap> {
        figure.validate()?;
        let (width, height) = options.pixel_size()?;
        let geometry = PlotGeometry::new(figure, width, height, options.scale)?;
        let text = TextPainter::new()?;
        let scale = options.scale;

        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            Error::Render(format!("cannot allocate a {}x{} pixmap", width, height))
        })?;
        pixmap.fill(Color::WHITE);

        draw_grid(&mut pixmap, &geometry, &text, scale);

        let series_count = figure.series.len();
        for (index, series) in figure.series.iter().enumerate() {
            let color = self.series_color(index, series);
            let canvas = &mut pixmap;
            match figure.kind {
                ChartKind::Bar => draw_bars(canvas, &geometry, index, series_count, series, color),
                ChartKind::Line => draw_line(canvas, &geometry, series, color, scale, false),
                ChartKind::Area => draw_line(canvas, &geometry, series, color, scale, true),
            }
        }

        draw_axes(&mut pixmap, &geometry, scale);
        draw_categories(&mut pixmap, &geometry, &text, &figure.categories, scale);

        if let Some(title) = figure.title.as_deref().filter(|_| has_title(figure)) {
            let size = TITLE_SIZE * scale;
            let y = ((geometry.top - text.line_height(size)) / 2.0).max(0.0);
            text.draw(&mut pixmap, title, size, width as f32 / 2.0, y, Align::Center, TEXT_COLOR);
        }
        if has_legend(figure) {
            self.draw_legend(&mut pixmap, figure, &text, scale);
        }

        debug!(
            kind = ?figure.kind,
            series = series_count,
            points = geometry.slots,
            width,
            height,
            "figure rasterized"
        );
        Ok(pixmap)
    }

    /// One swatch and name per series, centered in a row below the
    /// category labels.
    fn draw_legend(&self, pixmap: &mut Pixmap, figure: &Figure, text: &TextPainter, scale: f32) {
        let size = LABEL_SIZE * scale;
        let swatch = LEGEND_SWATCH * scale;
        let gap = 6.0 * scale;
        let spacing = 20.0 * scale;

        let widths: Vec<f32> = figure
            .series
            .iter()
            .map(|s| swatch + gap + text.measure(&s.name, size))
            .collect();
        let total = widths.iter().sum::<f32>() + spacing * widths.len().saturating_sub(1) as f32;

        let center_y = pixmap.height() as f32 - 16.0 * scale;
        let mut x = ((pixmap.width() as f32 - total) / 2.0).max(0.0);
        for ((index, series), entry_width) in figure.series.iter().enumerate().zip(widths) {
            let color = self.series_color(index, series);
            if let Some(rect) = Rect::from_xywh(x, center_y - swatch / 2.0, swatch, swatch) {
                pixmap.fill_rect(rect, &paint(color, 255), Transform::identity(), None);
            }
            let y = center_y - text.line_height(size) / 2.0;
            text.draw(pixmap, &series.name, size, x + swatch + gap, y, Align::Start, TEXT_COLOR);
            x += entry_width + spacing;
        }
    }
}

impl FigureRenderer for RasterRenderer {
    fn render_png(&self, figure: &Figure, options: &RenderOptions) -> Result<Vec<u8>> {
        let pixmap = self.render_pixmap(figure, options)?;
        pixmap
            .encode_png()
            .map_err(|e| Error::Render(format!("PNG encoding failed: {}", e)))
    }
}

fn paint(color: RGBColor, alpha: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r, color.g, color.b, alpha);
    paint.anti_alias = true;
    paint
}

fn stroke_line(
    pixmap: &mut Pixmap,
    from: (f32, f32),
    to: (f32, f32),
    color: RGBColor,
    width: f32,
) {
    let mut builder = PathBuilder::new();
    builder.move_to(from.0, from.1);
    builder.line_to(to.0, to.1);
    if let Some(path) = builder.finish() {
        stroke_path(pixmap, &path, color, width);
    }
}

fn stroke_path(pixmap: &mut Pixmap, path: &Path, color: RGBColor, width: f32) {
    let stroke = Stroke {
        width,
        ..Stroke::default()
    };
    pixmap.stroke_path(path, &paint(color, 255), &stroke, Transform::identity(), None);
}

fn draw_grid(pixmap: &mut Pixmap, geometry: &PlotGeometry, text: &TextPainter, scale: f32) {
    let size = LABEL_SIZE * scale;
    let half_line = text.line_height(size) / 2.0;
    let span = geometry.max - geometry.min;
    for step in 0..=GRID_INTERVALS {
        let value = geometry.min + span * step as f64 / GRID_INTERVALS as f64;
        let y = geometry.y_for(value);
        stroke_line(pixmap, (geometry.left, y), (geometry.right, y), GRID_COLOR, scale);

        let label = format_tick(value);
        let x = geometry.left - 8.0 * scale;
        text.draw(pixmap, &label, size, x, y - half_line, Align::End, TEXT_COLOR);
    }
}

/// Category labels centered under their ticks.
fn draw_categories(
    pixmap: &mut Pixmap,
    geometry: &PlotGeometry,
    text: &TextPainter,
    categories: &[String],
    scale: f32,
) {
    let size = LABEL_SIZE * scale;
    let y = geometry.bottom + 10.0 * scale;
    for (index, label) in categories.iter().take(geometry.slots).enumerate() {
        let x = geometry.slot_center(index);
        text.draw(pixmap, label, size, x, y, Align::Center, TEXT_COLOR);
    }
}

fn draw_axes(pixmap: &mut Pixmap, geometry: &PlotGeometry, scale: f32) {
    let width = 1.5 * scale;
    let (left, right) = (geometry.left, geometry.right);
    let baseline = geometry.y_for(0.0);
    stroke_line(pixmap, (left, baseline), (right, baseline), AXIS_COLOR, width);
    stroke_line(pixmap, (left, geometry.top), (left, geometry.bottom), AXIS_COLOR, width);

    // Category ticks
    let tick_end = geometry.bottom + 6.0 * scale;
    for index in 0..geometry.slots {
        let x = geometry.slot_center(index);
        stroke_line(pixmap, (x, geometry.bottom), (x, tick_end), AXIS_COLOR, width);
    }
}

fn draw_bars(
    pixmap: &mut Pixmap,
    geometry: &PlotGeometry,
    series_index: usize,
    series_count: usize,
    series: &Series,
    color: RGBColor,
) {
    let paint = paint(color, 255);
    for (point, value) in series.values.iter().enumerate() {
        if let Some(rect) = geometry.bar_rect(series_index, series_count, point, *value) {
            pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }
}

fn draw_line(
    pixmap: &mut Pixmap,
    geometry: &PlotGeometry,
    series: &Series,
    color: RGBColor,
    scale: f32,
    filled: bool,
) {
    let points: Vec<(f32, f32)> = series
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| (geometry.slot_center(index), geometry.y_for(*value)))
        .collect();

    if filled && points.len() > 1 {
        let baseline = geometry.y_for(0.0);
        let mut builder = PathBuilder::new();
        builder.move_to(points[0].0, baseline);
        for &(x, y) in &points {
            builder.line_to(x, y);
        }
        builder.line_to(points[points.len() - 1].0, baseline);
        builder.close();
        if let Some(path) = builder.finish() {
            let fill = paint(color, AREA_ALPHA);
            pixmap.fill_path(&path, &fill, FillRule::Winding, Transform::identity(), None);
        }
    }

    let mut builder = PathBuilder::new();
    for (index, &(x, y)) in points.iter().enumerate() {
        if index == 0 {
            builder.move_to(x, y);
        } else {
            builder.line_to(x, y);
        }
    }
    if let Some(path) = builder.finish() {
        stroke_path(pixmap, &path, color, 2.0 * scale);
    }

    // Markers
    let marker = paint(color, 255);
    for &(x, y) in &points {
        if let Some(circle) = PathBuilder::from_circle(x, y, 3.0 * scale) {
            pixmap.fill_path(&circle, &marker, FillRule::Winding, Transform::identity(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> RenderOptions {
        RenderOptions {
            width: 400,
            height: 300,
            scale: 1.0,
        }
    }

    fn rgb_at(pixmap: &Pixmap, x: f32, y: f32) -> (u8, u8, u8) {
        let pixel = pixmap.pixel(x as u32, y as u32).unwrap();
        (pixel.red(), pixel.green(), pixel.blue())
    }

    fn bar_figure(values: Vec<f64>) -> Figure {
        Figure::new(ChartKind::Bar).with_series(Series::new("a", values))
    }

    #[test]
    fn test_geometry_mapping() {
        let figure = bar_figure(vec![1.0, 3.0]);
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();

        assert_eq!(geometry.slots, 2);
        assert_eq!(geometry.y_for(3.0), geometry.top);
        assert_eq!(geometry.y_for(0.0), geometry.bottom);
        assert_eq!(geometry.slot_width(), 140.0);
        assert!(geometry.bar_rect(0, 1, 0, 0.0).is_none());
    }

    #[test]
    fn test_too_small_for_plot() {
        let figure = bar_figure(vec![1.0]);
        assert!(PlotGeometry::new(&figure, 100, 80, 1.0).is_err());
    }

    #[test]
    fn test_bar_pixels() {
        let figure = bar_figure(vec![1.0]);
        let renderer = RasterRenderer::new();
        let pixmap = renderer.render_pixmap(&figure, &options()).unwrap();
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();

        let bar = geometry.bar_rect(0, 1, 0, 1.0).unwrap();
        let center = (bar.left() + bar.width() / 2.0, bar.top() + bar.height() / 2.0);
        assert_eq!(rgb_at(&pixmap, center.0, center.1), (0x63, 0x6E, 0xFA));
        assert_eq!(rgb_at(&pixmap, 2.0, 2.0), (255, 255, 255));
    }

    #[test]
    fn test_negative_bar_hangs_below_baseline() {
        let figure = bar_figure(vec![2.0, -2.0]);
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();
        let up = geometry.bar_rect(0, 1, 0, 2.0).unwrap();
        let down = geometry.bar_rect(0, 1, 1, -2.0).unwrap();
        assert!(up.bottom() <= down.top() + 0.001);
        assert!((up.height() - down.height()).abs() < 0.001);
    }

    #[test]
    fn test_series_color_override() {
        let mut series = Series::new("a", vec![1.0]);
        series.color = Some(RGBColor::new(0x0F, 0x1E, 0x32));
        let figure = Figure::new(ChartKind::Bar).with_series(series);

        let pixmap = RasterRenderer::new().render_pixmap(&figure, &options()).unwrap();
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();
        let bar = geometry.bar_rect(0, 1, 0, 1.0).unwrap();
        let (x, y) = (bar.left() + bar.width() / 2.0, bar.top() + bar.height() / 2.0);
        assert_eq!(rgb_at(&pixmap, x, y), (0x0F, 0x1E, 0x32));
    }

    #[test]
    fn test_png_size_follows_scale() {
        let figure = Figure::new(ChartKind::Area)
            .with_series(Series::new("a", vec![1.0, 4.0, 2.0]))
            .with_series(Series::new("b", vec![0.5, 1.0, 3.0]));
        let options = RenderOptions {
            width: 320,
            height: 180,
            scale: 2.0,
        };

        let png = RasterRenderer::new().render_png(&figure, &options).unwrap();
        let decoded = image::load_from_memory(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (640, 360));
    }

    #[test]
    fn test_line_with_single_point() {
        let figure = Figure::new(ChartKind::Line).with_series(Series::new("a", vec![1.0]));
        assert!(RasterRenderer::new().render_png(&figure, &options()).is_ok());
    }

    fn non_white(pixmap: &Pixmap, xs: std::ops::Range<u32>, ys: std::ops::Range<u32>) -> usize {
        ys.flat_map(|y| xs.clone().map(move |x| (x, y)))
            .filter(|&(x, y)| rgb_at(pixmap, x as f32, y as f32) != (255, 255, 255))
            .count()
    }

    fn has_pixel(pixmap: &Pixmap, ys: std::ops::Range<u32>, color: RGBColor) -> bool {
        ys.flat_map(|y| (0..pixmap.width()).map(move |x| (x, y)))
            .any(|(x, y)| rgb_at(pixmap, x as f32, y as f32) == (color.r, color.g, color.b))
    }

    #[test]
    fn test_figure_title_drawn() {
        let plain = bar_figure(vec![1.0, 2.0]);
        let titled = plain.clone().with_title("Revenue by Region");
        let renderer = RasterRenderer::new();

        let geometry = PlotGeometry::new(&titled, 400, 300, 1.0).unwrap();
        assert_eq!(geometry.top, 64.0);
        let columns = geometry.left as u32..geometry.right as u32;

        let pixmap = renderer.render_pixmap(&titled, &options()).unwrap();
        assert!(non_white(&pixmap, columns.clone(), 0..(geometry.top as u32 - 6)) > 50);

        let pixmap = renderer.render_pixmap(&plain, &options()).unwrap();
        assert_eq!(non_white(&pixmap, columns, 0..20), 0);
    }

    #[test]
    fn test_blank_title_keeps_plot_area() {
        let figure = bar_figure(vec![1.0]).with_title("  ");
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();
        assert_eq!(geometry.top, 30.0);
    }

    #[test]
    fn test_category_labels_drawn() {
        let mut labelled = bar_figure(vec![1.0, 2.0]);
        labelled.categories = vec!["North".to_string(), "South".to_string()];
        let renderer = RasterRenderer::new();
        let geometry = PlotGeometry::new(&labelled, 400, 300, 1.0).unwrap();
        let band = (geometry.bottom as u32 + 8)..(geometry.bottom as u32 + 28);
        let columns = geometry.left as u32..geometry.right as u32;

        let pixmap = renderer.render_pixmap(&labelled, &options()).unwrap();
        assert!(non_white(&pixmap, columns.clone(), band.clone()) > 20);

        let pixmap = renderer.render_pixmap(&bar_figure(vec![1.0, 2.0]), &options()).unwrap();
        assert_eq!(non_white(&pixmap, columns, band), 0);
    }

    #[test]
    fn test_value_labels_left_of_axis() {
        let pixmap = RasterRenderer::new()
            .render_pixmap(&bar_figure(vec![5.0]), &options())
            .unwrap();
        let geometry = PlotGeometry::new(&bar_figure(vec![5.0]), 400, 300, 1.0).unwrap();
        let rows = geometry.top as u32..geometry.bottom as u32;
        assert!(non_white(&pixmap, 0..(geometry.left as u32 - 4), rows) > 20);
    }

    #[test]
    fn test_legend_for_multiple_series() {
        let figure = Figure::new(ChartKind::Bar)
            .with_series(Series::new("2023", vec![1.0, 2.0]))
            .with_series(Series::new("2024", vec![2.0, 3.0]));
        let geometry = PlotGeometry::new(&figure, 400, 300, 1.0).unwrap();
        assert_eq!(geometry.bottom, 212.0);

        let pixmap = RasterRenderer::new().render_pixmap(&figure, &options()).unwrap();
        assert!(has_pixel(&pixmap, 270..300, DEFAULT_PALETTE[0]));
        assert!(has_pixel(&pixmap, 270..300, DEFAULT_PALETTE[1]));

        let single = bar_figure(vec![1.0, 2.0]);
        let pixmap = RasterRenderer::new().render_pixmap(&single, &options()).unwrap();
        assert_eq!(non_white(&pixmap, 0..400, 270..300), 0);
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(0.0), "0");
        assert_eq!(format_tick(-3.0), "-3");
        assert_eq!(format_tick(2.5), "2.5");
        assert_eq!(format_tick(1.25), "1.25");
        assert_eq!(format_tick(0.6000000001), "0.6");
        assert_eq!(format_tick(2_500_000.0), "2.5M");
        assert_eq!(format_tick(3e9), "3B");
    }

    #[test]
    fn test_invalid_figure_fails() {
        let figure = Figure::new(ChartKind::Line);
        let err = RasterRenderer::new().render_png(&figure, &options()).unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }
}

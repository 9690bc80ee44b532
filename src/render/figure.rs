//! Chart figures.
//!
//! A figure is the data of one chart, already aggregated. Figures arrive as
//! JSON, one column of figures per file:
//!
//! ```json
//! [
//!   {
//!     "title": "Revenue",
//!     "kind": "bar",
//!     "categories": ["Q1", "Q2", "Q3"],
//!     "series": [{ "name": "2024", "values": [3.1, 4.0, 2.7], "color": "3350B8" }]
//!   }
//! ]
//! ```

use crate::common::RGBColor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// How the series of a figure are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Area,
}

/// One named sequence of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    #[serde(default)]
    pub name: String,
    pub values: Vec<f64>,
    /// Overrides the palette color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<RGBColor>,
}

impl Series {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
            color: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Figure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub kind: ChartKind,
    /// Labels of the x positions
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub series: Vec<Series>,
}

impl Figure {
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    /// Number of x positions: the longest series or the category count.
    pub fn point_count(&self) -> usize {
        self.series
            .iter()
            .map(|s| s.values.len())
            .chain(std::iter::once(self.categories.len()))
            .max()
            .unwrap_or(0)
    }

    /// Check that the figure can be drawn.
    pub fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(Error::Render("figure has no series".to_string()));
        }
        for series in &self.series {
            if series.values.is_empty() {
                return Err(Error::Render(format!("series '{}' has no values", series.name)));
            }
            if let Some(value) = series.values.iter().find(|v| !v.is_finite()) {
                return Err(Error::Render(format!(
                    "series '{}' contains a non-finite value ({})",
                    series.name, value
                )));
            }
        }
        Ok(())
    }

    /// Value range covered by the axis, always including zero.
    ///
    /// The range is never empty: a figure whose values are all zero spans
    /// `0.0..1.0`.
    pub fn value_range(&self) -> (f64, f64) {
        let (min, max) = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if max - min <= f64::EPSILON {
            (min, min + 1.0)
        } else {
            (min, max)
        }
    }
}

/// Parse one column of figures: a JSON array of figures or a single figure.
pub fn parse_column(json: &str) -> Result<Vec<Figure>> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Column {
        Many(Vec<Figure>),
        One(Box<Figure>),
    }

    Ok(match serde_json::from_str::<Column>(json)? {
        Column::Many(figures) => figures,
        Column::One(figure) => vec![*figure],
    })
}

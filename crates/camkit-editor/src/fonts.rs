//! Text outlines for the text tool.
//!
//! The editor only needs a closed outline for a string. `SystemFontProvider`
//! resolves a face through fontdb, loads it with rusttype and flattens the
//! glyph curves with lyon.

use camkit_core::Units;
use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use lyon::math::point;
use lyon::path::iterator::PathIterator;
use lyon::path::Path;
use rusttype::{point as rt_point, Font, OutlineBuilder, Scale};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::geometry::clip::ring_contains;
use crate::geometry::{signed_area, Geometry, Point, Polygon};

/// Curve flattening tolerance in font units after scaling
const FLATTEN_TOLERANCE: f32 = 0.01;

/// Points per inch
const POINTS_PER_INCH: f64 = 72.0;

/// Font styles accepted by the text tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FontStyle {
    #[default]
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    pub fn is_bold(self) -> bool {
        matches!(self, Self::Bold | Self::BoldItalic)
    }

    pub fn is_italic(self) -> bool {
        matches!(self, Self::Italic | Self::BoldItalic)
    }
}

impl fmt::Display for FontStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Bold => write!(f, "Bold"),
            Self::Italic => write!(f, "Italic"),
            Self::BoldItalic => write!(f, "BoldItalic"),
        }
    }
}

impl FromStr for FontStyle {
    type Err = FontError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '-', '_'], "").as_str() {
            "regular" | "normal" => Ok(Self::Regular),
            "bold" => Ok(Self::Bold),
            "italic" => Ok(Self::Italic),
            "bolditalic" => Ok(Self::BoldItalic),
            other => Err(FontError::UnsupportedStyle(other.to_string())),
        }
    }
}

/// Font lookup and outline errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FontError {
    #[error("no font named '{family}' with style {style}")]
    NotFound { family: String, style: FontStyle },

    #[error("font data for '{0}' could not be parsed")]
    InvalidData(String),

    #[error("unsupported style '{0}'")]
    UnsupportedStyle(String),

    #[error("text produced no outline")]
    EmptyOutline,
}

/// Source of text outlines
pub trait FontProvider {
    /// Outline of `text` with its baseline starting at the origin.
    ///
    /// `size` is in points and converted to `units`.
    fn outline_for(
        &self,
        text: &str,
        font: &str,
        size: f64,
        style: FontStyle,
        units: Units,
    ) -> Result<Geometry, FontError>;
}

/// Font provider backed by the fonts installed on the system
#[derive(Default)]
pub struct SystemFontProvider {
    cache: parking_lot::Mutex<HashMap<(String, FontStyle), Font<'static>>>,
}

impl fmt::Debug for SystemFontProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemFontProvider")
            .field("cached", &self.cache.lock().len())
            .finish()
    }
}

impl SystemFontProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn font(&self, family: &str, style: FontStyle) -> Result<Font<'static>, FontError> {
        let key = (family.to_string(), style);
        if let Some(font) = self.cache.lock().get(&key) {
            return Ok(font.clone());
        }
        let font = load_font(family, style)?;
        self.cache.lock().insert(key, font.clone());
        Ok(font)
    }
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "system fonts loaded");
        db
    })
}

fn load_font(family: &str, style: FontStyle) -> Result<Font<'static>, FontError> {
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other)],
    };
    let query = Query {
        families: &families,
        weight: if style.is_bold() {
            Weight::BOLD
        } else {
            Weight::NORMAL
        },
        stretch: Stretch::Normal,
        style: if style.is_italic() {
            Style::Italic
        } else {
            Style::Normal
        },
    };

    let not_found = || FontError::NotFound {
        family: family.to_string(),
        style,
    };
    let id = db().query(&query).ok_or_else(not_found)?;
    db().with_face_data(id, |data, index| {
        Font::try_from_vec_and_index(data.to_vec(), index)
    })
    .ok_or_else(not_found)?
    .ok_or_else(|| FontError::InvalidData(family.to_string()))
}

impl FontProvider for SystemFontProvider {
    fn outline_for(
        &self,
        text: &str,
        font: &str,
        size: f64,
        style: FontStyle,
        units: Units,
    ) -> Result<Geometry, FontError> {
        let font = self.font(font, style)?;
        let height = match units {
            Units::Metric => size / POINTS_PER_INCH * 25.4,
            Units::Imperial => size / POINTS_PER_INCH,
        };
        let scale = Scale::uniform(height as f32);

        let mut collector = PathCollector::default();
        for glyph in font.layout(text, scale, rt_point(0.0, 0.0)) {
            glyph.build_outline(&mut collector);
        }
        let path = collector.finish();
        let polygon = rings_to_geometry(flatten(&path));
        if polygon.is_empty() {
            return Err(FontError::EmptyOutline);
        }
        Ok(polygon)
    }
}

/// Feeds rusttype outline callbacks into a lyon path, flipping Y up.
#[derive(Default)]
struct PathCollector {
    builder: Option<lyon::path::path::Builder>,
    open: bool,
}

impl PathCollector {
    fn builder(&mut self) -> &mut lyon::path::path::Builder {
        self.builder.get_or_insert_with(Path::builder)
    }

    fn finish(mut self) -> Path {
        if self.open {
            self.builder().end(true);
        }
        self.builder.take().unwrap_or_else(Path::builder).build()
    }
}

impl OutlineBuilder for PathCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        if self.open {
            self.builder().end(true);
        }
        self.builder().begin(point(x, -y));
        self.open = true;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder().line_to(point(x, -y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder()
            .quadratic_bezier_to(point(x1, -y1), point(x, -y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder()
            .cubic_bezier_to(point(x1, -y1), point(x2, -y2), point(x, -y));
    }

    fn close(&mut self) {
        if self.open {
            self.builder().end(true);
            self.open = false;
        }
    }
}

fn flatten(path: &Path) -> Vec<Vec<Point>> {
    let mut rings = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    for event in path.iter().flattened(FLATTEN_TOLERANCE) {
        match event {
            lyon::path::Event::Begin { at } => {
                current.clear();
                current.push(Point::new(at.x as f64, at.y as f64));
            }
            lyon::path::Event::Line { to, .. } => {
                current.push(Point::new(to.x as f64, to.y as f64));
            }
            lyon::path::Event::End { .. } => {
                if current.len() >= 3 {
                    rings.push(std::mem::take(&mut current));
                }
            }
            _ => {}
        }
    }
    rings
}

/// Nest glyph contours by containment depth: even depth is an outline,
/// odd depth a hole in the innermost outline around it.
pub(crate) fn rings_to_geometry(rings: Vec<Vec<Point>>) -> Geometry {
    let depth = |i: usize| {
        rings
            .iter()
            .enumerate()
            .filter(|(j, other)| *j != i && ring_contains(other, &rings[i][0]))
            .count()
    };
    let depths: Vec<usize> = (0..rings.len()).map(depth).collect();

    let mut polygons: Vec<(usize, Polygon)> = rings
        .iter()
        .enumerate()
        .filter(|(i, _)| depths[*i] % 2 == 0)
        .map(|(i, ring)| (i, Polygon::new(ring.clone())))
        .collect();

    for (i, hole) in rings.iter().enumerate().filter(|(i, _)| depths[*i] % 2 == 1) {
        let owner = polygons
            .iter_mut()
            .filter(|(_, poly)| ring_contains(&poly.exterior, &hole[0]))
            .min_by(|(_, a), (_, b)| {
                signed_area(&a.exterior)
                    .abs()
                    .total_cmp(&signed_area(&b.exterior).abs())
            });
        match owner {
            Some((_, poly)) => poly.interiors.push(hole.clone()),
            None => tracing::debug!(ring = i, "orphan glyph hole dropped"),
        }
    }

    Geometry::from_polygons(polygons.into_iter().map(|(_, p)| p).collect())
}

//! Payloads exchanged with the host application.
//!
//! A session is loaded from one of these objects and, on finalize, sends an
//! updated one as the parameters of a background job.

use camkit_core::Units;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::{Geometry, Point};

/// Geometry object as handed over by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeometryObject {
    pub name: String,
    #[serde(default)]
    pub geometry: Vec<Geometry>,
}

/// One drill hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrillPoint {
    pub point: Point,
    /// Tool number in `DrillObject::tools`
    pub tool: usize,
}

/// Drill object as handed over by the host
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DrillObject {
    pub name: String,
    #[serde(default)]
    pub units: Units,
    /// Tool number to diameter
    #[serde(default)]
    pub tools: BTreeMap<usize, f64>,
    #[serde(default)]
    pub drills: Vec<DrillPoint>,
}

/// Break polygons into one closed line per ring; lines pass through.
pub fn split_rings(geometry: &Geometry) -> Vec<Geometry> {
    if geometry.is_polygonal() {
        let mut rings = geometry.exteriors();
        rings.extend(geometry.interiors());
        rings
    } else {
        vec![geometry.clone()]
    }
}

/// Name given to an object after an edit session changed it.
///
/// `board` becomes `board_edit`, `board_edit` becomes `board_edit_1` and a
/// trailing number is incremented.
pub fn edited_name(name: &str) -> String {
    if !name.contains("_edit") {
        return format!("{}_edit", name);
    }
    let digits = name
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .count();
    if digits == 0 {
        return format!("{}_1", name);
    }
    let (stem, number) = name.split_at(name.len() - digits);
    match number.parse::<u64>() {
        Ok(n) => format!("{}{}", stem, n + 1),
        Err(_) => format!("{}_1", name),
    }
}

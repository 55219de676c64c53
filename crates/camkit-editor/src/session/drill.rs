//! Drill editor session
//!
//! Drill markers are grouped in one [`ShapeStore`] per diameter. Tool
//! numbers are not stored; they follow from the ascending order of the
//! diameters whenever the tool table is read.

use camkit_core::{DiameterKey, JobId, Units};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::config::EditorConfig;
use crate::error::{EditError, Result};
use crate::geometry::{Affine, Geometry, Point};
use crate::selection_manager::SelectionManager;
use crate::shape_store::{Shape, ShapeId, ShapeStore};
use crate::snap::{PointSource, SnapEngine};
use crate::tools::drill::{marker, marker_point};
use crate::tools::{
    EditorView, Key, Modifiers, Status, ToolKind, ToolOutput, ToolParameters, ToolRegistry,
};

use super::geometry::on_off;
use super::host::{edited_name, DrillObject, DrillPoint};
use super::{Collaborators, Session, SessionState};

pub type DrillEditor = Session<DrillState>;

/// One row of the tool table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToolTableRow {
    /// 1-based tool number
    pub tool: usize,
    pub diameter: DiameterKey,
    pub drills: usize,
}

pub struct DrillState {
    name: String,
    units: Units,
    buckets: BTreeMap<DiameterKey, ShapeStore>,
    active: Option<DiameterKey>,
    selection: SelectionManager,
    snap: SnapEngine,
    config: EditorConfig,
    parameters: ToolParameters,
    modifiers: Modifiers,
    modified: bool,
}

impl DrillState {
    pub fn new(config: EditorConfig) -> Self {
        let mut parameters = ToolParameters::default();
        parameters.drill_array = config.drill.array.clone();
        Self {
            name: String::new(),
            units: config.units,
            buckets: BTreeMap::new(),
            active: None,
            selection: SelectionManager::new(),
            snap: SnapEngine::new(config.snap.clone()),
            config,
            parameters,
            modifiers: Modifiers::default(),
            modified: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn units(&self) -> Units {
        self.units
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    /// Diameter new drills are added with
    pub fn active(&self) -> Option<DiameterKey> {
        self.active
    }

    /// Bucket key for a diameter. Fails when the diameter is not positive at
    /// the precision of the current units.
    pub fn key(&self, diameter: f64) -> Result<DiameterKey> {
        DiameterKey::checked(diameter, self.units).ok_or_else(|| EditError::InvalidParameter {
            name: "tool diameter",
            reason: format!(
                "{} is not a positive number at {} decimals",
                diameter,
                self.units.decimals()
            ),
        })
    }

    pub fn bucket(&self, key: DiameterKey) -> Option<&ShapeStore> {
        self.buckets.get(&key)
    }

    pub fn diameters(&self) -> Vec<DiameterKey> {
        self.buckets.keys().copied().collect()
    }

    /// Diameter bucket holding `id`
    pub fn bucket_of(&self, id: ShapeId) -> Option<DiameterKey> {
        self.buckets
            .iter()
            .find(|(_, store)| store.contains(id))
            .map(|(key, _)| *key)
    }

    pub fn drill_count(&self) -> usize {
        self.buckets.values().map(ShapeStore::len).sum()
    }

    /// Tool numbers 1..n in ascending diameter order
    pub fn tool_table(&self) -> Vec<ToolTableRow> {
        self.buckets
            .iter()
            .enumerate()
            .map(|(i, (diameter, store))| ToolTableRow {
                tool: i + 1,
                diameter: *diameter,
                drills: store.len(),
            })
            .collect()
    }

    fn bucket_mut(&mut self, key: DiameterKey) -> &mut ShapeStore {
        let tolerance = self.config.drawing.index_tolerance;
        self.buckets
            .entry(key)
            .or_insert_with(|| ShapeStore::with_tolerance(tolerance))
    }

    /// Remove `touched` buckets that have become empty
    fn prune(&mut self, touched: &BTreeSet<DiameterKey>) {
        for key in touched {
            if self.buckets.get(key).is_some_and(ShapeStore::is_empty) {
                self.buckets.remove(key);
                tracing::debug!(diameter = %key, "empty drill tool removed");
                if self.active == Some(*key) {
                    self.active = None;
                }
            }
        }
    }

    /// Replace the contents with the host object
    pub fn load(&mut self, object: &DrillObject) {
        self.buckets.clear();
        self.selection.clear();
        self.active = None;
        self.modified = false;
        self.name = object.name.clone();
        self.units = object.units;
        for (tool, diameter) in &object.tools {
            match self.key(*diameter) {
                Ok(key) => {
                    self.bucket_mut(key);
                }
                Err(err) => {
                    tracing::warn!(tool, error = %err, "tool with unusable diameter skipped");
                }
            }
        }
        for drill in &object.drills {
            let Some(diameter) = object.tools.get(&drill.tool).copied() else {
                tracing::warn!(tool = drill.tool, "drill references an unknown tool, skipped");
                continue;
            };
            let Ok(key) = self.key(diameter) else {
                continue;
            };
            self.bucket_mut(key)
                .insert(Shape::new(marker(drill.point, key.value())));
        }
        tracing::info!(name = %self.name, drills = self.drill_count(), tools = self.buckets.len(), "drills loaded");
    }

    /// Host object for the current contents; renamed when anything changed
    pub fn to_object(&self) -> DrillObject {
        let name = if self.modified {
            edited_name(&self.name)
        } else {
            self.name.clone()
        };
        let mut tools = BTreeMap::new();
        let mut drills = Vec::new();
        for (i, (key, store)) in self.buckets.iter().enumerate() {
            let tool = i + 1;
            tools.insert(tool, key.value());
            drills.extend(
                store
                    .all_objects()
                    .filter_map(|shape| marker_point(&shape.geometry, key.value()))
                    .map(|point| DrillPoint { point, tool }),
            );
        }
        DrillObject {
            name,
            units: self.units,
            tools,
            drills,
        }
    }

    /// Add an empty tool and make it active
    pub fn add_tool(&mut self, diameter: f64) -> Result<Option<Status>> {
        let key = self.key(diameter)?;
        if self.buckets.contains_key(&key) {
            return Err(EditError::DuplicateTool);
        }
        self.bucket_mut(key);
        self.active = Some(key);
        self.modified = true;
        Ok(Some(Status::success(format!(
            "Added new tool with dia: {} {}",
            key,
            self.units.label()
        ))))
    }

    /// Delete tools together with all their drills
    pub fn delete_tools(&mut self, keys: &[DiameterKey]) -> Result<Vec<Status>> {
        if keys.is_empty() {
            return Err(EditError::NoToolSelected);
        }
        let mut messages = Vec::new();
        for key in keys {
            let Some(store) = self.buckets.remove(key) else {
                continue;
            };
            for id in store.ids() {
                self.selection.deselect(id);
            }
            if self.active == Some(*key) {
                self.active = None;
            }
            self.modified = true;
            messages.push(Status::success(format!(
                "Deleted tool with dia: {} {}",
                key,
                self.units.label()
            )));
        }
        if messages.is_empty() {
            return Err(EditError::NoToolSelected);
        }
        Ok(messages)
    }

    /// Change a tool diameter, scaling its drills into the new bucket
    pub fn edit_tool_diameter(&mut self, old: DiameterKey, diameter: f64) -> Result<Option<Status>> {
        let new = self.key(diameter)?;
        if new == old {
            return Ok(None);
        }
        let Some(mut store) = self.buckets.remove(&old) else {
            return Err(EditError::NoToolSelected);
        };
        let factor = new.value() / old.value();
        let target = self.bucket_mut(new);
        for shape in store.drain() {
            let resized = resize_marker(&shape.geometry, old.value(), factor);
            target.insert(Shape {
                geometry: resized,
                ..shape
            });
        }
        if self.active == Some(old) {
            self.active = Some(new);
        }
        self.modified = true;
        Ok(Some(Status::success("Tool was edited in Tool Table.")))
    }

    /// Select every drill of a tool and make it active
    pub fn select_tool_row(&mut self, key: DiameterKey) -> Result<Option<Status>> {
        let store = self.buckets.get(&key).ok_or(EditError::NoToolSelected)?;
        self.selection.replace(store.ids());
        self.active = Some(key);
        Ok(None)
    }

    pub fn delete_selected(&mut self) -> Result<Option<Status>> {
        let ids = self.selection.selected().to_vec();
        if ids.is_empty() {
            return Err(EditError::NothingSelectedTo("delete"));
        }
        let mut touched = BTreeSet::new();
        for id in ids {
            if let Some(key) = self.bucket_of(id) {
                self.bucket_mut(key).remove(id);
                touched.insert(key);
            }
        }
        self.selection.clear();
        self.prune(&touched);
        self.modified = true;
        Ok(Some(Status::success("Done. Drill(s) deleted.")))
    }

    /// Move the selected drills into the bucket for `diameter`
    pub fn resize_selected(&mut self, diameter: f64) -> Result<Option<Status>> {
        let ids = self.selection.selected().to_vec();
        if ids.is_empty() {
            return Err(EditError::NothingSelectedTo("resize"));
        }
        let new = self.key(diameter)?;
        let mut touched = BTreeSet::new();
        for id in ids {
            let Some(old) = self.bucket_of(id) else {
                continue;
            };
            if old == new {
                continue;
            }
            let Some(shape) = self.bucket_mut(old).remove(id) else {
                continue;
            };
            let factor = new.value() / old.value();
            let geometry = resize_marker(&shape.geometry, old.value(), factor);
            self.bucket_mut(new).insert(Shape { geometry, ..shape });
            touched.insert(old);
        }
        self.selection.clear();
        self.prune(&touched);
        self.active = Some(new);
        self.modified = true;
        tracing::info!(diameter = %new, "drills resized");
        Ok(Some(Status::success("Done. Drill Resize completed.")))
    }

    fn translate_selected(&mut self, dx: f64, dy: f64, copy: bool) -> Result<Option<Status>> {
        let ids = self.selection.selected().to_vec();
        if ids.is_empty() {
            return Err(EditError::NothingSelectedTo(if copy { "copy" } else { "move" }));
        }
        for id in ids {
            let Some(key) = self.bucket_of(id) else {
                continue;
            };
            let bucket = self.bucket_mut(key);
            let moved = match bucket.get(id) {
                Some(shape) => shape.geometry.translated(dx, dy),
                None => continue,
            };
            if !copy {
                bucket.remove(id);
            }
            bucket.insert(Shape::new(moved));
        }
        if !copy {
            self.selection.clear();
        }
        self.modified = true;
        Ok(Some(Status::success(if copy {
            "Done. Drill(s) copied."
        } else {
            "Done. Drill(s) Move completed."
        })))
    }

    fn add_markers(&mut self, diameter: f64, markers: Vec<Geometry>) -> Result<Option<Status>> {
        let key = self.key(diameter)?;
        let bucket = self.bucket_mut(key);
        for geometry in markers.into_iter().filter(|g| !g.is_empty()) {
            bucket.insert(Shape::new(geometry));
        }
        self.modified = true;
        Ok(None)
    }
}

/// Scale a marker about its own center
fn resize_marker(geometry: &Geometry, diameter: f64, factor: f64) -> Geometry {
    match marker_point(geometry, diameter) {
        Some(center) => geometry.transformed(&Affine::scale(factor, factor, center)),
        None => geometry.clone(),
    }
}

impl PointSource for DrillState {
    fn nearest_point(&self, p: Point) -> Option<Point> {
        self.buckets
            .values()
            .filter_map(|store| store.nearest(p).ok())
            .map(|(point, _)| point)
            .min_by(|a, b| p.distance_to(a).total_cmp(&p.distance_to(b)))
    }
}

impl EditorView for DrillState {
    fn config(&self) -> &EditorConfig {
        &self.config
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    fn selected_geometry(&self) -> Vec<(ShapeId, &Geometry)> {
        self.selection
            .selected()
            .iter()
            .filter_map(|id| {
                self.buckets
                    .values()
                    .find_map(|store| store.get(*id))
                    .map(|shape| (*id, &shape.geometry))
            })
            .collect()
    }

    fn candidates_at(&self, point: Point) -> Vec<ShapeId> {
        let tolerance = self.config.drawing.selection_tolerance;
        let mut hits: Vec<(f64, ShapeId)> = self
            .buckets
            .values()
            .flat_map(|store| {
                store
                    .candidates_at(point, tolerance)
                    .into_iter()
                    .filter_map(move |id| store.get(id))
                    .map(move |shape| (shape.geometry.distance_to_point(&point), shape.id))
            })
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        hits.into_iter().map(|(_, id)| id).collect()
    }

    fn nearest_shape(&self, point: Point) -> Option<(ShapeId, &Geometry)> {
        self.buckets
            .values()
            .filter_map(|store| store.nearest(point).ok())
            .min_by(|a, b| point.distance_to(&a.0).total_cmp(&point.distance_to(&b.0)))
            .map(|(_, shape)| (shape.id, &shape.geometry))
    }

    fn units(&self) -> Units {
        self.units
    }

    fn active_diameter(&self) -> Option<f64> {
        self.active.map(|key| key.value())
    }
}

impl SessionState for DrillState {
    const FINISH_TASK: &'static str = "excellon_edit_finished";
    const FINISHED_MESSAGE: &'static str = "Excellon editing finished.";

    fn snap(&self, x: f64, y: f64) -> Point {
        self.snap.snap(x, y, self)
    }

    fn drawable(&self) -> Vec<(&Geometry, bool)> {
        self.buckets
            .values()
            .flat_map(|store| store.all_objects())
            .map(|shape| (&shape.geometry, self.selection.contains(shape.id)))
            .collect()
    }

    fn apply(&mut self, output: ToolOutput) -> Result<Option<Status>> {
        match output {
            ToolOutput::Drills { diameter, markers } => self.add_markers(diameter, markers),
            ToolOutput::ResizeDrills { diameter } => self.resize_selected(diameter),
            ToolOutput::Translate { dx, dy, copy } => self.translate_selected(dx, dy, copy),
            ToolOutput::Select { candidates, toggle } => {
                match self.selection.select_candidate(&candidates, toggle) {
                    Some(id) => self.active = self.bucket_of(id).or(self.active),
                    None if !toggle => self.selection.clear(),
                    None => {}
                }
                Ok(None)
            }
            ToolOutput::ClearSelection => {
                self.selection.clear();
                Ok(None)
            }
            ToolOutput::Abort(err) => Err(err),
            other => {
                tracing::warn!(?other, "output ignored by the drill editor");
                Ok(None)
            }
        }
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    fn parameters_mut(&mut self) -> &mut ToolParameters {
        &mut self.parameters
    }
}

impl Session<DrillState> {
    pub fn new(config: EditorConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            notifier,
            renderer,
            tasks,
            ..
        } = collaborators;
        Self::with_state(
            DrillState::new(config),
            ToolRegistry::drill(),
            notifier,
            renderer,
            tasks,
        )
    }

    pub fn load(&mut self, object: &DrillObject) {
        self.state_mut().load(object);
        self.select_tool(ToolKind::Select);
        self.replot();
    }

    /// Hand the edited drills back to the host as a background job
    pub fn finalize(&mut self) -> Option<JobId> {
        let object = self.state().to_object();
        match serde_json::to_value(&object) {
            Ok(params) => self.submit_finish(params),
            Err(err) => {
                self.report(&EditError::Task(err.to_string()));
                None
            }
        }
    }

    pub fn add_tool(&mut self, diameter: f64) {
        self.run(|state| state.add_tool(diameter));
    }

    pub fn delete_tools(&mut self, keys: &[DiameterKey]) {
        match self.state_mut().delete_tools(keys) {
            Ok(messages) => {
                for status in &messages {
                    self.notify(status);
                }
            }
            Err(err) => self.report(&err),
        }
        self.replot();
    }

    pub fn edit_tool_diameter(&mut self, old: DiameterKey, diameter: f64) {
        self.run(|state| state.edit_tool_diameter(old, diameter));
    }

    pub fn select_tool_row(&mut self, key: DiameterKey) {
        self.run(|state| state.select_tool_row(key));
    }

    pub fn delete_selected(&mut self) {
        self.run(DrillState::delete_selected);
    }

    pub fn on_key(&mut self, key: Key) {
        if self.offer_key(&key) {
            return;
        }
        match key {
            Key::Enter => self.finish_tool(),
            Key::Escape => self.cancel(),
            Key::Delete => self.delete_selected(),
            Key::Char(c) => match c.to_ascii_lowercase() {
                'a' => self.start(ToolKind::AddDrillArray),
                'c' => self.start_transform(ToolKind::Copy, "copy"),
                'd' => self.start(ToolKind::AddDrill),
                'g' => self.run(|state| {
                    let on = state.snap.toggle_grid();
                    Ok(Some(Status::info(format!("Grid snap: {}", on_off(on)))))
                }),
                'k' => self.run(|state| {
                    let on = state.snap.toggle_corner();
                    Ok(Some(Status::info(format!("Corner snap: {}", on_off(on)))))
                }),
                'm' => self.start_transform(ToolKind::Move, "move"),
                'r' => self.start(ToolKind::ResizeDrill),
                's' => self.start(ToolKind::Select),
                other => tracing::debug!(key = %other, "unbound key"),
            },
            Key::Space | Key::Backspace => {}
        }
    }

    fn start(&mut self, kind: ToolKind) {
        self.select_tool(kind);
        self.replot();
    }

    fn start_transform(&mut self, kind: ToolKind, action: &'static str) {
        if self.state().selection.is_empty() {
            self.report(&EditError::NothingSelectedTo(action));
            return;
        }
        self.start_at_cursor(kind);
        self.notify(&Status::info("Click on target point."));
    }
}

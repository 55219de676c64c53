//! Geometry editor session
//!
//! Edits outlines and lines held in a single [`ShapeStore`]. Boolean,
//! buffer and paint operations work on the current selection.

use std::sync::Arc;

use crate::config::EditorConfig;
use crate::error::{EditError, Result};
use crate::fonts::FontProvider;
use crate::geometry::{boolean, buffer, paint, Geometry, Point};
use crate::selection_manager::SelectionManager;
use crate::shape_store::{Shape, ShapeId, ShapeStore};
use crate::snap::SnapEngine;
use crate::spatial_index::Bounds;
use crate::tools::{
    BufferKind, BufferParams, EditorView, Key, Modifiers, Status, ToolKind, ToolOutput,
    ToolParameters, ToolRegistry,
};

use super::host::{split_rings, GeometryObject};
use super::{Collaborators, Session, SessionState};
use crate::geometry::paint::PaintParams;

pub type GeometryEditor = Session<GeometryState>;

/// Shapes, selection and options of the geometry editor
pub struct GeometryState {
    name: String,
    store: ShapeStore,
    selection: SelectionManager,
    snap: SnapEngine,
    config: EditorConfig,
    parameters: ToolParameters,
    modifiers: Modifiers,
    fonts: Arc<dyn FontProvider>,
}

impl GeometryState {
    pub fn new(config: EditorConfig, fonts: Arc<dyn FontProvider>) -> Self {
        Self {
            name: String::new(),
            store: ShapeStore::with_tolerance(config.drawing.index_tolerance),
            selection: SelectionManager::new(),
            snap: SnapEngine::new(config.snap.clone()),
            config,
            parameters: ToolParameters::default(),
            modifiers: Modifiers::default(),
            fonts,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &ShapeStore {
        &self.store
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn snap_engine(&self) -> &SnapEngine {
        &self.snap
    }

    /// Commit a geometry; empty geometry is skipped
    pub fn insert(&mut self, geometry: Geometry) -> Option<ShapeId> {
        if geometry.is_empty() {
            tracing::debug!("skipping empty geometry");
            return None;
        }
        Some(self.store.insert(Shape::new(geometry)))
    }

    /// Replace the editor contents with the host object, one shape per ring
    pub fn load(&mut self, object: &GeometryObject) {
        self.store.drain();
        self.selection.clear();
        self.name = object.name.clone();
        for geometry in object.geometry.iter().flat_map(split_rings) {
            self.insert(geometry);
        }
        tracing::info!(name = %self.name, shapes = self.store.len(), "geometry loaded");
    }

    /// Everything in the store as a host object
    pub fn to_object(&self) -> GeometryObject {
        GeometryObject {
            name: self.name.clone(),
            geometry: self
                .store
                .all_objects()
                .map(|shape| shape.geometry.clone())
                .collect(),
        }
    }

    fn selected_ids(&self) -> Vec<ShapeId> {
        self.selection.selected().to_vec()
    }

    fn selected_geometries(&self) -> Vec<Geometry> {
        self.selection
            .selected()
            .iter()
            .filter_map(|id| self.store.get(*id))
            .map(|shape| shape.geometry.clone())
            .collect()
    }

    fn remove_all(&mut self, ids: &[ShapeId]) {
        for id in ids {
            self.store.remove(*id);
        }
        self.selection.retain_existing(&self.store);
    }

    pub fn delete_selected(&mut self) -> Result<Option<Status>> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Err(EditError::NothingSelectedTo("delete"));
        }
        self.remove_all(&ids);
        self.selection.clear();
        tracing::debug!(count = ids.len(), "shapes deleted");
        Ok(None)
    }

    /// Merge the selection into one shape
    pub fn union(&mut self) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        if geoms.is_empty() {
            return Err(EditError::NothingSelectedFor("union"));
        }
        let result = boolean::union(&geoms)?;
        self.replace_selection("union", result)
    }

    /// Common area of the selection
    pub fn intersection(&mut self) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        if geoms.is_empty() {
            return Err(EditError::NothingSelectedFor("intersection"));
        }
        let result = boolean::intersection(&geoms)?;
        self.replace_selection("intersection", result)
    }

    fn replace_selection(&mut self, op: &'static str, result: Geometry) -> Result<Option<Status>> {
        if result.is_empty() {
            return Err(EditError::EmptyResult(op));
        }
        let ids = self.selected_ids();
        self.remove_all(&ids);
        self.insert(result);
        self.selection.clear();
        tracing::info!(op, inputs = ids.len(), "boolean committed");
        Ok(None)
    }

    /// First selected shape minus the others. The cutting shapes stay.
    pub fn subtract(&mut self) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        let Some((target, tools)) = geoms.split_first() else {
            return Err(EditError::NothingSelectedFor("subtraction"));
        };
        if tools.is_empty() {
            return Err(EditError::NothingSelectedFor("subtraction"));
        }
        let cutter = boolean::union(tools)?;
        let result = boolean::difference(target, &cutter)?;
        if result.is_empty() {
            return Err(EditError::EmptyResult("subtraction"));
        }
        self.replace_target(vec![result]);
        Ok(None)
    }

    /// Cut the linework of the first selected shape with the others
    pub fn cut_path(&mut self) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        let Some((target, tools)) = geoms.split_first() else {
            return Err(EditError::CutPathSelection);
        };
        if tools.is_empty() {
            return Err(EditError::CutPathSelection);
        }
        let pieces = boolean::cut_path(target, tools)?;
        if pieces.is_empty() {
            return Err(EditError::EmptyResult("cut path"));
        }
        self.replace_target(pieces);
        Ok(None)
    }

    fn replace_target(&mut self, pieces: Vec<Geometry>) {
        if let Some(&target) = self.selection.selected().first() {
            self.store.remove(target);
        }
        for piece in pieces {
            self.insert(piece);
        }
        self.selection.clear();
    }

    /// Offset the selection and replace it with the result
    pub fn buffer(&mut self, params: BufferParams) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        if geoms.is_empty() {
            return Err(EditError::NothingSelectedFor("buffering"));
        }
        if !params.distance.is_finite() {
            return Err(EditError::InvalidParameter {
                name: "buffer distance",
                reason: "the value is not a number".to_string(),
            });
        }
        if params.distance < 0.0 {
            return Err(EditError::NegativeBuffer);
        }
        let steps = self.config.drawing.circle_steps;
        let signed = match params.kind {
            BufferKind::Interior => -params.distance,
            BufferKind::Full | BufferKind::Exterior => params.distance,
        };
        let result = buffer::buffer(&geoms, signed, params.join, steps)?;
        if result.is_empty() {
            return Err(EditError::EmptyBuffer(match params.kind {
                BufferKind::Interior => "smaller",
                BufferKind::Full | BufferKind::Exterior => "different",
            }));
        }
        let shapes = match params.kind {
            BufferKind::Full => vec![result],
            BufferKind::Interior | BufferKind::Exterior => result.exteriors(),
        };
        let ids = self.selected_ids();
        self.remove_all(&ids);
        for shape in shapes {
            self.insert(shape);
        }
        self.selection.clear();
        tracing::info!(kind = %params.kind, distance = params.distance, join = %params.join, "buffer committed");
        Ok(Some(Status::success(format!(
            "{} buffer geometry created.",
            params.kind
        ))))
    }

    /// Fill every selected region with tool passes; the regions stay
    pub fn paint(&mut self, params: &PaintParams) -> Result<Option<Status>> {
        let geoms = self.selected_geometries();
        if geoms.is_empty() {
            return Err(EditError::NothingSelectedFor("painting"));
        }
        params.validate()?;
        let steps = self.config.drawing.circle_steps;
        let mut results = Vec::new();
        for geometry in &geoms {
            let painted = paint::paint(geometry, params, steps).map_err(|err| {
                tracing::warn!(error = %err, method = %params.method, "paint failed");
                EditError::PaintFailed
            })?;
            results.extend(painted);
        }
        if results.is_empty() {
            return Err(EditError::PaintFailed);
        }
        let count = results.len();
        for geometry in results {
            self.insert(geometry);
        }
        tracing::info!(regions = geoms.len(), results = count, "paint committed");
        Ok(Some(Status::success("Paint done.")))
    }

    /// Select by drag rectangle.
    ///
    /// Dragging left to right selects shapes entirely inside the box; right
    /// to left selects anything the box touches.
    pub fn select_area(&mut self, start: Point, end: Point) {
        let area = Bounds::new(
            start.x.min(end.x),
            start.y.min(end.y),
            start.x.max(end.x),
            start.y.max(end.y),
        );
        let enclosing = end.x >= start.x;
        let hits: Vec<ShapeId> = self
            .store
            .all_objects()
            .filter(|shape| {
                shape.geometry.bounds().is_some_and(|b| {
                    if enclosing {
                        area.contains_point(b.min_x, b.min_y) && area.contains_point(b.max_x, b.max_y)
                    } else {
                        area.intersects(&b)
                    }
                })
            })
            .map(|shape| shape.id)
            .collect();
        if self.config.drawing.multi_select.is_held(self.modifiers) {
            for id in hits {
                self.selection.set_selected(id);
            }
        } else {
            self.selection.replace(hits);
        }
    }

    fn translate_selection(&mut self, dx: f64, dy: f64, copy: bool) -> Result<Option<Status>> {
        let ids = self.selected_ids();
        if ids.is_empty() {
            return Err(EditError::NothingToMove);
        }
        let moved: Vec<Geometry> = self
            .selected_geometries()
            .iter()
            .map(|g| g.translated(dx, dy))
            .collect();
        if !copy {
            self.remove_all(&ids);
            self.selection.clear();
        }
        for geometry in moved {
            self.insert(geometry);
        }
        Ok(None)
    }
}

impl EditorView for GeometryState {
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
            .filter_map(|id| self.store.get(*id).map(|shape| (*id, &shape.geometry)))
            .collect()
    }

    fn candidates_at(&self, point: Point) -> Vec<ShapeId> {
        self.store
            .candidates_at(point, self.config.drawing.selection_tolerance)
    }

    fn nearest_shape(&self, point: Point) -> Option<(ShapeId, &Geometry)> {
        self.store
            .nearest(point)
            .ok()
            .map(|(_, shape)| (shape.id, &shape.geometry))
    }

    fn font_provider(&self) -> Option<&dyn FontProvider> {
        Some(self.fonts.as_ref())
    }
}

impl SessionState for GeometryState {
    const FINISH_TASK: &'static str = "geometry_edit_finished";
    const FINISHED_MESSAGE: &'static str = "Geometry editing finished.";

    fn snap(&self, x: f64, y: f64) -> Point {
        self.snap.snap(x, y, &self.store)
    }

    fn drawable(&self) -> Vec<(&Geometry, bool)> {
        self.store
            .all_objects()
            .map(|shape| (&shape.geometry, self.selection.contains(shape.id)))
            .collect()
    }

    fn apply(&mut self, output: ToolOutput) -> Result<Option<Status>> {
        match output {
            ToolOutput::Shapes(geoms) => {
                for geometry in geoms {
                    self.insert(geometry);
                }
                Ok(None)
            }
            ToolOutput::Replace { remove, add } => {
                self.remove_all(&remove);
                for geometry in add {
                    self.insert(geometry);
                }
                Ok(None)
            }
            ToolOutput::Translate { dx, dy, copy } => self.translate_selection(dx, dy, copy),
            ToolOutput::Select { candidates, toggle } => {
                if self.selection.select_candidate(&candidates, toggle).is_none() && !toggle {
                    self.selection.clear();
                }
                Ok(None)
            }
            ToolOutput::ClearSelection => {
                self.selection.clear();
                Ok(None)
            }
            ToolOutput::Buffer(params) => self.buffer(params),
            ToolOutput::Paint(params) => self.paint(&params),
            ToolOutput::Abort(err) => Err(err),
            other @ (ToolOutput::Drills { .. } | ToolOutput::ResizeDrills { .. }) => {
                tracing::warn!(?other, "drill output ignored by the geometry editor");
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

impl Session<GeometryState> {
    pub fn new(config: EditorConfig, collaborators: Collaborators) -> Self {
        let Collaborators {
            notifier,
            renderer,
            tasks,
            fonts,
        } = collaborators;
        Self::with_state(
            GeometryState::new(config, fonts),
            ToolRegistry::geometry(),
            notifier,
            renderer,
            tasks,
        )
    }

    pub fn load(&mut self, object: &GeometryObject) {
        self.state_mut().load(object);
        self.select_tool(ToolKind::Select);
        self.replot();
    }

    /// Hand the edited geometry back to the host as a background job
    pub fn finalize(&mut self) -> Option<camkit_core::JobId> {
        let object = self.state().to_object();
        match serde_json::to_value(&object) {
            Ok(params) => self.submit_finish(params),
            Err(err) => {
                self.report(&EditError::Task(err.to_string()));
                None
            }
        }
    }

    pub fn union(&mut self) {
        self.run(GeometryState::union);
    }

    pub fn intersection(&mut self) {
        self.run(GeometryState::intersection);
    }

    pub fn subtract(&mut self) {
        self.run(GeometryState::subtract);
    }

    pub fn cut_path(&mut self) {
        self.run(GeometryState::cut_path);
    }

    pub fn buffer(&mut self, params: BufferParams) {
        self.run(|state| state.buffer(params));
    }

    pub fn paint(&mut self, params: PaintParams) {
        self.run(|state| state.paint(&params));
    }

    pub fn delete_selected(&mut self) {
        self.run(GeometryState::delete_selected);
    }

    pub fn select_area(&mut self, start: Point, end: Point) {
        self.run(|state| {
            state.select_area(start, end);
            Ok(None)
        });
    }

    pub fn on_key(&mut self, key: Key) {
        if self.offer_key(&key) {
            return;
        }
        match key {
            Key::Enter => self.finish_tool(),
            Key::Escape => self.cancel(),
            Key::Delete => self.delete_selected(),
            Key::Space => self.start_at_cursor(ToolKind::Rotate),
            Key::Backspace => {}
            Key::Char(c) => match c.to_ascii_lowercase() {
                'a' => self.start(ToolKind::Arc),
                'b' => self.start(ToolKind::Buffer),
                'c' => {
                    self.start_at_cursor(ToolKind::Copy);
                    self.notify(&Status::info("Click on target point."));
                }
                'g' => self.run(|state| {
                    let on = state.snap.toggle_grid();
                    Ok(Some(Status::info(format!("Grid snap: {}", on_off(on)))))
                }),
                'i' => self.start(ToolKind::Paint),
                'k' => self.run(|state| {
                    let on = state.snap.toggle_corner();
                    Ok(Some(Status::info(format!("Corner snap: {}", on_off(on)))))
                }),
                'm' => self.start_at_cursor(ToolKind::Move),
                'n' => self.start(ToolKind::Polygon),
                'o' => self.start(ToolKind::Circle),
                'p' => self.start(ToolKind::Path),
                'r' => self.start(ToolKind::Rectangle),
                's' => self.start(ToolKind::Select),
                't' => self.start(ToolKind::Text),
                'x' => self.cut_path(),
                other => tracing::debug!(key = %other, "unbound key"),
            },
        }
    }

    fn start(&mut self, kind: ToolKind) {
        self.select_tool(kind);
        self.replot();
    }
}

pub(crate) fn on_off(on: bool) -> &'static str {
    if on {
        "ON"
    } else {
        "OFF"
    }
}

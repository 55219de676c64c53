//! Minimal [`EditorView`] for tool unit tests

use crate::config::EditorConfig;
use crate::fonts::FontProvider;
use crate::geometry::{Geometry, Point};
use crate::selection_manager::SelectionManager;
use crate::shape_store::{Shape, ShapeId, ShapeStore};

use super::{EditorView, Modifiers, Tool, ToolOutput, ToolParameters};

#[derive(Default)]
pub(crate) struct TestView {
    pub config: EditorConfig,
    pub parameters: ToolParameters,
    pub modifiers: Modifiers,
    pub store: ShapeStore,
    pub selection: SelectionManager,
    pub diameter: Option<f64>,
    pub fonts: Option<Box<dyn FontProvider>>,
}

impl TestView {
    pub fn add(&mut self, geometry: Geometry, selected: bool) -> ShapeId {
        let id = self.store.insert(Shape::new(geometry));
        if selected {
            self.selection.set_selected(id);
        }
        id
    }
}

impl EditorView for TestView {
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
            .filter_map(|id| self.store.get(*id).map(|s| (*id, &s.geometry)))
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
            .map(|(_, s)| (s.id, &s.geometry))
    }

    fn active_diameter(&self) -> Option<f64> {
        self.diameter
    }

    fn font_provider(&self) -> Option<&dyn FontProvider> {
        self.fonts.as_deref()
    }
}

/// Click every point in turn and return the tool's output
pub(crate) fn click_all(tool: &mut dyn Tool, view: &TestView, points: &[(f64, f64)]) -> Option<ToolOutput> {
    for (x, y) in points {
        tool.click(view, Point::new(*x, *y));
    }
    tool.take_output()
}

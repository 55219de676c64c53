use serde::{Deserialize, Serialize};

use super::{EditorView, Status, Tool, ToolKind, ToolOutput};
use crate::error::{EditError, Result};
use crate::fonts::FontStyle;
use crate::geometry::{Geometry, Point};

/// Text entered in the text tool panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextParams {
    pub text: String,
    pub font: String,
    /// Size in points
    pub size: f64,
    pub style: FontStyle,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: "Sans".to_string(),
            size: 12.0,
            style: FontStyle::Regular,
        }
    }
}

/// Places a text outline at the clicked point.
///
/// The outline is built once when the tool starts; a font failure aborts the
/// tool before it becomes active.
#[derive(Debug)]
pub struct TextTool {
    outline: Geometry,
    output: Option<ToolOutput>,
    complete: bool,
}

impl TextTool {
    pub fn new(view: &dyn EditorView) -> Result<Self> {
        let params = &view.parameters().text;
        if params.text.trim().is_empty() {
            return Err(EditError::InvalidParameter {
                name: "text",
                reason: "nothing to write".to_string(),
            });
        }
        let fonts = view
            .font_provider()
            .ok_or_else(|| EditError::FontNotSupported("no font source available".to_string()))?;
        let outline = fonts
            .outline_for(
                &params.text,
                &params.font,
                params.size,
                params.style,
                view.config().units,
            )
            .map_err(|e| {
                tracing::debug!(error = %e, "font geometry is empty or incorrect");
                EditError::FontNotSupported(e.to_string())
            })?;
        Ok(Self {
            outline,
            output: None,
            complete: false,
        })
    }
}

impl Tool for TextTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Text
    }

    fn start_message(&self) -> &str {
        "Click on the Destination point..."
    }

    fn click(&mut self, _view: &dyn EditorView, point: Point) -> Option<Status> {
        let placed = self.outline.translated(point.x, point.y);
        self.output = Some(ToolOutput::Shapes(vec![placed]));
        self.complete = true;
        Some(Status::info("Done."))
    }

    fn preview(&self, _view: &dyn EditorView, cursor: Point) -> Vec<Geometry> {
        vec![self.outline.translated(cursor.x, cursor.y)]
    }

    fn is_complete(&self) -> bool {
        self.complete
    }

    fn take_output(&mut self) -> Option<ToolOutput> {
        self.output.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{FontError, FontProvider};
    use crate::tools::testing::TestView;
    use camkit_core::Units;

    struct Block;

    impl FontProvider for Block {
        fn outline_for(
            &self,
            text: &str,
            font: &str,
            _size: f64,
            _style: FontStyle,
            _units: Units,
        ) -> std::result::Result<Geometry, FontError> {
            if font != "Sans" {
                return Err(FontError::NotFound {
                    family: font.to_string(),
                    style: FontStyle::Regular,
                });
            }
            let width = text.len() as f64;
            Ok(Geometry::LinearRing(vec![
                Point::new(0.0, 0.0),
                Point::new(width, 0.0),
                Point::new(width, 1.0),
            ]))
        }
    }

    fn view(text: &str, font: &str) -> TestView {
        let mut view = TestView {
            fonts: Some(Box::new(Block)),
            ..Default::default()
        };
        view.parameters.text.text = text.to_string();
        view.parameters.text.font = font.to_string();
        view
    }

    #[test]
    fn test_outline_placed_at_click() {
        let view = view("ab", "Sans");
        let mut tool = TextTool::new(&view).unwrap();
        tool.click(&view, Point::new(10.0, 5.0));
        let Some(ToolOutput::Shapes(shapes)) = tool.take_output() else {
            panic!("expected text outline");
        };
        assert_eq!(shapes[0].points()[1], Point::new(12.0, 5.0));
    }

    #[test]
    fn test_font_failure_is_reported() {
        let view = view("ab", "Comic");
        let err = TextTool::new(&view).unwrap_err();
        assert!(matches!(err, EditError::FontNotSupported(_)));
        assert!(err
            .to_string()
            .starts_with("Font not supported. Only Regular, Bold, Italic and BoldItalic are supported."));
    }

    #[test]
    fn test_empty_text_rejected() {
        let view = view("  ", "Sans");
        assert!(matches!(
            TextTool::new(&view),
            Err(EditError::InvalidParameter { name: "text", .. })
        ));
    }
}

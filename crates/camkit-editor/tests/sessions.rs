#[path = "sessions/common.rs"]
mod common;
#[path = "sessions/drill_editor.rs"]
mod drill_editor;
#[path = "sessions/geometry_editor.rs"]
mod geometry_editor;

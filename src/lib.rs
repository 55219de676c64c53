//! # CamKit
//!
//! Interactive editing engine for 2D CAM geometry and drill objects.
//!
//! ## Architecture
//!
//! CamKit is organized as a workspace with multiple crates:
//!
//! 1. **camkit-core** - Messages, background tasks, units, shared errors
//! 2. **camkit-editor** - Shape storage, snapping, geometry operations, tools and sessions
//! 3. **camkit** - Command line front end that replays scripted sessions
//!
//! ## Features
//!
//! - **Geometry Editor**: circles, arcs, rectangles, polygons, paths and text
//! - **Geometry Operations**: union, intersection, subtraction, path cutting, buffer and paint
//! - **Drill Editor**: single drills, linear and circular arrays, resize and a tool table
//! - **Snapping**: grid and nearest-corner snapping with spatial lookups

pub mod replay;

pub use camkit_core::{
    ChannelTaskQueue, DiameterKey, Error, JobId, Message, MessageLevel, MessageLog, Notifier,
    Result, TaskEvent, TaskOutcome, TaskQueue, Units,
};

pub use camkit_editor::{
    Collaborators, DrillEditor, DrillObject, DrillPoint, EditError, EditorConfig, Geometry,
    GeometryEditor, GeometryObject, Key, Point, Polygon, Session, ToolKind,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Console output on stderr, pretty or JSON
/// - RUST_LOG environment variable support
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_line_number(true)
                    .pretty(),
            )
            .try_init()?;
    }
    Ok(())
}

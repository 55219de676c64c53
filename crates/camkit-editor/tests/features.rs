#[path = "features/arc.rs"]
mod arc;
#[path = "features/boolean.rs"]
mod boolean;
#[path = "features/buffer.rs"]
mod buffer;
#[path = "features/config.rs"]
mod config;
#[path = "features/paint.rs"]
mod paint;

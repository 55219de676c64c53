//! # CamKit Core
//!
//! Shared leaf types for the CamKit editing engine:
//! - Error types and the crate-wide `Result` alias
//! - Leveled user messages and the `Notifier` collaborator
//! - Background task submission and completion events
//! - Measurement units and diameter rounding

pub mod error;
pub mod message;
pub mod tasks;
pub mod units;

pub use error::{Error, Result};
pub use message::{Message, MessageLevel, MessageLog, Notifier};
pub use tasks::{
    spawn_worker, ChannelTaskQueue, JobId, TaskEvent, TaskOutcome, TaskQueue, TaskRequest,
};
pub use units::{DiameterKey, Units};

//! Screenshot records and their persistence
//!
//! - Id generation and validation (id.rs)
//! - The record itself and the store/persist seams (model.rs)
//! - JSON files on the local filesystem (local.rs)
//! - The background save queue (saver.rs)

pub mod id;
pub mod local;
pub mod model;
pub mod saver;

pub use local::LocalStore;
pub use model::{Persist, STATUS_PUBLIC, Screenshot, ScreenshotStore};
pub use saver::{SaveQueue, spawn_saver};

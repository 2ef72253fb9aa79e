//! Editor session management module
//!
//! This module contains:
//! - Event and outcome types for editor input
//! - The pointer-capture guard held by a live gesture
//! - EditorSession, the gesture state machine over one collection
//! - Tool shortcuts

pub mod capture;
pub mod messages;
pub mod shortcuts;
pub mod state;

pub use messages::{EditorEvent, GestureOutcome, Key, PointerButton};
pub use state::{EditorSession, TextOverlay};

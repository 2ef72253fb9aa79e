//! Event types for an editor session
//!
//! This module contains:
//! - EditorEvent, the raw input routed from the host
//! - GestureOutcome, what the session did with it

use crate::annotations::AnnotationId;
use crate::domain::{AnnotationKind, Point};

// ============================================================================
// Input
// ============================================================================

/// Pointer button of a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Keys the editor reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    /// A printable character
    Char(char),
}

/// Input routed from the host to the session
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    PointerDown {
        position: Point,
        button: PointerButton,
    },
    /// Pointer moved; `snap` is whether the snap modifier is held
    PointerMove { position: Point, snap: bool },
    PointerUp { position: Point },
    Key(Key),
    /// The text overlay lost keyboard focus
    FocusLost,
}

impl EditorEvent {
    pub fn press(x: f64, y: f64) -> Self {
        EditorEvent::PointerDown {
            position: Point::new(x, y),
            button: PointerButton::Primary,
        }
    }

    pub fn drag(x: f64, y: f64, snap: bool) -> Self {
        EditorEvent::PointerMove {
            position: Point::new(x, y),
            snap,
        }
    }

    pub fn release(x: f64, y: f64) -> Self {
        EditorEvent::PointerUp {
            position: Point::new(x, y),
        }
    }
}

// ============================================================================
// Output
// ============================================================================

/// Result of handling one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing changed
    Ignored,
    /// A gesture began with the given tool
    Started(AnnotationKind),
    /// The live gesture changed; the preview was redrawn
    Updated,
    /// The gesture ended and its annotation joined the collection
    Committed(AnnotationId),
    /// The gesture ended without a meaningful result
    Discarded,
    /// A different tool was selected
    ToolSelected(AnnotationKind),
}

//! Editor session: one screenshot being annotated
//!
//! The session routes host input through the gesture state machine:
//!
//! ```text
//! Idle --press--> Dragging --move--> Dragging --release--> Idle (commit or discard)
//! Idle --press (Text tool)--> Typing --key--> Typing --Enter/Escape/focus lost--> Idle
//! ```

use crate::annotations::{AnnotationCollection, AnnotationId};
use crate::domain::{Annotation, AnnotationKind, Point};
use crate::render::Surface;
use crate::session::capture::{CaptureSlot, PointerCapture};
use crate::session::messages::{EditorEvent, GestureOutcome, Key, PointerButton};
use crate::session::shortcuts::tool_for_key;

/// Editable text box shown while a text annotation is typed
#[derive(Debug, Clone, PartialEq)]
pub struct TextOverlay {
    pub position: Point,
    pub font_size: f64,
    pub content: String,
}

/// The live gesture, if any
enum Gesture {
    Drag {
        annotation: Annotation,
        _capture: PointerCapture,
    },
    Text {
        annotation: Annotation,
        overlay: TextOverlay,
    },
}

pub struct EditorSession<S: Surface> {
    collection: AnnotationCollection<S>,
    tool: AnnotationKind,
    editable: bool,
    gesture: Option<Gesture>,
    capture: CaptureSlot,
}

impl<S: Surface> EditorSession<S> {
    /// Open `collection` for `viewer`; only the screenshot owner may edit
    pub fn new(collection: AnnotationCollection<S>, viewer: &str) -> Self {
        let editable = collection.screenshot().is_editable_by(viewer);
        if !editable {
            log::info!(
                "Screenshot {} is read-only for this viewer",
                collection.screenshot().image_id
            );
        }
        Self {
            collection,
            tool: AnnotationKind::Line,
            editable,
            gesture: None,
            capture: CaptureSlot::default(),
        }
    }

    /// Share pointer capture with other sessions on the same pointer
    pub fn with_capture_slot(mut self, slot: CaptureSlot) -> Self {
        self.capture = slot;
        self
    }

    pub fn capture_slot(&self) -> &CaptureSlot {
        &self.capture
    }

    pub fn tool(&self) -> AnnotationKind {
        self.tool
    }

    /// Select the tool used by the next gesture
    pub fn set_tool(&mut self, tool: AnnotationKind) {
        self.tool = tool;
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn is_gesture_live(&self) -> bool {
        self.gesture.is_some()
    }

    /// The text box the host should display, while one is open
    pub fn text_overlay(&self) -> Option<&TextOverlay> {
        match &self.gesture {
            Some(Gesture::Text { overlay, .. }) => Some(overlay),
            _ => None,
        }
    }

    pub fn collection(&self) -> &AnnotationCollection<S> {
        &self.collection
    }

    pub fn into_collection(self) -> AnnotationCollection<S> {
        self.collection
    }

    /// Remove a committed annotation (the listing's delete button)
    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        if !self.editable {
            log::debug!("Ignoring removal of {id} on a read-only screenshot");
            return None;
        }
        self.collection.remove_annotation(id)
    }

    pub fn handle_event(&mut self, event: EditorEvent) -> GestureOutcome {
        match event {
            EditorEvent::PointerDown { position, button } => self.pointer_down(position, button),
            EditorEvent::PointerMove { position, snap } => self.pointer_move(position, snap),
            EditorEvent::PointerUp { .. } => self.pointer_up(),
            EditorEvent::Key(key) => self.key(key),
            EditorEvent::FocusLost => self.finish_text(),
        }
    }

    fn pointer_down(&mut self, position: Point, button: PointerButton) -> GestureOutcome {
        // Clicking away from the text box takes its focus
        if self.text_overlay().is_some() {
            return self.finish_text();
        }
        if button != PointerButton::Primary || !self.editable || !position.is_finite() {
            return GestureOutcome::Ignored;
        }
        let Some(capture) = self.capture.acquire() else {
            log::debug!("Pointer is held by another gesture, ignoring press");
            return GestureOutcome::Ignored;
        };

        let annotation = self.tool.create(self.collection.context(), position);
        let text_size = match &annotation {
            Annotation::Text(text) => Some(text.font_size),
            _ => None,
        };
        self.gesture = Some(match text_size {
            // Text is edited with the keyboard; the pointer stays free
            Some(font_size) => {
                drop(capture);
                Gesture::Text {
                    annotation,
                    overlay: TextOverlay {
                        position,
                        font_size,
                        content: String::new(),
                    },
                }
            }
            None => Gesture::Drag {
                annotation,
                _capture: capture,
            },
        });
        GestureOutcome::Started(self.tool)
    }

    fn pointer_move(&mut self, position: Point, snap: bool) -> GestureOutcome {
        let Some(Gesture::Drag { annotation, .. }) = &mut self.gesture else {
            return GestureOutcome::Ignored;
        };
        if !position.is_finite() {
            log::debug!("Ignoring pointer move to {position:?}");
            return GestureOutcome::Ignored;
        }
        annotation.drag_to(position, snap);
        self.collection.redraw_all(Some(annotation));
        GestureOutcome::Updated
    }

    fn pointer_up(&mut self) -> GestureOutcome {
        match self.gesture.take() {
            Some(Gesture::Drag { annotation, .. }) => self.commit(annotation),
            other => {
                self.gesture = other;
                GestureOutcome::Ignored
            }
        }
    }

    fn key(&mut self, key: Key) -> GestureOutcome {
        let Some(Gesture::Text { overlay, .. }) = &mut self.gesture else {
            if self.gesture.is_none()
                && let Some(tool) = tool_for_key(&key)
            {
                self.tool = tool;
                return GestureOutcome::ToolSelected(tool);
            }
            return GestureOutcome::Ignored;
        };
        match key {
            Key::Enter | Key::Escape => self.finish_text(),
            Key::Backspace => {
                overlay.content.pop();
                GestureOutcome::Updated
            }
            Key::Char(c) => {
                overlay.content.push(c);
                GestureOutcome::Updated
            }
        }
    }

    fn finish_text(&mut self) -> GestureOutcome {
        match self.gesture.take() {
            Some(Gesture::Text {
                mut annotation,
                overlay,
            }) => {
                if let Annotation::Text(text) = &mut annotation {
                    text.text = overlay.content;
                }
                self.commit(annotation)
            }
            other => {
                self.gesture = other;
                GestureOutcome::Ignored
            }
        }
    }

    fn commit(&mut self, annotation: Annotation) -> GestureOutcome {
        if annotation.is_committable() {
            GestureOutcome::Committed(self.collection.add_annotation(annotation, true))
        } else {
            log::debug!("Discarding empty {} gesture", annotation.kind());
            // drop any preview left on the surface
            self.collection.redraw_all(None);
            GestureOutcome::Discarded
        }
    }
}

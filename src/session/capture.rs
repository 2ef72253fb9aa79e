//! Pointer capture for the duration of one gesture
//!
//! A gesture holds a `PointerCapture` while it is live. Only one can exist
//! per session at a time, and dropping it (on commit, discard, or when the
//! gesture is abandoned) releases the pointer.

use std::cell::Cell;
use std::rc::Rc;

/// Shared flag recording whether a gesture owns the pointer
#[derive(Debug, Clone, Default)]
pub struct CaptureSlot {
    held: Rc<Cell<bool>>,
}

impl CaptureSlot {
    pub fn is_held(&self) -> bool {
        self.held.get()
    }

    /// Take the pointer, or `None` if another gesture has it
    pub fn acquire(&self) -> Option<PointerCapture> {
        if self.held.replace(true) {
            return None;
        }
        Some(PointerCapture {
            held: self.held.clone(),
        })
    }
}

/// Guard for a captured pointer; releases on drop
#[derive(Debug)]
pub struct PointerCapture {
    held: Rc<Cell<bool>>,
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        self.held.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_holder() {
        let slot = CaptureSlot::default();
        let guard = slot.acquire().unwrap();
        assert!(slot.is_held());
        assert!(slot.acquire().is_none());
        drop(guard);
        assert!(!slot.is_held());
        assert!(slot.acquire().is_some());
    }
}

//! Committed annotations of one screenshot
//!
//! The collection owns the drawing surface. Sequence order is z-order, and
//! every visible change is a full clear and redraw of the sequence.

use std::fmt;

use super::codec::{self, AnnotationRecord, DecodeError};
use crate::domain::{Annotation, AnnotationContext};
use crate::render::{Surface, draw_annotation};
use crate::store::{Persist, Screenshot};

/// Identity of a committed annotation within its collection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnnotationId(u64);

impl fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the annotation listing shown next to the image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingEntry {
    pub id: AnnotationId,
    pub display_name: &'static str,
}

pub struct AnnotationCollection<S: Surface> {
    surface: S,
    screenshot: Screenshot,
    persist: Box<dyn Persist>,
    context: AnnotationContext,
    annotations: Vec<(AnnotationId, Annotation)>,
    listing: Vec<ListingEntry>,
    next_id: u64,
}

impl<S: Surface> AnnotationCollection<S> {
    /// Build the collection for `screenshot`, restoring its stored annotations
    ///
    /// Restoring does not save. Any record that fails to decode fails the
    /// whole load, leaving nothing half-restored.
    pub fn new(
        surface: S,
        screenshot: Screenshot,
        persist: Box<dyn Persist>,
        context: AnnotationContext,
    ) -> Result<Self, DecodeError> {
        let restored = screenshot
            .annotations
            .iter()
            .map(|record| codec::decode(record, &context))
            .collect::<Result<Vec<_>, _>>()?;

        let mut collection = Self {
            surface,
            screenshot,
            persist,
            context,
            annotations: Vec::with_capacity(restored.len()),
            listing: Vec::with_capacity(restored.len()),
            next_id: 0,
        };
        for annotation in restored {
            collection.push(annotation);
        }
        log::debug!(
            "Restored {} annotations for screenshot {}",
            collection.annotations.len(),
            collection.screenshot.image_id
        );
        collection.redraw_all(None);
        Ok(collection)
    }

    /// Append `annotation` on top of the others
    ///
    /// New annotations update the screenshot record and are handed off for
    /// saving.
    pub fn add_annotation(&mut self, annotation: Annotation, is_new: bool) -> AnnotationId {
        let id = self.push(annotation);
        log::debug!("Added annotation {id}");
        self.redraw_all(None);
        if is_new {
            self.save();
        }
        id
    }

    /// Remove the annotation with identity `id`
    pub fn remove_annotation(&mut self, id: AnnotationId) -> Option<Annotation> {
        let index = self.annotations.iter().position(|(a, _)| *a == id)?;
        let (_, removed) = self.annotations.remove(index);
        self.listing.retain(|entry| entry.id != id);
        log::debug!("Removed annotation {id} ({})", removed.display_name());
        self.redraw_all(None);
        self.save();
        Some(removed)
    }

    /// Clear the surface and draw every annotation in order, then `preview`
    pub fn redraw_all(&mut self, preview: Option<&Annotation>) {
        self.surface.clear();
        for (_, annotation) in &self.annotations {
            draw_annotation(&mut self.surface, annotation);
        }
        if let Some(preview) = preview {
            draw_annotation(&mut self.surface, preview);
        }
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.annotations.iter().map(|(_, a)| a)
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations
            .iter()
            .find_map(|(a, annotation)| (*a == id).then_some(annotation))
    }

    /// Id of the annotation at position `index` in z-order
    pub fn id_at(&self, index: usize) -> Option<AnnotationId> {
        self.annotations.get(index).map(|(id, _)| *id)
    }

    pub fn listing(&self) -> &[ListingEntry] {
        &self.listing
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn screenshot(&self) -> &Screenshot {
        &self.screenshot
    }

    pub fn context(&self) -> &AnnotationContext {
        &self.context
    }

    /// Current annotations in wire form
    pub fn records(&self) -> Vec<AnnotationRecord> {
        codec::encode_all(self.annotations())
    }

    fn push(&mut self, annotation: Annotation) -> AnnotationId {
        let id = AnnotationId(self.next_id);
        self.next_id += 1;
        self.listing.push(ListingEntry {
            id,
            display_name: annotation.display_name(),
        });
        self.annotations.push((id, annotation));
        id
    }

    fn save(&mut self) {
        self.screenshot.annotations = self.records();
        self.persist.save(self.screenshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use image::{Rgba, RgbaImage};
    use serde_json::json;

    use super::*;
    use crate::domain::{AnnotationKind, Point};
    use crate::render::image::PixmapSurface;
    use crate::render::record::{DisplayList, DrawOp};

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<Screenshot>>>);

    impl Persist for Recorder {
        fn save(&self, screenshot: Screenshot) {
            self.0.borrow_mut().push(screenshot);
        }
    }

    fn source() -> Rc<RgbaImage> {
        Rc::new(RgbaImage::from_fn(40, 40, |x, y| {
            Rgba([(x * 6) as u8, (y * 6) as u8, 90, 255])
        }))
    }

    fn ctx() -> AnnotationContext {
        AnnotationContext::new(source())
    }

    fn dragged(kind: AnnotationKind, from: (f64, f64), to: (f64, f64)) -> Annotation {
        let mut a = kind.create(&ctx(), from.into());
        a.drag_to(to.into(), false);
        a
    }

    fn collection<S: Surface>(
        surface: S,
        screenshot: Screenshot,
    ) -> (AnnotationCollection<S>, Recorder) {
        let recorder = Recorder::default();
        let c = AnnotationCollection::new(surface, screenshot, Box::new(recorder.clone()), ctx())
            .unwrap();
        (c, recorder)
    }

    fn op_names(list: &DisplayList) -> Vec<&'static str> {
        list.ops()
            .iter()
            .map(|op| match op {
                DrawOp::Line { .. } => "line",
                DrawOp::Rect { .. } => "rect",
                DrawOp::Ellipse { .. } => "ellipse",
                DrawOp::Circle { .. } => "circle",
                DrawOp::Text { .. } => "text",
                DrawOp::Blit { .. } => "blit",
            })
            .collect()
    }

    #[test]
    fn test_draws_in_insertion_order() {
        let (mut c, _) = collection(DisplayList::new(40, 40), Screenshot::default());
        c.add_annotation(dragged(AnnotationKind::Line, (0.0, 0.0), (5.0, 5.0)), true);
        c.add_annotation(dragged(AnnotationKind::Box, (1.0, 1.0), (6.0, 6.0)), true);
        c.add_annotation(dragged(AnnotationKind::Circle, (2.0, 2.0), (8.0, 8.0)), true);

        c.redraw_all(None);
        assert_eq!(op_names(c.surface()), ["line", "rect", "ellipse"]);

        let preview = dragged(AnnotationKind::Blur, (0.0, 0.0), (4.0, 4.0));
        c.redraw_all(Some(&preview));
        assert_eq!(op_names(c.surface()), ["line", "rect", "ellipse", "blit"]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn test_new_annotations_are_saved() {
        let (mut c, recorder) = collection(DisplayList::new(40, 40), Screenshot::default());
        c.add_annotation(dragged(AnnotationKind::Arrow, (0.0, 0.0), (5.0, 5.0)), true);
        c.add_annotation(dragged(AnnotationKind::Line, (0.0, 0.0), (5.0, 5.0)), false);

        let saves = recorder.0.borrow();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].annotations.len(), 1);
        assert_eq!(saves[0].annotations[0].kind(), "Arrow");
        assert_eq!(c.screenshot().annotations.len(), 1);
    }

    #[test]
    fn test_restore_does_not_save() {
        let mut screenshot = Screenshot::default();
        screenshot.annotations = vec![
            codec::encode(&dragged(AnnotationKind::Line, (0.0, 0.0), (9.0, 0.0))),
            codec::encode(&dragged(AnnotationKind::Box, (2.0, 2.0), (9.0, 9.0))),
        ];
        let (c, recorder) = collection(DisplayList::new(40, 40), screenshot);

        assert_eq!(c.len(), 2);
        assert!(recorder.0.borrow().is_empty());
        assert_eq!(c.surface().clears(), 1);
        assert_eq!(op_names(c.surface()), ["line", "rect"]);
        let names: Vec<_> = c.listing().iter().map(|e| e.display_name).collect();
        assert_eq!(names, ["Line", "Box"]);
    }

    #[test]
    fn test_unknown_kind_restores_nothing() {
        let mut screenshot = Screenshot::default();
        screenshot.annotations = vec![
            codec::encode(&dragged(AnnotationKind::Line, (0.0, 0.0), (9.0, 0.0))),
            AnnotationRecord("Bogus".into(), serde_json::Map::new()),
        ];
        let result = AnnotationCollection::new(
            DisplayList::new(40, 40),
            screenshot,
            Box::new(Recorder::default()),
            ctx(),
        );
        assert!(matches!(result, Err(DecodeError::UnknownKind(kind)) if kind == "Bogus"));
    }

    #[test]
    fn test_remove_by_identity() {
        let (mut c, recorder) = collection(DisplayList::new(40, 40), Screenshot::default());
        let line = dragged(AnnotationKind::Line, (0.0, 0.0), (5.0, 5.0));
        let a = c.add_annotation(line.clone(), true);
        let b = c.add_annotation(line.clone(), true);
        let _ = c.add_annotation(dragged(AnnotationKind::Box, (0.0, 0.0), (5.0, 5.0)), true);

        // equal values, distinct identities
        assert_eq!(c.remove_annotation(a), Some(line));
        assert!(c.get(a).is_none());
        assert!(c.get(b).is_some());
        assert_eq!(c.id_at(0), Some(b));
        assert_eq!(c.listing().len(), 2);
        assert_eq!(op_names(c.surface()), ["line", "rect"]);

        let saves = recorder.0.borrow();
        assert_eq!(saves.len(), 4);
        assert_eq!(saves[3].annotations.len(), 2);
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let (mut c, recorder) = collection(DisplayList::new(40, 40), Screenshot::default());
        let id = c.add_annotation(dragged(AnnotationKind::Line, (0.0, 0.0), (5.0, 5.0)), true);
        c.remove_annotation(id);
        assert_eq!(c.remove_annotation(id), None);
        assert_eq!(recorder.0.borrow().len(), 2);
    }

    #[test]
    fn test_redraw_is_deterministic() {
        let surface = PixmapSurface::new(40, 40).unwrap();
        let (mut c, _) = collection(surface, Screenshot::default());
        c.add_annotation(dragged(AnnotationKind::Highlight, (0.0, 20.0), (40.0, 20.0)), true);
        c.add_annotation(dragged(AnnotationKind::Arrow, (5.0, 5.0), (30.0, 30.0)), true);
        c.add_annotation(dragged(AnnotationKind::Blur, (10.0, 10.0), (30.0, 25.0)), true);

        c.redraw_all(None);
        let first = c.surface().data().to_vec();
        c.redraw_all(None);
        assert_eq!(c.surface().data(), first.as_slice());
    }

    #[test]
    fn test_blur_leaves_source_untouched() {
        let ctx = ctx();
        let before = (*ctx.source).clone();
        let recorder = Recorder::default();
        let mut c = AnnotationCollection::new(
            PixmapSurface::new(40, 40).unwrap(),
            Screenshot::default(),
            Box::new(recorder),
            ctx.clone(),
        )
        .unwrap();
        let mut blur = AnnotationKind::Blur.create(&ctx, Point::new(0.0, 0.0));
        blur.drag_to(Point::new(40.0, 40.0), false);
        c.add_annotation(blur, true);
        c.redraw_all(None);

        assert_eq!(*c.context().source, before);
        assert_eq!(*ctx.source, before);
        // the layer holds the pixelated copy, not the source
        assert!(c.surface().data().iter().any(|b| *b != 0));
    }

    #[test]
    fn test_records_match_wire_shape() {
        let (mut c, _) = collection(DisplayList::new(40, 40), Screenshot::default());
        c.add_annotation(dragged(AnnotationKind::Box, (1.0, 2.0), (3.0, 4.0)), true);
        let json = serde_json::to_value(c.records()).unwrap();
        assert_eq!(
            json,
            json!([["Box", {"start": ["P", [1.0, 2.0]], "last": ["P", [3.0, 4.0]]}]])
        );
    }
}

//! Committed annotations and their stored form
//!
//! This module provides:
//! - The `[kind, {fields}]` codec (codec.rs)
//! - `AnnotationCollection`, the ordered, persisted set of annotations for
//!   one screenshot (collection.rs)

pub mod codec;
pub mod collection;

pub use codec::{AnnotationRecord, DecodeError, decode, encode};
pub use collection::{AnnotationCollection, AnnotationId, ListingEntry};

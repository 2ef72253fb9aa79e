//! Screenshot annotation editor core
//!
//! Annotations (text, lines, arrows, highlights, boxes, circles and blurs) are
//! drawn over a screenshot, kept in an ordered collection, and stored with the
//! screenshot's record as `[kind, {fields}]` pairs.

pub mod annotations;
pub mod capture;
pub mod config;
pub mod core;
pub mod domain;
pub mod render;
pub mod session;
pub mod store;

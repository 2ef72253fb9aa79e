//! Pure domain types with minimal dependencies
//!
//! This module contains the annotation model and the geometry it is built on.
//! Types here know nothing about storage, surfaces or input handling.

pub mod annotation;
pub mod geometry;
pub mod point;

pub use annotation::*;
pub use geometry::*;
pub use point::*;

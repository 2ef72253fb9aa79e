//! Image capture and processing module
//!
//! This module consolidates:
//! - Source bitmap decoding and PNG encoding (image.rs)
//! - Region cropping of a capture (crop.rs)

pub mod crop;
pub mod image;

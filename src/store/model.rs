//! Screenshot record
//!
//! The metadata stored for one uploaded screenshot, including its annotation
//! list in wire form. Pixel data lives elsewhere.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::id::{make_id, validate_id};
use crate::annotations::codec::AnnotationRecord;

/// Default visibility of a new screenshot
pub const STATUS_PUBLIC: &str = "PUBLIC";

/// Stored screenshot metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Screenshot {
    pub image_id: String,
    pub source_url: Option<String>,
    /// Owner; only the owner may annotate
    pub user_id: String,
    pub annotations: Vec<AnnotationRecord>,
    /// Free-form text carried along with the record
    pub metadata: String,
    pub status: String,
    /// Unix seconds
    pub created: i64,
    /// Unix seconds, refreshed on every store write
    pub updated: i64,
}

impl Default for Screenshot {
    fn default() -> Self {
        let now = now_seconds();
        Self {
            image_id: make_id(),
            source_url: None,
            user_id: String::new(),
            annotations: Vec::new(),
            metadata: String::new(),
            status: STATUS_PUBLIC.to_string(),
            created: now,
            updated: now,
        }
    }
}

impl Screenshot {
    /// Create and store a new, empty screenshot record
    pub fn create(
        store: &dyn ScreenshotStore,
        source_url: Option<String>,
        user_id: &str,
    ) -> Result<Self> {
        let mut screenshot = Self {
            source_url,
            user_id: user_id.to_string(),
            ..Default::default()
        };
        store.put(&mut screenshot)?;
        log::info!("Created screenshot {}", screenshot.image_id);
        Ok(screenshot)
    }

    /// Fetch an existing record
    pub fn get(store: &dyn ScreenshotStore, image_id: &str) -> Result<Option<Self>> {
        validate_id(image_id).with_context(|| format!("Bad image id {image_id:?}"))?;
        store.get(image_id)
    }

    /// Whether `viewer` may add or remove annotations
    pub fn is_editable_by(&self, viewer: &str) -> bool {
        self.user_id == viewer
    }
}

/// Backing store for screenshot records
pub trait ScreenshotStore {
    /// Insert or replace `screenshot`, refreshing its `updated` time
    fn put(&self, screenshot: &mut Screenshot) -> Result<()>;

    fn get(&self, image_id: &str) -> Result<Option<Screenshot>>;
}

/// Fire-and-forget persistence handed to an annotation collection
///
/// Implementations own error handling; callers never learn whether the
/// write eventually succeeded.
pub trait Persist {
    fn save(&self, screenshot: Screenshot);
}

pub(crate) fn now_seconds() -> i64 {
    chrono::Utc::now().timestamp()
}

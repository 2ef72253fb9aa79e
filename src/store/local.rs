//! Screenshot records in the local filesystem
//!
//! One pretty-printed JSON file per record. Files are sharded by id: the
//! leading half of an id is random and the trailing half a timestamp, so
//! `id[7..9]` spreads records over time and `id[0]` within it.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::id::validate_id;
use super::model::{Screenshot, ScreenshotStore, now_seconds};

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Sharded location of the record for `image_id`
    pub fn record_path(&self, image_id: &str) -> Result<PathBuf> {
        validate_id(image_id)?;
        let len = image_id.len();
        Ok(self
            .root
            .join(&image_id[len - 6..len - 4])
            .join(&image_id[..1])
            .join(format!("{image_id}.json")))
    }
}

impl ScreenshotStore for LocalStore {
    fn put(&self, screenshot: &mut Screenshot) -> Result<()> {
        let path = self.record_path(&screenshot.image_id)?;
        let dir = path
            .parent()
            .with_context(|| format!("No parent directory for {}", path.display()))?;
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;

        screenshot.updated = now_seconds();
        let json = serde_json::to_string_pretty(screenshot)?;

        // Written next to the target and renamed, so readers never see a
        // partial record
        let mut file = tempfile::Builder::new()
            .prefix(".record-")
            .suffix(".json")
            .tempfile_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        file.write_all(json.as_bytes())?;
        file.persist(&path)
            .with_context(|| format!("Failed to write record: {}", path.display()))?;

        log::debug!(
            "Stored screenshot {} ({} annotations) at {}",
            screenshot.image_id,
            screenshot.annotations.len(),
            path.display()
        );
        Ok(())
    }

    fn get(&self, image_id: &str) -> Result<Option<Screenshot>> {
        let path = self.record_path(image_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record: {}", path.display()))?;
        let screenshot = serde_json::from_str(&json)
            .with_context(|| format!("Invalid record: {}", path.display()))?;
        Ok(Some(screenshot))
    }
}

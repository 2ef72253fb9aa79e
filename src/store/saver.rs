//! Background persistence
//!
//! `SaveQueue` hands records to a saver task over an unbounded channel, so a
//! commit never waits for disk. The task writes each record through the store
//! on the blocking pool and logs failures; nothing is retried.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::model::{Persist, Screenshot, ScreenshotStore};

/// Sending half of the saver task
#[derive(Debug, Clone)]
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<Screenshot>,
}

impl Persist for SaveQueue {
    fn save(&self, screenshot: Screenshot) {
        let image_id = screenshot.image_id.clone();
        if self.tx.send(screenshot).is_err() {
            log::error!("Saver is gone, screenshot {image_id} was not persisted");
        }
    }
}

/// Start the saver task on the current runtime
///
/// The task ends once every `SaveQueue` clone is dropped and the backlog is
/// written; its result is the number of records stored successfully.
pub fn spawn_saver<S>(store: Arc<S>) -> (SaveQueue, JoinHandle<usize>)
where
    S: ScreenshotStore + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Screenshot>();
    let handle = tokio::spawn(async move {
        let mut saved = 0;
        while let Some(mut screenshot) = rx.recv().await {
            let store = store.clone();
            let result = tokio::task::spawn_blocking(move || {
                store.put(&mut screenshot).map(|()| screenshot.image_id)
            })
            .await;
            match result {
                Ok(Ok(image_id)) => {
                    log::debug!("Saved screenshot {image_id}");
                    saved += 1;
                }
                Ok(Err(err)) => log::error!("Failed to save screenshot: {err:#}"),
                Err(err) => log::error!("Saver task panicked: {err}"),
            }
        }
        saved
    });
    (SaveQueue { tx }, handle)
}

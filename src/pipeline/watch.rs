//! Live reclassification of a growing crossing record file.

use crate::error::{Error, Result};
use crate::input::parse_records_str;
use crate::spacing::{ClassificationResult, DetectionEvent, SpacingClassifier};
use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a poll that saw new content.
#[derive(Debug, Clone)]
pub struct WatchUpdate {
    /// Classification of the whole new snapshot.
    pub result: ClassificationResult,
    /// Events not present in the previous snapshot, in sequence order.
    pub new_events: Vec<DetectionEvent>,
}

/// Polls a crossing record file and reclassifies it when it changes.
pub struct Watcher {
    path: PathBuf,
    classifier: SpacingClassifier,
    poll_interval: Duration,
    last_snapshot: Option<String>,
    known: HashSet<(String, i64)>,
}

impl Watcher {
    /// Create a watcher for `path`.
    pub fn new(path: &Path, classifier: SpacingClassifier, poll_interval: Duration) -> Self {
        Self {
            path: path.to_path_buf(),
            classifier,
            poll_interval,
            last_snapshot: None,
            known: HashSet::new(),
        }
    }

    /// Watched file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file once and reclassify if its content changed.
    ///
    /// A missing file counts as no change. A snapshot that fails to parse is
    /// not retried until the content changes again.
    pub fn poll_once(&mut self) -> Result<Option<WatchUpdate>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Waiting for {}", self.path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::InputRead {
                    path: self.path.clone(),
                    source: Box::new(e),
                });
            }
        };

        if self.last_snapshot.as_deref() == Some(content.as_str()) {
            return Ok(None);
        }

        let events = parse_records_str(&content);
        self.last_snapshot = Some(content);
        let result = self.classifier.classify(&events?)?;

        let keys: HashSet<(String, i64)> = result
            .events()
            .iter()
            .map(|e| (e.label.label().to_string(), e.frame))
            .collect();
        let new_events = result
            .events()
            .iter()
            .filter(|e| !self.known.contains(&(e.label.label().to_string(), e.frame)))
            .cloned()
            .collect::<Vec<_>>();
        self.known = keys;

        let counts = result.counts();
        info!(
            "{} events ({} new): normal={}, root_exposed={}, buried={}, overlap={}, missing={}",
            result.events().len(),
            new_events.len(),
            counts.normal,
            counts.root_exposed,
            counts.buried,
            counts.overlap,
            counts.missing
        );

        Ok(Some(WatchUpdate { result, new_events }))
    }

    /// Poll until `stop` is set, passing each update to `on_update`.
    ///
    /// Errors from a single snapshot are logged and the loop continues.
    pub fn run<F>(&mut self, stop: &AtomicBool, mut on_update: F)
    where
        F: FnMut(&WatchUpdate) -> Result<()>,
    {
        info!(
            "Watching {} every {}ms",
            self.path.display(),
            self.poll_interval.as_millis()
        );

        while !stop.load(Ordering::Relaxed) {
            match self.poll_once() {
                Ok(Some(update)) => {
                    if let Err(e) = on_update(&update) {
                        warn!("Failed to report update: {e}");
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping snapshot of {}: {e}", self.path.display()),
            }
            std::thread::sleep(self.poll_interval);
        }

        info!("Stopped watching {}", self.path.display());
    }
}

//! Library folder watcher backed by `notify`

use crate::domain::LibraryWatcher;
use anyhow::{Context, Result};
use async_trait::async_trait;
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::path::PathBuf;
use tracing::{debug, info, warn};

pub struct NotifyLibraryWatcher {
    roots: Vec<PathBuf>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl NotifyLibraryWatcher {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            watcher: Mutex::new(None),
        }
    }

    pub fn is_watching(&self) -> bool {
        self.watcher.lock().is_some()
    }

    fn build(&self) -> Result<RecommendedWatcher> {
        let mut watcher = notify::recommended_watcher(|res: notify::Result<Event>| match res {
            Ok(event) => debug!(kind = ?event.kind, paths = ?event.paths, "Library change detected"),
            Err(e) => warn!(error = %e, "Library watcher error"),
        })
        .context("failed to create library watcher")?;

        for root in &self.roots {
            watcher
                .watch(root, RecursiveMode::Recursive)
                .with_context(|| format!("failed to watch {}", root.display()))?;
        }
        Ok(watcher)
    }
}

#[async_trait]
impl LibraryWatcher for NotifyLibraryWatcher {
    async fn start_watching(&self) -> Result<()> {
        let mut guard = self.watcher.lock();
        if guard.is_some() {
            return Ok(());
        }
        *guard = Some(self.build()?);
        info!(roots = self.roots.len(), "Started watching library folders");
        Ok(())
    }

    fn stop_watching(&self) {
        if self.watcher.lock().take().is_some() {
            info!("Stopped watching library folders");
        }
    }
}

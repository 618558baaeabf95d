//! Keeping the cache current as files change on disk.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::cache::canonical;
use crate::discovery::discover_files;
use crate::index::FileEntry;
use crate::reader::{read_files, stamp, FileStamp};
use crate::{GraphQLCache, Result};

/// A live subscription to file changes under the config directory.
///
/// Events are applied to the cache one at a time, in delivery order.
pub struct CacheWatcher {
    cache: Arc<GraphQLCache>,
    // Dropping the watcher ends the subscription.
    _watcher: RecommendedWatcher,
    events: mpsc::UnboundedReceiver<notify::Result<Event>>,
}

impl CacheWatcher {
    /// Wait for the next event and apply it.
    ///
    /// Resolves to the paths whose cache entries changed, or `None` once
    /// the watcher has shut down.
    pub async fn next(&mut self) -> Option<Result<Vec<PathBuf>>> {
        let event = self.events.recv().await?;
        Some(match event {
            Ok(event) => self.cache.handle_watch_event(&event).await,
            Err(error) => Err(error.into()),
        })
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<GraphQLCache> {
        &self.cache
    }
}

impl GraphQLCache {
    /// Start watching the config directory recursively.
    pub fn watch(self: &Arc<Self>) -> Result<CacheWatcher> {
        let (tx, events) = mpsc::unbounded_channel::<notify::Result<Event>>();
        let mut watcher = notify::recommended_watcher(move |event| {
            if tx.send(event).is_err() {
                tracing::trace!("watch event dropped, receiver closed");
            }
        })?;
        watcher.watch(self.root_dir(), RecursiveMode::Recursive)?;
        tracing::info!(root = %self.root_dir().display(), "watching for changes");

        Ok(CacheWatcher {
            cache: Arc::clone(self),
            _watcher: watcher,
            events,
        })
    }

    /// Apply one file-system event and return the paths whose entries
    /// changed.
    ///
    /// Files whose size and modification time match their cache entry are
    /// skipped, so delivering the same event twice changes nothing. Paths
    /// that no longer exist are removed. Event paths are matched in
    /// canonical form, so relative or symlinked spellings of a tracked file
    /// still apply. An event asking for a rescan
    /// resynchronizes every project file.
    pub async fn handle_watch_event(&self, event: &Event) -> Result<Vec<PathBuf>> {
        if event.need_rescan() {
            return self.resync().await;
        }

        let mut changed = Vec::new();
        let mut to_read = Vec::new();
        for path in &event.paths {
            let path = &canonical(path);
            if !self.is_tracked(path) {
                continue;
            }
            let Some(current) = stamp(path).await else {
                if self.remove(path) {
                    changed.push(path.clone());
                }
                continue;
            };
            if self.cached_stamp(path) == Some(current) {
                tracing::trace!(path = %path.display(), "unchanged, skipping");
                continue;
            }
            to_read.push(path.clone());
        }

        changed.extend(self.reindex(to_read).await?);
        if !changed.is_empty() {
            tracing::debug!(kind = ?event.kind, changed = changed.len(), "applied watch event");
        }
        Ok(changed)
    }

    /// Bring the cache in line with the disk: drop files that are gone and
    /// re-read files that are new or whose stamp changed.
    #[tracing::instrument(skip(self))]
    pub async fn resync(&self) -> Result<Vec<PathBuf>> {
        let on_disk = discover_files(self.root_dir(), self.project_configs());

        let gone: Vec<PathBuf> = self
            .files
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|path| on_disk.binary_search(path).is_err())
            .collect();
        let mut changed = Vec::new();
        for path in gone {
            if self.remove(&path) {
                changed.push(path);
            }
        }

        let mut to_read = Vec::new();
        for path in on_disk {
            let cached = self.cached_stamp(&path);
            if cached.is_some() && stamp(&path).await == cached {
                continue;
            }
            to_read.push(path);
        }

        changed.extend(self.reindex(to_read).await?);
        tracing::debug!(changed = changed.len(), "resync finished");
        Ok(changed)
    }

    fn cached_stamp(&self, path: &Path) -> Option<FileStamp> {
        self.files.get(path).map(|entry| entry.stamp)
    }

    async fn reindex(&self, paths: Vec<PathBuf>) -> Result<Vec<PathBuf>> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let files = read_files(paths).await?;
        Ok(files
            .into_iter()
            .map(|file| {
                let path = file.path.clone();
                self.insert(FileEntry::parse(file));
                path
            })
            .collect())
    }
}

//! File system watcher with debouncing for development mode.
//!
//! Watches the project directories and filters changes to relevant files,
//! ignoring build output, hidden files and configured patterns.

use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::error::{CliError, Result};

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    Modified(PathBuf),
    Created(PathBuf),
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    pub fn into_path(self) -> PathBuf {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Decides which paths are worth a reload.
#[derive(Debug, Clone)]
struct ChangeFilter {
    roots: Vec<PathBuf>,
    ignore_patterns: Vec<String>,
}

impl ChangeFilter {
    /// Check if a path should be ignored.
    ///
    /// Paths outside every watched root are always ignored.
    fn should_ignore(&self, path: &Path) -> bool {
        let Some(rel_path) = self
            .roots
            .iter()
            .find_map(|root| path.strip_prefix(root).ok())
        else {
            return true;
        };

        let names: Vec<&str> = rel_path
            .components()
            .filter_map(|component| match component {
                Component::Normal(name) => name.to_str(),
                _ => None,
            })
            .collect();

        // Hidden files and directories
        if names.iter().any(|name| name.starts_with('.')) {
            return true;
        }

        self.ignore_patterns.iter().any(|pattern| {
            if let Some(suffix) = pattern.strip_prefix('*') {
                // Extension pattern like "*.log"
                names.last().is_some_and(|name| name.ends_with(suffix))
            } else {
                // Directory or file name like "target"
                let pattern = pattern.trim_matches('/');
                names.iter().any(|name| *name == pattern)
                    || rel_path.starts_with(Path::new(pattern))
            }
        })
    }
}

/// Collapses repeated events for one path inside a time window.
#[derive(Debug)]
struct Debouncer {
    window: Duration,
    last_seen: HashMap<PathBuf, Instant>,
}

impl Debouncer {
    fn new(window: Duration) -> Self {
        Self {
            window,
            last_seen: HashMap::new(),
        }
    }

    /// Whether an event for `path` at `now` should be delivered.
    fn admit(&mut self, path: &Path, now: Instant) -> bool {
        if let Some(last) = self.last_seen.get(path) {
            if now.duration_since(*last) < self.window {
                return false;
            }
        }
        self.last_seen.retain(|_, seen| now.duration_since(*seen) < self.window);
        self.last_seen.insert(path.to_path_buf(), now);
        true
    }
}

/// File watcher with debouncing and filtering.
///
/// Watches directories recursively and sends change events through a channel.
pub struct FileWatcher {
    /// Underlying notify watcher; dropping it stops the watch
    _watcher: RecommendedWatcher,
    roots: Vec<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories to watch recursively
    /// * `ignore_patterns` - Path names and `*.ext` patterns to ignore
    /// * `debounce` - Window in which repeated events for one file collapse
    ///
    /// # Errors
    ///
    /// Returns error if watcher cannot be created or a directory doesn't exist
    pub fn new(
        roots: Vec<PathBuf>,
        ignore_patterns: Vec<String>,
        debounce: Duration,
    ) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        if let Some(missing) = roots.iter().find(|root| !root.exists()) {
            return Err(CliError::FileNotFound(missing.clone()));
        }

        let (tx, rx) = mpsc::channel(100);
        let filter = ChangeFilter {
            roots: roots.clone(),
            ignore_patterns,
        };
        let mut debouncer = Debouncer::new(debounce);

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(error) => {
                    tracing::warn!(%error, "File watcher error");
                    return;
                }
            };

            for path in &event.paths {
                if filter.should_ignore(path) || !debouncer.admit(path, Instant::now()) {
                    continue;
                }

                let change = match event.kind {
                    EventKind::Create(_) => FileChange::Created(path.clone()),
                    EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // The receiver is gone once the dev loop exits
                let _ = tx.blocking_send(change);
            }
        })?;

        for root in &roots {
            watcher.watch(root, RecursiveMode::Recursive)?;
        }

        Ok((
            Self {
                _watcher: watcher,
                roots,
            },
            rx,
        ))
    }

    /// Directories being watched.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }
}

use crossbeam_channel::Sender;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// Watches one level file on notify's background thread and forwards its
/// events to a channel.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    path: Option<PathBuf>,
}

impl FileWatcher {
    /// Create a new file watcher that sends events to the provided channel
    pub fn new(tx: Sender<notify::Result<Event>>) -> notify::Result<Self> {
        let watcher = notify::recommended_watcher(move |res| {
            // We ignore send errors because it means the receiver was dropped
            let _ = tx.send(res);
        })?;

        Ok(Self {
            watcher,
            path: None,
        })
    }

    /// Watch `path`, replacing whatever file was watched before
    pub fn watch_file(&mut self, path: &Path) -> notify::Result<()> {
        self.watcher.watch(path, RecursiveMode::NonRecursive)?;
        if let Some(previous) = self.path.replace(path.to_path_buf()) {
            if previous != path {
                let _ = self.watcher.unwatch(&previous);
            }
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes and re-creations both count; editors often save by replacing
    /// the file.
    pub fn is_reload_event(event: &Event) -> bool {
        matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use notify::event::{AccessKind, CreateKind, ModifyKind};

    #[test]
    fn test_reload_events() {
        assert!(FileWatcher::is_reload_event(&Event::new(EventKind::Modify(
            ModifyKind::Any
        ))));
        assert!(FileWatcher::is_reload_event(&Event::new(EventKind::Create(
            CreateKind::File
        ))));
        assert!(!FileWatcher::is_reload_event(&Event::new(EventKind::Access(
            AccessKind::Any
        ))));
    }

    #[test]
    fn test_watching_a_new_file_replaces_the_old_one() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.json");
        let second = dir.path().join("second.json");
        std::fs::write(&first, "[]").unwrap();
        std::fs::write(&second, "[]").unwrap();

        let (tx, _rx) = unbounded();
        let mut watcher = FileWatcher::new(tx).unwrap();
        watcher.watch_file(&first).unwrap();
        assert_eq!(watcher.path(), Some(first.as_path()));
        watcher.watch_file(&second).unwrap();
        assert_eq!(watcher.path(), Some(second.as_path()));

        assert!(watcher
            .watch_file(&dir.path().join("missing.json"))
            .is_err());
        assert_eq!(watcher.path(), Some(second.as_path()));
    }
}

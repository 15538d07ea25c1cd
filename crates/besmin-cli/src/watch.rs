//! Watch mode: incremental per-file rebuilds on filesystem changes.
//!
//! A notify watcher feeds change events into a tokio channel; each event
//! re-runs the single-file pipeline for every selected format. Events for
//! distinct files are handled concurrently, but events for the same source
//! file are serialized through a per-path lock so writes to one output path
//! never interleave. A short debounce window coalesces editor double-writes.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, Mutex, OwnedMutexGuard};
use tracing::debug;

use besmin_pipeline::paths::is_eligible;
use besmin_pipeline::{BuildStatus, Builder, Validator};
use besmin_transform::{ModuleFormat, OxcMinifier, OxcTransformer, ProfileRegistry};

use crate::error::Result;
use crate::orchestrator::print_check_outcome;
use crate::ui;

/// Repeated events for the same path inside this window are dropped.
const DEBOUNCE: Duration = Duration::from_millis(100);

/// File watcher over the input tree.
///
/// Dotfile paths and ineligible extensions are filtered at the event
/// callback; surviving change events arrive on the returned channel. There
/// is no stop contract: the watcher lives until the process terminates.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Watch `root` recursively, delivering eligible changed paths.
    pub fn new(root: &Path) -> Result<(Self, mpsc::Receiver<PathBuf>)> {
        // Canonicalize so event paths (always absolute) match the root.
        let root = root.canonicalize()?;
        let (tx, rx) = mpsc::channel(100);

        let filter_root = root.clone();
        let mut last_event: HashMap<PathBuf, Instant> = HashMap::new();
        let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
            let Ok(event) = result else { return };
            if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                return;
            }
            for path in &event.paths {
                if should_ignore(path, &filter_root) {
                    continue;
                }
                let now = Instant::now();
                if let Some(last) = last_event.get(path) {
                    if now.duration_since(*last) < DEBOUNCE {
                        continue;
                    }
                }
                last_event.insert(path.clone(), now);
                let _ = tx.blocking_send(path.clone());
            }
        })?;
        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// The canonicalized root being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Whether a changed path is outside the pipeline's interest.
fn should_ignore(path: &Path, root: &Path) -> bool {
    let Ok(relative) = path.strip_prefix(root) else {
        return true;
    };
    for component in relative.components() {
        if let Some(name) = component.as_os_str().to_str() {
            if name.starts_with('.') {
                return true;
            }
        }
    }
    !is_eligible(path)
}

/// Per-path async locks: one in-flight rebuild per source file.
#[derive(Default)]
struct PathLocks {
    locks: parking_lot::Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl PathLocks {
    async fn acquire(&self, path: &Path) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock();
            Arc::clone(locks.entry(path.to_path_buf()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Shared state for one watch session.
struct Session {
    input_root: PathBuf,
    output_dir: Option<PathBuf>,
    formats: Vec<ModuleFormat>,
    fix: bool,
    transformer: OxcTransformer,
    minifier: OxcMinifier,
    registry: ProfileRegistry,
    locks: PathLocks,
}

impl Session {
    /// Re-run the per-file pipeline for one changed file.
    ///
    /// In fix mode this is a syntax re-check; otherwise the file is rebuilt
    /// for every selected format, in selection order.
    async fn handle_change(&self, path: &Path) {
        let _guard = self.locks.acquire(path).await;

        if self.fix {
            let outcome = Validator::new(&self.transformer).check_file(path).await;
            print_check_outcome(path, &outcome);
            return;
        }
        let Some(output_dir) = &self.output_dir else {
            return;
        };
        let Ok(relative) = path.strip_prefix(&self.input_root) else {
            debug!(path = %path.display(), "change outside input root ignored");
            return;
        };
        let builder = Builder::new(&self.transformer, &self.minifier, &self.registry);
        for format in &self.formats {
            let entry = builder.build_file(path, relative, output_dir, *format).await;
            match &entry.status {
                BuildStatus::Written { output, .. } => {
                    ui::success(&format!("Output Ok: {}", output.display()));
                }
                BuildStatus::Failed(error) => {
                    ui::error(&format!("Skipped {}: {error}", path.display()));
                }
            }
        }
    }
}

/// Watch `input_dir` and re-run the per-file pipeline on every change.
///
/// Never returns on the success path; the session runs until the process is
/// terminated.
pub async fn watch(
    input_dir: &Path,
    output_dir: Option<PathBuf>,
    formats: Vec<ModuleFormat>,
    fix: bool,
) -> Result<()> {
    let (watcher, mut rx) = FileWatcher::new(input_dir)?;
    ui::info(&format!(
        "Watching for changes in {}",
        watcher.root().display()
    ));

    let session = Arc::new(Session {
        input_root: watcher.root().to_path_buf(),
        output_dir,
        formats,
        fix,
        transformer: OxcTransformer::new(),
        minifier: OxcMinifier::new(),
        registry: ProfileRegistry::new(),
        locks: PathLocks::default(),
    });

    while let Some(path) = rx.recv().await {
        ui::info(&format!("Changed: {}", path.display()));
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            session.handle_change(&path).await;
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_should_ignore_dotfiles() {
        let root = PathBuf::from("/project");
        assert!(should_ignore(Path::new("/project/.hidden.js"), &root));
        assert!(should_ignore(Path::new("/project/.cache/a.js"), &root));
        assert!(!should_ignore(Path::new("/project/src/a.js"), &root));
    }

    #[test]
    fn test_should_ignore_outside_root() {
        let root = PathBuf::from("/project");
        assert!(should_ignore(Path::new("/elsewhere/a.js"), &root));
    }

    #[test]
    fn test_should_ignore_ineligible_extensions() {
        let root = PathBuf::from("/project");
        assert!(should_ignore(Path::new("/project/readme.md"), &root));
        assert!(should_ignore(Path::new("/project/data.json"), &root));
        assert!(!should_ignore(Path::new("/project/mod.ts"), &root));
    }

    #[tokio::test]
    async fn test_path_locks_are_reentrant_after_release() {
        let locks = PathLocks::default();
        let path = Path::new("/project/a.js");
        drop(locks.acquire(path).await);
        drop(locks.acquire(path).await);
    }

    #[tokio::test]
    async fn test_change_rebuilds_every_selected_format() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("src");
        let output = temp.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.js"), "export const x = 1;\n").unwrap();

        let session = Session {
            input_root: input.canonicalize().unwrap(),
            output_dir: Some(output.clone()),
            formats: vec![ModuleFormat::Cjs, ModuleFormat::Esm],
            fix: false,
            transformer: OxcTransformer::new(),
            minifier: OxcMinifier::new(),
            registry: ProfileRegistry::new(),
            locks: PathLocks::default(),
        };
        let changed = session.input_root.join("a.js");
        session.handle_change(&changed).await;

        assert!(output.join("cjs/a.js").is_file());
        assert!(output.join("esm/a.js").is_file());
        // Exactly one output tree entry per selected format, plus maps.
        assert!(!output.join("amd").exists());
        assert!(!output.join("umd").exists());
        assert!(!output.join("sysjs").exists());
    }

    #[tokio::test]
    async fn test_fix_mode_change_does_not_write_output() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("src");
        let output = temp.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.js"), "export const x = 1;\n").unwrap();

        let session = Session {
            input_root: input.canonicalize().unwrap(),
            output_dir: Some(output.clone()),
            formats: vec![ModuleFormat::Esm],
            fix: true,
            transformer: OxcTransformer::new(),
            minifier: OxcMinifier::new(),
            registry: ProfileRegistry::new(),
            locks: PathLocks::default(),
        };
        let changed = session.input_root.join("a.js");
        session.handle_change(&changed).await;

        assert!(!output.exists());
    }
}

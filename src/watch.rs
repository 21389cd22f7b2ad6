use crossbeam_channel::{select, unbounded, Receiver, Sender};
use notify::{Event, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::config::Config;
use crate::diagnostics::{render_error, GenError};
use crate::output::{write_artifacts, WriteReport};

const DEBOUNCE: Duration = Duration::from_millis(100);

/// Where one generation episode reads from and writes to.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub snapshot: PathBuf,
    pub out_dir: PathBuf,
    /// An explicit `--config`; otherwise `polystruct.toml` next to the snapshot is picked up.
    pub config: Option<PathBuf>,
}

impl WatchTarget {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let dir = self.snapshot.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            Config::find_in(dir)
        })
    }

    pub fn load_config(&self) -> Result<Config, GenError> {
        match self.config_path() {
            Some(path) => Config::load(&path),
            None => Ok(Config::default()),
        }
    }

    /// Read, generate, and write once.
    pub fn regenerate(&self) -> Result<WriteReport, GenError> {
        let config = self.load_config()?;
        let json = read_snapshot(&self.snapshot)?;
        let artifacts = crate::generate_from_json(&json, &config)?;
        write_artifacts(&self.out_dir, &artifacts, false)
    }

    fn watched_files(&self) -> Vec<PathBuf> {
        let mut files = vec![self.snapshot.clone()];
        files.extend(self.config_path());
        files
    }
}

pub fn read_snapshot(path: &Path) -> Result<String, GenError> {
    std::fs::read_to_string(path)
        .map_err(|e| GenError::io(format!("failed to read snapshot: {e}"), path.to_path_buf()))
}

/// Regenerate whenever the snapshot or its config changes. Runs until killed.
pub fn watch_generate(target: &WatchTarget, no_clear: bool) -> Result<(), GenError> {
    info!(snapshot = %target.snapshot.display(), "watching for changes");
    run_once(target);

    let (tx, rx) = unbounded();
    let mut watcher = create_watcher(tx)?;
    for file in target.watched_files() {
        watcher
            .watch(&file, RecursiveMode::NonRecursive)
            .map_err(|e| GenError::io(format!("failed to watch file: {e}"), file.clone()))?;
    }

    loop {
        if rx.recv().is_err() {
            return Ok(());
        }
        debounce_events(&rx);

        if !no_clear {
            clearscreen::clear().ok();
        }
        info!("snapshot changed, regenerating");
        run_once(target);
    }
}

fn run_once(target: &WatchTarget) {
    match target.regenerate() {
        Ok(report) => info!(
            written = report.written.len(),
            unchanged = report.unchanged.len(),
            removed = report.removed.len(),
            "output up to date"
        ),
        Err(err) => {
            error!("generation failed: {err}");
            let source = match &err {
                GenError::Config { path, .. } => std::fs::read_to_string(path).unwrap_or_default(),
                _ => read_snapshot(&target.snapshot).unwrap_or_default(),
            };
            render_error(&source, &err);
        }
    }
}

/// Drain events until the channel stays quiet for the debounce window.
fn debounce_events(rx: &Receiver<Event>) {
    loop {
        select! {
            recv(rx) -> _event => {}
            default(DEBOUNCE) => break,
        }
    }
}

fn create_watcher(tx: Sender<Event>) -> Result<notify::RecommendedWatcher, GenError> {
    notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            if matches!(event.kind, notify::EventKind::Modify(_) | notify::EventKind::Create(_)) {
                let _ = tx.send(event);
            }
        }
    })
    .map_err(|e| GenError::io(format!("failed to create file watcher: {e}"), PathBuf::new()))
}

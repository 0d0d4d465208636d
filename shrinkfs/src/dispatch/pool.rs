//! Worker pool that turns scanned entries into a virtual tree.

use super::config::{DispatchConfig, FailurePolicy};
use super::phase::{BuildPhase, PhaseError};
use super::report::BuildReport;
use super::worker::{process_entry, Outcome};
use crate::cache::TranscodeCache;
use crate::log::Logger;
use crate::scan::{Scanner, SourceEntry};
use crate::tree::{TreeError, VirtualTree};
use crate::{log_debug, log_info, log_warn};
use crossbeam_channel::Receiver;
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use thiserror::Error;

/// Failures of the pool itself. Per-file failures never surface here.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("worker thread '{0}' panicked")]
    WorkerPanicked(String),

    #[error("tree still shared after all workers joined")]
    TreeShared,

    #[error(transparent)]
    Phase(#[from] PhaseError),
}

/// A finished tree plus what happened while building it.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: VirtualTree,
    pub report: BuildReport,
}

/// Runs the scan-to-tree pipeline on a fixed set of threads.
///
/// Each call to [`build`](Self::build) starts fresh workers and a fresh
/// tree; nothing is carried between builds except the cache.
pub struct Dispatcher {
    config: DispatchConfig,
    cache: Arc<TranscodeCache>,
    policy: FailurePolicy,
    logger: Arc<dyn Logger>,
}

impl Dispatcher {
    pub fn new(
        config: DispatchConfig,
        cache: Arc<TranscodeCache>,
        policy: FailurePolicy,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            config: config.normalized(),
            cache,
            policy,
            logger,
        }
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    pub fn cache(&self) -> &Arc<TranscodeCache> {
        &self.cache
    }

    /// Build a tree from `entries`, which must lie under `source_root`.
    ///
    /// Blocks until every worker has joined.
    pub fn build<I>(&self, source_root: &Path, entries: I) -> Result<BuiltTree, DispatchError>
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        let built = self.run(source_root, entries)?;
        self.log_summary(&built.report);
        Ok(built)
    }

    /// Scan with `scanner` and build a tree from what it finds.
    ///
    /// Entries the scanner skipped are counted in the report.
    pub fn build_from_scan(&self, scanner: &Scanner) -> Result<BuiltTree, DispatchError> {
        let mut entries = scanner.scan();
        let mut built = self.run(scanner.root(), entries.by_ref())?;
        built.report.skipped = entries.skipped() as u64;
        self.log_summary(&built.report);
        Ok(built)
    }

    fn run<I>(&self, source_root: &Path, entries: I) -> Result<BuiltTree, DispatchError>
    where
        I: IntoIterator<Item = SourceEntry>,
    {
        let started = Instant::now();
        let mut phase = BuildPhase::Unbuilt;
        let tree = Arc::new(Mutex::new(VirtualTree::new()));

        let (tx, rx) = crossbeam_channel::bounded::<SourceEntry>(self.config.queue_capacity);

        let mut handles = Vec::with_capacity(self.config.workers);
        for worker_idx in 0..self.config.workers {
            match self.spawn_worker(worker_idx, rx.clone(), Arc::clone(&tree), source_root) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    drop(tx);
                    // Workers already running exit once the channel closes.
                    let _ = join_all(handles);
                    return Err(DispatchError::Spawn(e));
                }
            }
        }
        // Only workers hold receivers now, so a send fails if they all died.
        drop(rx);

        phase.advance(BuildPhase::Scanning)?;
        log_debug!(
            self.logger,
            "Scanning {} with {} workers (queue capacity {})",
            source_root.display(),
            self.config.workers,
            self.config.queue_capacity
        );

        for entry in entries {
            if tx.send(entry).is_err() {
                break;
            }
        }

        phase.advance(BuildPhase::Draining)?;
        drop(tx);

        let mut report = join_all(handles)?;

        phase.advance(BuildPhase::Built)?;
        let tree = Arc::try_unwrap(tree)
            .map_err(|_| DispatchError::TreeShared)?
            .into_inner();

        report.elapsed = started.elapsed();
        Ok(BuiltTree { tree, report })
    }

    fn spawn_worker(
        &self,
        worker_idx: usize,
        rx: Receiver<SourceEntry>,
        tree: Arc<Mutex<VirtualTree>>,
        source_root: &Path,
    ) -> io::Result<JoinHandle<BuildReport>> {
        let cache = Arc::clone(&self.cache);
        let logger = Arc::clone(&self.logger);
        let policy = self.policy;
        let source_root: PathBuf = source_root.to_path_buf();

        thread::Builder::new()
            .name(format!("shrink-worker-{worker_idx}"))
            .spawn(move || {
                let mut report = BuildReport::default();

                for entry in rx.iter() {
                    let (path, node) =
                        match process_entry(entry, &source_root, &cache, policy, &logger) {
                            Outcome::Passthrough(path, node) => {
                                report.passthrough += 1;
                                (path, node)
                            }
                            Outcome::Transcoded(path, node) => {
                                report.transcoded += 1;
                                (path, node)
                            }
                            Outcome::Fallback(path, node) => {
                                report.fallbacks += 1;
                                (path, node)
                            }
                            Outcome::Dropped => {
                                report.dropped += 1;
                                continue;
                            }
                        };

                    let inserted = tree.lock().insert(path.clone(), node);
                    match inserted {
                        Ok(()) => report.inserted += 1,
                        Err(e @ (TreeError::DuplicatePath(_) | TreeError::Conflict(_))) => {
                            log_warn!(logger, "Not serving {}: {}", path.display(), e);
                            report.duplicates += 1;
                        }
                        Err(e) => {
                            log_warn!(logger, "Not serving {}: {}", path.display(), e);
                            report.dropped += 1;
                        }
                    }
                }

                report
            })
    }

    fn log_summary(&self, report: &BuildReport) {
        log_info!(self.logger, "Tree built: {}", report);

        let stats = self.cache.stats();
        log_info!(
            self.logger,
            "Cache: {} hits, {} transcodes, {} failures, {} bytes written ({:.1}% hit ratio)",
            stats.hits,
            stats.transcodes,
            stats.failures,
            stats.bytes_written,
            stats.hit_ratio() * 100.0
        );
    }
}

/// Join every handle and merge their reports.
///
/// All handles are joined even if one panicked, so no worker outlives the
/// build.
fn join_all(handles: Vec<JoinHandle<BuildReport>>) -> Result<BuildReport, DispatchError> {
    let mut total = BuildReport::default();
    let mut panicked = None;

    for handle in handles {
        let name = handle.thread().name().unwrap_or("worker").to_string();
        match handle.join() {
            Ok(report) => total.merge(&report),
            Err(_) => {
                panicked.get_or_insert(name);
            }
        }
    }

    match panicked {
        Some(name) => Err(DispatchError::WorkerPanicked(name)),
        None => Ok(total),
    }
}

//! Catalog store: the published snapshot and the background refresher
//!
//! Readers call [`CatalogStore::current`] or [`CatalogStore::search`] from any
//! thread without locking; they get an `Arc` to one complete snapshot. The
//! refresher builds a new snapshot off to the side and swaps it in with a
//! single atomic store, so a reader sees either the old or the new catalog.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use tokio_util::sync::CancellationToken;

use crate::catalog::{
    build_catalog, list_source_files, BuildWarning, CatalogSnapshot, CsvSource, ProductEntry,
    TabularSource,
};
use crate::config::RefreshConfig;
use crate::error::Result;
use crate::matcher::find_matches;

/// Handle to the refresh task.
///
/// Stays in the store's slot until the task has exited, so a cancelled
/// refresher still finishing its build blocks a new `start`.
struct Refresher {
    cancel: CancellationToken,
    // cancelled by a drop guard owned by the task, whichever way it ends
    exited: CancellationToken,
}

impl Refresher {
    fn is_alive(&self) -> bool {
        !self.exited.is_cancelled()
    }
}

/// Summary of one successful refresh cycle
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    pub generation: u64,
    pub entries: usize,
    pub warnings: Vec<BuildWarning>,
}

/// Owner of the current catalog snapshot
pub struct CatalogStore {
    current: ArcSwap<CatalogSnapshot>,
    // serializes publishers so generations are stored in order
    publish_lock: Mutex<()>,
    source: Arc<dyn TabularSource>,
    refresher: Mutex<Option<Refresher>>,
}

impl CatalogStore {
    /// Create a store serving the empty snapshot, reading files as CSV
    pub fn new() -> Self {
        Self::with_source(Arc::new(CsvSource))
    }

    pub fn with_source(source: Arc<dyn TabularSource>) -> Self {
        Self {
            current: ArcSwap::from_pointee(CatalogSnapshot::empty()),
            publish_lock: Mutex::new(()),
            source,
            refresher: Mutex::new(None),
        }
    }

    /// The snapshot published last, or the empty one before any publish
    pub fn current(&self) -> Arc<CatalogSnapshot> {
        self.current.load_full()
    }

    /// Generation of the snapshot published last (0 before any publish)
    pub fn generation(&self) -> u64 {
        self.current.load().generation()
    }

    /// Atomically replace the current snapshot and return its generation
    pub fn publish(&self, snapshot: CatalogSnapshot) -> u64 {
        let _guard = self
            .publish_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let generation = self.current.load().generation() + 1;
        self.current
            .store(Arc::new(snapshot.with_generation(generation)));
        generation
    }

    /// Search the current snapshot, see [`find_matches`]
    pub fn search(&self, text: &str) -> Vec<ProductEntry> {
        let snapshot = self.current();
        find_matches(&snapshot, text).into_iter().cloned().collect()
    }

    /// Run one listing + build + publish cycle on the calling thread.
    ///
    /// A listing failure is returned and leaves the current snapshot alone.
    pub fn refresh_once(&self, config: &RefreshConfig) -> Result<RefreshOutcome> {
        let files = list_source_files(&config.directory, &config.file_pattern)?;
        let report = build_catalog(
            &config.directory,
            &files,
            self.source.as_ref(),
            &config.synonyms,
        );

        let entries = report.snapshot.len();
        let file_count = report.snapshot.files().len();
        let generation = self.publish(report.snapshot);

        log::info!(
            "Published catalog generation {}: {} entries from {} file(s), {} warning(s)",
            generation,
            entries,
            file_count,
            report.warnings.len()
        );

        Ok(RefreshOutcome {
            generation,
            entries,
            warnings: report.warnings,
        })
    }

    /// Start the background refresher. Must be called within a Tokio runtime.
    ///
    /// Returns `false` without doing anything if a refresher is already running,
    /// including one that was stopped but has not finished its last cycle yet.
    pub fn start(self: &Arc<Self>, config: RefreshConfig) -> bool {
        let mut slot = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if slot.as_ref().is_some_and(Refresher::is_alive) {
            log::warn!("Refresher already running, ignoring start request");
            return false;
        }

        log::info!(
            "Starting refresher for {} every {:?}",
            config.directory.display(),
            config.interval
        );

        let cancel = CancellationToken::new();
        let exited = CancellationToken::new();
        let exit_guard = exited.clone().drop_guard();
        let loop_fut = refresh_loop(Arc::clone(self), Arc::new(config), cancel.clone());
        tokio::spawn(async move {
            let _exit_guard = exit_guard;
            loop_fut.await;
        });

        *slot = Some(Refresher { cancel, exited });
        true
    }

    /// Whether a refresher task is currently alive
    pub fn is_running(&self) -> bool {
        self.refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(Refresher::is_alive)
    }

    /// Signal cancellation and wait for the refresher to exit.
    ///
    /// An in-flight cycle runs to completion first. Returns immediately when
    /// no refresher was started. The last published snapshot stays readable.
    pub async fn stop(&self) {
        let exited = {
            let slot = self
                .refresher
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            let Some(refresher) = slot.as_ref() else {
                return;
            };
            refresher.cancel.cancel();
            refresher.exited.clone()
        };

        exited.cancelled().await;

        // a later start may already own the slot; only clear our exited one
        let mut slot = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|r| !r.is_alive()) {
            *slot = None;
        }
        drop(slot);

        log::info!(
            "Refresher stopped, serving generation {}",
            self.generation()
        );
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

async fn refresh_loop(
    store: Arc<CatalogStore>,
    config: Arc<RefreshConfig>,
    cancel: CancellationToken,
) {
    loop {
        if cancel.is_cancelled() {
            break;
        }

        // builds are blocking file I/O and are never interrupted once started
        let cycle_store = Arc::clone(&store);
        let cycle_config = Arc::clone(&config);
        let cycle =
            tokio::task::spawn_blocking(move || cycle_store.refresh_once(&cycle_config)).await;

        match cycle {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => log::error!(
                "Refresh cycle failed, keeping generation {}: {}",
                store.generation(),
                e
            ),
            Err(e) => log::error!("Refresh cycle panicked: {}", e),
        }

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(config.interval) => {}
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

//! Runs a metadata batch on a background thread.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::thread::JoinHandle;

use crate::client::JsonFetch;
use crate::error::ScrapeError;
use crate::fetch::{MetadataFetcher, MetadataProgress, fetch_batch};

/// Owns at most one background batch at a time. The thread drives its own
/// single-threaded Tokio runtime; progress arrives on the returned channel
/// and ends with [`MetadataProgress::Completed`] or
/// [`MetadataProgress::Failed`].
#[derive(Default)]
pub struct MetadataWorker {
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Clears the running flag when the thread finishes, even by panicking.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl MetadataWorker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start fetching `names`. Fails with [`ScrapeError::WorkerBusy`] while a
    /// previous batch is still running.
    pub fn start<F>(
        &mut self,
        fetcher: MetadataFetcher<F>,
        names: Vec<String>,
    ) -> Result<Receiver<MetadataProgress>, ScrapeError>
    where
        F: JsonFetch + Send + 'static,
    {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ScrapeError::WorkerBusy);
        }
        if let Some(old) = self.handle.take() {
            let _ = old.join();
        }

        let (tx, rx) = mpsc::channel();
        let guard = RunningGuard(Arc::clone(&self.running));
        let spawned = std::thread::Builder::new()
            .name("metadata-worker".to_string())
            .spawn(move || {
                let _guard = guard;
                let runtime = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        let _ = tx.send(MetadataProgress::Failed {
                            message: format!("Could not start async runtime: {e}"),
                        });
                        return;
                    }
                };
                runtime.block_on(fetch_batch(&fetcher, &names, |event| {
                    // A dropped receiver is not an error.
                    let _ = tx.send(event);
                }));
            });

        match spawned {
            Ok(handle) => {
                self.handle = Some(handle);
                Ok(rx)
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                Err(e.into())
            }
        }
    }

    /// Wait for the current batch, if any, to finish.
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("Metadata worker thread panicked");
        }
    }
}

impl Drop for MetadataWorker {
    fn drop(&mut self) {
        self.join();
    }
}

//! Bounded worker pool that pushes documents into the index
//!
//! A fixed number of worker threads drain a bounded channel of documents and
//! upsert each one through a shared [`IndexSession`]. The channel gives
//! backpressure: [`BulkIndexer::add`] blocks while the queue is full.
//!
//! Every document that enters [`BulkIndexer::add`] ends up in exactly one
//! bucket of [`BulkStats`]: indexed, failed (with its error), or not
//! attempted (cancelled before dispatch). [`BulkIndexer::close`] is the
//! barrier: it waits for in-flight work, commits the session and only then
//! returns the statistics.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, bounded};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::error::{JobSearchError, Result};
use crate::search::client::{IndexClient, IndexSession};
use crate::search::document::JobDocument;
use crate::utils::CancelToken;

/// Default number of indexing workers
pub const DEFAULT_WORKERS: usize = 5;

/// Default capacity of the pending-document queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkConfig {
    pub workers: usize,
    pub queue_capacity: usize,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// A document the index rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    pub job_id: i64,
    pub error: String,
}

/// Final accounting of one bulk run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkStats {
    /// Documents handed to [`BulkIndexer::add`].
    pub added: u64,
    pub indexed: u64,
    /// Sorted by job id.
    pub failed: Vec<ItemFailure>,
    /// Job ids discarded after cancellation, sorted.
    pub not_attempted: Vec<i64>,
}

impl BulkStats {
    #[must_use]
    pub fn failed_ids(&self) -> Vec<i64> {
        self.failed.iter().map(|f| f.job_id).collect()
    }

    #[must_use]
    pub fn num_failed(&self) -> u64 {
        self.failed.len() as u64
    }

    /// Fold another run's statistics into this one.
    pub fn merge(&mut self, other: Self) {
        self.added += other.added;
        self.indexed += other.indexed;
        self.failed.extend(other.failed);
        self.failed.sort_by_key(|f| f.job_id);
        self.not_attempted.extend(other.not_attempted);
        self.not_attempted.sort_unstable();
    }
}

#[derive(Default)]
struct Outcomes {
    indexed: u64,
    failed: Vec<ItemFailure>,
    not_attempted: Vec<i64>,
}

/// Worker pool feeding one index session.
pub struct BulkIndexer {
    sender: Sender<JobDocument>,
    workers: Vec<JoinHandle<()>>,
    session: Arc<dyn IndexSession>,
    outcomes: Arc<Mutex<Outcomes>>,
    cancel: CancelToken,
    added: u64,
}

impl BulkIndexer {
    /// Open an index session and spawn the workers.
    ///
    /// Failing to open the session is the one run-level failure; it is
    /// returned before any document is accepted.
    pub fn start(client: &dyn IndexClient, config: BulkConfig, cancel: CancelToken) -> Result<Self> {
        if config.workers == 0 || config.queue_capacity == 0 {
            return Err(JobSearchError::Config(
                "bulk indexer needs at least one worker and a non-empty queue".to_string(),
            ));
        }

        let session: Arc<dyn IndexSession> = Arc::from(client.open_session()?);
        let (sender, receiver) = bounded::<JobDocument>(config.queue_capacity);
        let outcomes = Arc::new(Mutex::new(Outcomes::default()));

        let mut workers = Vec::with_capacity(config.workers);
        for worker_id in 0..config.workers {
            let receiver = receiver.clone();
            let session = Arc::clone(&session);
            let outcomes = Arc::clone(&outcomes);
            let cancel = cancel.clone();
            let spawned = thread::Builder::new()
                .name(format!("bulk-indexer-{worker_id}"))
                .spawn(move || worker_loop(worker_id, &receiver, session.as_ref(), &outcomes, &cancel));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    // Let already running workers exit before reporting.
                    drop(sender);
                    for handle in workers {
                        let _ = handle.join();
                    }
                    return Err(JobSearchError::Io(err));
                }
            }
        }

        debug!(
            workers = config.workers,
            queue_capacity = config.queue_capacity,
            "bulk indexer started"
        );

        Ok(Self {
            sender,
            workers,
            session,
            outcomes,
            cancel,
            added: 0,
        })
    }

    /// Queue a document, blocking while the queue is full.
    ///
    /// After cancellation the document is recorded as not attempted and
    /// [`JobSearchError::Cancelled`] tells the producer to stop.
    pub fn add(&mut self, doc: JobDocument) -> Result<()> {
        self.added += 1;
        if self.cancel.is_cancelled() {
            self.outcomes.lock().not_attempted.push(doc.id);
            return Err(JobSearchError::Cancelled);
        }
        trace!(job_id = doc.id, "queue document");
        if let Err(rejected) = self.sender.send(doc) {
            // Only possible if every worker is gone.
            self.outcomes.lock().not_attempted.push(rejected.into_inner().id);
            return Err(JobSearchError::IndexUnavailable(
                "bulk indexer workers stopped".to_string(),
            ));
        }
        Ok(())
    }

    /// Number of documents accepted so far.
    #[must_use]
    pub const fn added(&self) -> u64 {
        self.added
    }

    /// Flush and wait: close the queue, join the workers, commit, and return
    /// the final statistics.
    pub fn close(self) -> Result<BulkStats> {
        let Self {
            sender,
            workers,
            session,
            outcomes,
            cancel,
            added,
        } = self;

        drop(sender);
        let mut lost_worker = false;
        for handle in workers {
            if handle.join().is_err() {
                lost_worker = true;
            }
        }
        if lost_worker {
            return Err(JobSearchError::IndexUnavailable(
                "bulk indexer worker panicked".to_string(),
            ));
        }

        session.commit()?;

        let mut outcomes = std::mem::take(&mut *outcomes.lock());
        outcomes.failed.sort_by_key(|f| f.job_id);
        outcomes.not_attempted.sort_unstable();
        let stats = BulkStats {
            added,
            indexed: outcomes.indexed,
            failed: outcomes.failed,
            not_attempted: outcomes.not_attempted,
        };

        info!(
            added = stats.added,
            indexed = stats.indexed,
            failed = stats.failed.len(),
            not_attempted = stats.not_attempted.len(),
            cancelled = cancel.is_cancelled(),
            "bulk indexing finished"
        );
        Ok(stats)
    }
}

fn worker_loop(
    worker_id: usize,
    receiver: &Receiver<JobDocument>,
    session: &dyn IndexSession,
    outcomes: &Mutex<Outcomes>,
    cancel: &CancelToken,
) {
    for doc in receiver.iter() {
        if cancel.is_cancelled() {
            outcomes.lock().not_attempted.push(doc.id);
            continue;
        }
        match session.upsert(&doc) {
            Ok(()) => {
                trace!(worker_id, job_id = doc.id, "indexed");
                outcomes.lock().indexed += 1;
            }
            Err(err) => {
                warn!(worker_id, job_id = doc.id, error = %err, "document indexing failed");
                outcomes.lock().failed.push(ItemFailure {
                    job_id: doc.id,
                    error: err.to_string(),
                });
            }
        }
    }
    trace!(worker_id, "bulk worker drained");
}

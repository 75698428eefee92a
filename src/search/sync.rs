//! Relational store to search index synchronization
//!
//! One-directional: jobs are read page by page from the [`JobRepository`],
//! projected into [`JobDocument`]s and handed to a [`BulkIndexer`]. The index
//! is disposable, so a full run can always rebuild it from scratch.
//!
//! Jobs whose company cannot be resolved are skipped and reported; they never
//! reach the index as partial documents.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::SyncConfig;
use crate::core::Pagination;
use crate::error::{JobSearchError, Result};
use crate::search::bulk::{BulkIndexer, BulkStats};
use crate::search::client::IndexClient;
use crate::search::document::{JobDocument, build_document};
use crate::storage::{Job, JobRepository, JobSkill};
use crate::utils::CancelToken;

/// A job left out of a run because its projection could not be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedJob {
    pub job_id: i64,
    pub reason: String,
}

/// Outcome of one synchronization run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub stats: BulkStats,
    pub skipped: Vec<SkippedJob>,
    /// True when the run stopped early on its cancellation token.
    pub cancelled: bool,
}

impl SyncReport {
    /// Job ids that should be retried: index failures and skipped jobs.
    #[must_use]
    pub fn retry_ids(&self) -> Vec<i64> {
        let mut ids = self.stats.failed_ids();
        ids.extend(self.skipped.iter().map(|s| s.job_id));
        ids.extend(&self.stats.not_attempted);
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Drives the projection and bulk indexing of jobs.
pub struct IndexSynchronizer<'a> {
    repo: &'a dyn JobRepository,
    client: &'a dyn IndexClient,
    config: SyncConfig,
}

impl<'a> IndexSynchronizer<'a> {
    #[must_use]
    pub const fn new(
        repo: &'a dyn JobRepository,
        client: &'a dyn IndexClient,
        config: SyncConfig,
    ) -> Self {
        Self {
            repo,
            client,
            config,
        }
    }

    /// Reindex every job in the relational store.
    pub fn reindex_all(&self, cancel: &CancelToken) -> Result<SyncReport> {
        info!("full reindex started");
        self.run(cancel, |page| self.repo.list_jobs(page))
    }

    /// Reindex every job owned by one company.
    pub fn reindex_company(&self, company_id: i64, cancel: &CancelToken) -> Result<SyncReport> {
        info!(company_id, "company reindex started");
        self.run(cancel, |page| self.repo.list_jobs_by_company(company_id, page))
    }

    /// Reindex a single job after it was created or updated.
    pub fn reindex_job(&self, job_id: i64, cancel: &CancelToken) -> Result<SyncReport> {
        let job = self
            .repo
            .get_job(job_id)?
            .ok_or(JobSearchError::JobNotFound(job_id))?;
        let mut pending = Some(job);
        self.run(cancel, |_| Ok(pending.take().into_iter().collect()))
    }

    /// Drop a deleted job from the index. Removing an absent job is a no-op.
    pub fn remove_job(&self, job_id: i64) -> Result<bool> {
        let removed = self.client.delete(job_id)?;
        debug!(job_id, removed, "removed job from index");
        Ok(removed)
    }

    /// Build the document for one job, paging through all of its skills.
    pub fn project(&self, job: &Job) -> Result<JobDocument> {
        let company = self.repo.get_company(job.company_id)?;
        let skills = self.all_skills(job.id)?;
        build_document(job, company.as_ref(), &skills)
    }

    fn all_skills(&self, job_id: i64) -> Result<Vec<JobSkill>> {
        let mut skills = Vec::new();
        let mut page = Pagination::first(self.config.page_size);
        loop {
            let batch = self.repo.list_job_skills(job_id, page)?;
            if batch.is_empty() {
                return Ok(skills);
            }
            skills.extend(batch);
            page = page.next();
        }
    }

    fn run<F>(&self, cancel: &CancelToken, next_page: F) -> Result<SyncReport>
    where
        F: FnMut(Pagination) -> Result<Vec<Job>>,
    {
        let mut bulk = BulkIndexer::start(self.client, self.config.bulk(), cancel.clone())?;
        let mut skipped = Vec::new();

        let produced = self.produce(&mut bulk, &mut skipped, cancel, next_page);
        // Always drain the workers before reporting, even on error.
        let closed = bulk.close();

        let cancelled = match produced {
            Ok(()) => cancel.is_cancelled(),
            Err(JobSearchError::Cancelled) => true,
            Err(err) => {
                warn!(error = %err, "reindex aborted");
                return Err(err);
            }
        };
        let stats = closed?;

        info!(
            indexed = stats.indexed,
            failed = stats.failed.len(),
            skipped = skipped.len(),
            not_attempted = stats.not_attempted.len(),
            cancelled,
            "reindex finished"
        );
        Ok(SyncReport {
            stats,
            skipped,
            cancelled,
        })
    }

    fn produce<F>(
        &self,
        bulk: &mut BulkIndexer,
        skipped: &mut Vec<SkippedJob>,
        cancel: &CancelToken,
        mut next_page: F,
    ) -> Result<()>
    where
        F: FnMut(Pagination) -> Result<Vec<Job>>,
    {
        let mut page = Pagination::first(self.config.page_size);
        loop {
            if cancel.is_cancelled() {
                return Err(JobSearchError::Cancelled);
            }
            let jobs = next_page(page)?;
            if jobs.is_empty() {
                return Ok(());
            }
            debug!(offset = page.offset(), jobs = jobs.len(), "fetched job page");

            for job in &jobs {
                match self.project(job) {
                    Ok(doc) => bulk.add(doc)?,
                    Err(err @ JobSearchError::MissingCompany { .. }) => {
                        warn!(job_id = job.id, company_id = job.company_id, "skipping job without company");
                        skipped.push(SkippedJob {
                            job_id: job.id,
                            reason: err.to_string(),
                        });
                    }
                    Err(err) => return Err(err),
                }
            }
            page = page.next();
        }
    }
}

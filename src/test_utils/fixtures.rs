use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use tempfile::TempDir;

use crate::core::Pagination;
use crate::error::{JobSearchError, Result};
use crate::search::client::{IndexClient, IndexSession, ItemError};
use crate::search::document::JobDocument;
use crate::search::filters::{SearchCriteria, SearchResult};
use crate::storage::{Company, Database, Job, NewCompany, NewJob, SqliteJobRepository};

/// Test fixture providing an isolated directory for a database and an index.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.data_path.join("jobsearch.db")
    }

    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.data_path.join("index")
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}

// =============================================================================
// RELATIONAL SEED DATA
// =============================================================================

/// Insert a company named `name` in the "Software" industry.
pub fn seed_company(db: &Database, name: &str) -> Company {
    SqliteJobRepository::new(db)
        .create_company(&NewCompany {
            name: name.to_string(),
            industry: "Software".to_string(),
            location: "Berlin".to_string(),
        })
        .expect("seed company")
}

/// Insert a job with the given salary range and skills.
pub fn seed_job(
    db: &Database,
    company_id: i64,
    title: &str,
    salary: (i64, i64),
    skills: &[&str],
) -> Job {
    let repo = SqliteJobRepository::new(db);
    let job = repo
        .create_job(&NewJob {
            title: title.to_string(),
            company_id,
            description: format!("{title} role"),
            location: "Berlin".to_string(),
            salary_min: salary.0,
            salary_max: salary.1,
            requirements: "Team player".to_string(),
        })
        .expect("seed job");
    for skill in skills {
        repo.add_job_skill(job.id, skill).expect("seed job skill");
    }
    job
}

/// Remove a company row directly, leaving its jobs orphaned.
pub fn orphan_company(db: &Database, company_id: i64) {
    db.conn()
        .execute("DELETE FROM companies WHERE id = ?1", [company_id])
        .expect("delete company");
}

#[must_use]
pub fn sample_document(id: i64) -> JobDocument {
    JobDocument {
        id,
        title: format!("Job {id}"),
        industry: "Software".to_string(),
        company_name: "Acme".to_string(),
        description: "Build and operate services".to_string(),
        location: "Berlin".to_string(),
        salary_min: 40_000,
        salary_max: 60_000,
        requirements: "Rust".to_string(),
        job_skills: vec!["Rust".to_string()],
    }
}

// =============================================================================
// IN-MEMORY INDEX
// =============================================================================

/// [`IndexClient`] kept in a `BTreeMap`, with failure injection.
///
/// Upserts are staged per session and become visible on commit.
#[derive(Default)]
pub struct MemoryIndex {
    docs: Arc<Mutex<BTreeMap<i64, JobDocument>>>,
    failing: Arc<HashSet<i64>>,
    unreachable: bool,
    commits: Arc<AtomicUsize>,
}

impl MemoryIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject upserts for these job ids.
    #[must_use]
    pub fn failing_on(mut self, ids: impl IntoIterator<Item = i64>) -> Self {
        self.failing = Arc::new(ids.into_iter().collect());
        self
    }

    /// Refuse to open sessions.
    #[must_use]
    pub const fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.lock().is_empty()
    }

    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<i64, JobDocument> {
        self.docs.lock().clone()
    }
}

impl IndexClient for MemoryIndex {
    fn open_session(&self) -> Result<Box<dyn IndexSession>> {
        if self.unreachable {
            return Err(JobSearchError::IndexUnavailable(
                "memory index marked unreachable".to_string(),
            ));
        }
        Ok(Box::new(MemorySession {
            docs: Arc::clone(&self.docs),
            staged: Mutex::new(Vec::new()),
            failing: Arc::clone(&self.failing),
            commits: Arc::clone(&self.commits),
        }))
    }

    fn get(&self, job_id: i64) -> Result<Option<JobDocument>> {
        Ok(self.docs.lock().get(&job_id).cloned())
    }

    fn delete(&self, job_id: i64) -> Result<bool> {
        Ok(self.docs.lock().remove(&job_id).is_some())
    }

    fn search(&self, criteria: &SearchCriteria, page: Pagination) -> Result<Vec<SearchResult>> {
        let hits: Vec<SearchResult> = self
            .docs
            .lock()
            .values()
            .filter(|doc| criteria.matches(doc))
            .map(|doc| SearchResult::from_document(doc, 1.0))
            .collect();
        Ok(page.slice(&hits))
    }

    fn count(&self) -> Result<u64> {
        Ok(self.docs.lock().len() as u64)
    }
}

struct MemorySession {
    docs: Arc<Mutex<BTreeMap<i64, JobDocument>>>,
    staged: Mutex<Vec<JobDocument>>,
    failing: Arc<HashSet<i64>>,
    commits: Arc<AtomicUsize>,
}

impl IndexSession for MemorySession {
    fn upsert(&self, doc: &JobDocument) -> std::result::Result<(), ItemError> {
        if self.failing.contains(&doc.id) {
            return Err(ItemError::new(format!("injected failure for job {}", doc.id)));
        }
        self.staged.lock().push(doc.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let staged = std::mem::take(&mut *self.staged.lock());
        let mut docs = self.docs.lock();
        for doc in staged {
            docs.insert(doc.id, doc);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

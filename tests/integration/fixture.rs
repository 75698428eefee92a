use jobsearch::config::{IndexConfig, SyncConfig};
use jobsearch::search::JobIndex;
use jobsearch::storage::{Database, SqliteJobRepository};
use jobsearch::test_utils::UnitTestFixture;

/// SQLite database and on-disk tantivy index in one temp directory.
pub struct TestStores {
    pub fixture: UnitTestFixture,
    pub db: Database,
    pub index: JobIndex,
}

impl TestStores {
    pub fn new() -> Self {
        let fixture = UnitTestFixture::new();
        let db = Database::open(fixture.db_path()).expect("open database");
        let index = JobIndex::open(fixture.index_path(), &IndexConfig::default()).expect("open index");
        Self { fixture, db, index }
    }

    pub const fn repo(&self) -> SqliteJobRepository<'_> {
        SqliteJobRepository::new(&self.db)
    }

    /// Reopen the index from disk, as a fresh process would.
    pub fn reopen_index(&self) -> JobIndex {
        JobIndex::open(self.fixture.index_path(), &IndexConfig::default()).expect("reopen index")
    }
}

pub fn small_pages() -> SyncConfig {
    SyncConfig {
        workers: 3,
        queue_capacity: 2,
        page_size: 3,
        timeout_seconds: None,
    }
}

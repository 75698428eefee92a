use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{JobSearchError, Result};
use crate::search::bulk::{BulkConfig, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS};

/// Tantivy refuses writer budgets below this many bytes per thread.
const MIN_WRITER_HEAP_PER_THREAD: usize = 15_000_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

impl Config {
    pub fn load(explicit_path: Option<&Path>, root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("JOBSEARCH_CONFIG").ok().map(PathBuf::from));

        if let Some(path) = explicit {
            if let Some(patch) = Self::load_patch(&path)? {
                config.merge_patch(patch);
            }
        } else {
            if let Some(global) = Self::load_global()? {
                config.merge_patch(global);
            }
            if let Some(project) = Self::load_project(root)? {
                config.merge_patch(project);
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        let Some(dir) = dirs::config_dir() else {
            return Ok(None);
        };
        Self::load_patch(&dir.join("jobsearch/config.toml"))
    }

    fn load_project(root: &Path) -> Result<Option<ConfigPatch>> {
        Self::load_patch(&root.join("config.toml"))
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path).map_err(|err| {
            JobSearchError::Config(format!("read config {}: {err}", path.display()))
        })?;
        let patch = toml::from_str(&raw).map_err(|err| {
            JobSearchError::Config(format!("parse config {}: {err}", path.display()))
        })?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.storage {
            self.storage.merge(patch);
        }
        if let Some(patch) = patch.index {
            self.index.merge(patch);
        }
        if let Some(patch) = patch.sync {
            self.sync.merge(patch);
        }
        if let Some(patch) = patch.search {
            self.search.merge(patch);
        }
        if let Some(patch) = patch.matching {
            self.matching.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("JOBSEARCH_DATABASE_PATH") {
            self.storage.database_path = Some(PathBuf::from(value));
        }

        if let Some(value) = env_string("JOBSEARCH_INDEX_PATH") {
            self.index.path = Some(PathBuf::from(value));
        }
        if let Some(value) = env_usize("JOBSEARCH_INDEX_WRITER_HEAP_BYTES")? {
            self.index.writer_heap_bytes = value;
        }
        if let Some(value) = env_usize("JOBSEARCH_INDEX_WRITER_THREADS")? {
            self.index.writer_threads = value;
        }

        if let Some(value) = env_usize("JOBSEARCH_SYNC_WORKERS")? {
            self.sync.workers = value;
        }
        if let Some(value) = env_usize("JOBSEARCH_SYNC_QUEUE_CAPACITY")? {
            self.sync.queue_capacity = value;
        }
        if let Some(value) = env_usize("JOBSEARCH_SYNC_PAGE_SIZE")? {
            self.sync.page_size = value;
        }
        if let Some(value) = env_u64("JOBSEARCH_SYNC_TIMEOUT_SECONDS")? {
            self.sync.timeout_seconds = Some(value);
        }

        if let Some(value) = env_usize("JOBSEARCH_SEARCH_MAX_PAGE_SIZE")? {
            self.search.max_page_size = value;
        }
        if let Some(value) = env_usize("JOBSEARCH_SEARCH_DEFAULT_LIMIT")? {
            self.search.default_limit = value;
        }

        if let Some(value) = env_usize("JOBSEARCH_MATCHING_MAX_PAGE_SIZE")? {
            self.matching.max_page_size = value;
        }
        if let Some(value) = env_usize("JOBSEARCH_MATCHING_DEFAULT_LIMIT")? {
            self.matching.default_limit = value;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.sync.workers == 0 {
            return Err(JobSearchError::Config("sync.workers must be at least 1".into()));
        }
        if self.sync.queue_capacity == 0 {
            return Err(JobSearchError::Config(
                "sync.queue_capacity must be at least 1".into(),
            ));
        }
        if self.sync.page_size == 0 {
            return Err(JobSearchError::Config("sync.page_size must be at least 1".into()));
        }
        if self.index.writer_threads == 0 {
            return Err(JobSearchError::Config(
                "index.writer_threads must be at least 1".into(),
            ));
        }
        if self.index.writer_heap_bytes < MIN_WRITER_HEAP_PER_THREAD * self.index.writer_threads {
            return Err(JobSearchError::Config(format!(
                "index.writer_heap_bytes must be at least {} per writer thread",
                MIN_WRITER_HEAP_PER_THREAD
            )));
        }
        if self.search.default_limit > self.search.max_page_size {
            return Err(JobSearchError::Config(
                "search.default_limit exceeds search.max_page_size".into(),
            ));
        }
        if self.matching.default_limit > self.matching.max_page_size {
            return Err(JobSearchError::Config(
                "matching.default_limit exceeds matching.max_page_size".into(),
            ));
        }
        Ok(())
    }

    /// Database file, relative paths resolved against `root`.
    #[must_use]
    pub fn database_path(&self, root: &Path) -> PathBuf {
        resolve(root, self.storage.database_path.as_deref(), "jobsearch.db")
    }

    /// Index directory, relative paths resolved against `root`.
    #[must_use]
    pub fn index_path(&self, root: &Path) -> PathBuf {
        resolve(root, self.index.path.as_deref(), "index")
    }
}

fn resolve(root: &Path, configured: Option<&Path>, default: &str) -> PathBuf {
    match configured {
        Some(path) if path.is_absolute() => path.to_path_buf(),
        Some(path) => root.join(path),
        None => root.join(default),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    fn merge(&mut self, patch: StoragePatch) {
        if let Some(value) = patch.database_path {
            self.database_path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_writer_heap_bytes")]
    pub writer_heap_bytes: usize,
    #[serde(default = "default_writer_threads")]
    pub writer_threads: usize,
}

const fn default_writer_heap_bytes() -> usize {
    50_000_000
}

const fn default_writer_threads() -> usize {
    1
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: None,
            writer_heap_bytes: default_writer_heap_bytes(),
            writer_threads: default_writer_threads(),
        }
    }
}

impl IndexConfig {
    fn merge(&mut self, patch: IndexPatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
        if let Some(value) = patch.writer_heap_bytes {
            self.writer_heap_bytes = value;
        }
        if let Some(value) = patch.writer_threads {
            self.writer_threads = value;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

const fn default_workers() -> usize {
    DEFAULT_WORKERS
}

const fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

const fn default_page_size() -> usize {
    100
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            queue_capacity: default_queue_capacity(),
            page_size: default_page_size(),
            timeout_seconds: None,
        }
    }
}

impl SyncConfig {
    #[must_use]
    pub const fn bulk(&self) -> BulkConfig {
        BulkConfig {
            workers: self.workers,
            queue_capacity: self.queue_capacity,
        }
    }

    fn merge(&mut self, patch: SyncPatch) {
        if let Some(value) = patch.workers {
            self.workers = value;
        }
        if let Some(value) = patch.queue_capacity {
            self.queue_capacity = value;
        }
        if let Some(value) = patch.page_size {
            self.page_size = value;
        }
        if let Some(value) = patch.timeout_seconds {
            self.timeout_seconds = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

const fn default_max_page_size() -> usize {
    100
}

const fn default_limit() -> usize {
    20
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            default_limit: default_limit(),
        }
    }
}

impl SearchConfig {
    fn merge(&mut self, patch: PagePatch) {
        if let Some(value) = patch.max_page_size {
            self.max_page_size = value;
        }
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    #[serde(default = "default_max_page_size")]
    pub max_page_size: usize,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_page_size: default_max_page_size(),
            default_limit: default_limit(),
        }
    }
}

impl MatchingConfig {
    fn merge(&mut self, patch: PagePatch) {
        if let Some(value) = patch.max_page_size {
            self.max_page_size = value;
        }
        if let Some(value) = patch.default_limit {
            self.default_limit = value;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    storage: Option<StoragePatch>,
    index: Option<IndexPatch>,
    sync: Option<SyncPatch>,
    search: Option<PagePatch>,
    matching: Option<PagePatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StoragePatch {
    database_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IndexPatch {
    path: Option<PathBuf>,
    writer_heap_bytes: Option<usize>,
    writer_threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct SyncPatch {
    workers: Option<usize>,
    queue_capacity: Option<usize>,
    page_size: Option<usize>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PagePatch {
    max_page_size: Option<usize>,
    default_limit: Option<usize>,
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<usize>().map(Some).map_err(|err| {
            JobSearchError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(value) => value.parse::<u64>().map(Some).map_err(|err| {
            JobSearchError::Config(format!("invalid {key} value {value}: {err}"))
        }),
        Err(_) => Ok(None),
    }
}

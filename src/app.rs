use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::error::{JobSearchError, Result};
use crate::search::JobIndex;
use crate::storage::Database;
use crate::utils::CancelToken;

/// Handles shared by every command: opened once, reused everywhere.
pub struct AppContext {
    pub root: PathBuf,
    pub config: Config,
    pub db: Arc<Database>,
    pub index: Arc<JobIndex>,
    pub robot_mode: bool,
    pub verbosity: u8,
}

impl AppContext {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let root = Self::find_root()?;
        let config = Config::load(cli.config.as_deref(), &root)?;
        Self::open(root, config, cli.robot, cli.verbose)
    }

    /// Open the relational store and the index for `root`.
    pub fn open(root: PathBuf, config: Config, robot_mode: bool, verbosity: u8) -> Result<Self> {
        let db = Database::open(config.database_path(&root))?;
        let index = JobIndex::open(config.index_path(&root), &config.index)?;
        Ok(Self {
            root,
            config,
            db: Arc::new(db),
            index: Arc::new(index),
            robot_mode,
            verbosity,
        })
    }

    /// Cancellation token for a sync run, armed with the configured deadline.
    #[must_use]
    pub fn sync_cancel_token(&self) -> CancelToken {
        self.config
            .sync
            .timeout_seconds
            .map_or_else(CancelToken::new, |secs| {
                CancelToken::with_timeout(Duration::from_secs(secs))
            })
    }

    fn find_root() -> Result<PathBuf> {
        if let Ok(root) = std::env::var("JOBSEARCH_ROOT") {
            return Ok(PathBuf::from(root));
        }
        let cwd = std::env::current_dir()?;
        if let Some(found) = find_upwards(&cwd, ".jobsearch") {
            return Ok(found);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| JobSearchError::MissingConfig("data directory not found".to_string()))?;
        Ok(data_dir.join("jobsearch"))
    }
}

fn find_upwards(start: &Path, name: &str) -> Option<PathBuf> {
    let mut current = Some(start);
    while let Some(dir) = current {
        let candidate = dir.join(name);
        if candidate.is_dir() {
            return Some(candidate);
        }
        current = dir.parent();
    }
    None
}

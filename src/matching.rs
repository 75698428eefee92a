//! Skill matching against the relational store
//!
//! Ranks jobs by how many of the requested skills they declare. This path
//! reads job skills straight from the relational store because overlap needs
//! exact set semantics. Labels are compared case-sensitively; normalizing
//! them is up to the caller.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Pagination;
use crate::error::Result;
use crate::storage::JobRepository;

/// A job and the number of requested skills it shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub job_id: i64,
    pub overlap: u32,
}

pub struct SkillMatcher<'a> {
    repo: &'a dyn JobRepository,
    max_page_size: usize,
}

impl<'a> SkillMatcher<'a> {
    #[must_use]
    pub fn new(repo: &'a dyn JobRepository, max_page_size: usize) -> Self {
        Self {
            repo,
            max_page_size,
        }
    }

    /// Jobs sharing at least one of `skills`, ordered by overlap descending
    /// then job id ascending, windowed by `limit`/`offset`.
    ///
    /// Paging is validated before any query runs. An empty skill set matches
    /// nothing.
    pub fn match_skills(&self, skills: &[String], limit: i64, offset: i64) -> Result<Vec<MatchResult>> {
        let page = Pagination::new(limit, offset, self.max_page_size)?;
        let skills = distinct_skills(skills);
        if skills.is_empty() || page.limit() == 0 {
            return Ok(Vec::new());
        }
        debug!(skills = skills.len(), limit = page.limit(), offset = page.offset(), "skill match");

        let rows = self.repo.list_jobs_by_skills(&skills, page)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.overlap > 0)
            .map(|row| MatchResult {
                job_id: row.job_id,
                overlap: row.overlap,
            })
            .collect())
    }
}

/// Drop blank labels and duplicates, keeping first-seen order.
fn distinct_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .filter(|s| !s.is_empty())
        .unique()
        .cloned()
        .collect()
}

//! Filtered job search over the index
//!
//! Criteria are optional and AND-combined: a document must satisfy every
//! supplied criterion. Text criteria match on lowercase alphanumeric tokens,
//! the same way the index tokenizes them. Salary bounds compare against the
//! job's own range: `salary_max >= floor` and `salary_min <= ceiling`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::Pagination;
use crate::error::{JobSearchError, Result};
use crate::search::client::IndexClient;
use crate::search::document::JobDocument;

/// Optional filters for a job search. `None`, empty strings and zero salary
/// bounds impose no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    /// Fragment matched against title and description.
    pub text: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
    /// Lowest acceptable salary; matches jobs whose `salary_max` reaches it.
    pub salary_floor: Option<i64>,
    /// Highest acceptable salary; matches jobs whose `salary_min` is at or below it.
    pub salary_ceiling: Option<i64>,
}

impl SearchCriteria {
    /// Drop blank and zero criteria and reject impossible ones.
    pub fn normalized(self) -> Result<Self> {
        let salary_floor = normalize_salary("salary floor", self.salary_floor)?;
        let salary_ceiling = normalize_salary("salary ceiling", self.salary_ceiling)?;
        if let (Some(floor), Some(ceiling)) = (salary_floor, salary_ceiling) {
            if floor > ceiling {
                return Err(JobSearchError::InvalidQuery(format!(
                    "salary floor {floor} is above salary ceiling {ceiling}"
                )));
            }
        }

        Ok(Self {
            text: normalize_text(self.text),
            industry: normalize_text(self.industry),
            location: normalize_text(self.location),
            salary_floor,
            salary_ceiling,
        })
    }

    /// True when no criterion constrains the result.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.industry.is_none()
            && self.location.is_none()
            && self.salary_floor.is_none()
            && self.salary_ceiling.is_none()
    }

    /// Whether `doc` satisfies every supplied criterion.
    #[must_use]
    pub fn matches(&self, doc: &JobDocument) -> bool {
        if let Some(text) = &self.text {
            let mut haystack = tokenize(&doc.title);
            haystack.extend(tokenize(&doc.description));
            if !contains_all(&haystack, &tokenize(text)) {
                return false;
            }
        }
        if let Some(industry) = &self.industry {
            if !contains_all(&tokenize(&doc.industry), &tokenize(industry)) {
                return false;
            }
        }
        if let Some(location) = &self.location {
            if !contains_all(&tokenize(&doc.location), &tokenize(location)) {
                return false;
            }
        }
        if self.salary_floor.is_some_and(|floor| doc.salary_max < floor) {
            return false;
        }
        if self
            .salary_ceiling
            .is_some_and(|ceiling| doc.salary_min > ceiling)
        {
            return false;
        }
        true
    }
}

/// One scored hit with enough fields to render a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub job_id: i64,
    pub score: f32,
    pub title: String,
    pub company_name: String,
    pub industry: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
}

impl SearchResult {
    #[must_use]
    pub fn from_document(doc: &JobDocument, score: f32) -> Self {
        Self {
            job_id: doc.id,
            score,
            title: doc.title.clone(),
            company_name: doc.company_name.clone(),
            industry: doc.industry.clone(),
            location: doc.location.clone(),
            salary_min: doc.salary_min,
            salary_max: doc.salary_max,
        }
    }
}

/// Validates criteria and paging, then runs one query against the index.
pub struct FilteredSearch<'a> {
    client: &'a dyn IndexClient,
    max_page_size: usize,
}

impl<'a> FilteredSearch<'a> {
    #[must_use]
    pub fn new(client: &'a dyn IndexClient, max_page_size: usize) -> Self {
        Self {
            client,
            max_page_size,
        }
    }

    /// Search with raw caller-supplied paging. Parameter errors are returned
    /// before the index is touched; no matches yield an empty list.
    pub fn search(
        &self,
        criteria: SearchCriteria,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SearchResult>> {
        let page = Pagination::new(limit, offset, self.max_page_size)?;
        let criteria = criteria.normalized()?;
        debug!(?criteria, limit = page.limit(), offset = page.offset(), "filtered search");
        if page.limit() == 0 {
            return Ok(Vec::new());
        }
        self.client.search(&criteria, page)
    }
}

/// Tokens of 40 bytes or more are dropped by the index's default analyzer.
pub const MAX_TOKEN_BYTES: usize = 40;

/// Lowercase alphanumeric tokens, matching the index's default tokenizer.
#[must_use]
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty() && token.len() < MAX_TOKEN_BYTES)
        .map(str::to_lowercase)
        .collect()
}

fn contains_all(haystack: &[String], needles: &[String]) -> bool {
    needles.iter().all(|needle| haystack.contains(needle))
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !tokenize(v).is_empty())
}

fn normalize_salary(name: &str, value: Option<i64>) -> Result<Option<i64>> {
    match value {
        Some(v) if v < 0 => Err(JobSearchError::InvalidQuery(format!(
            "{name} must not be negative (got {v})"
        ))),
        Some(0) | None => Ok(None),
        Some(v) => Ok(Some(v)),
    }
}

//! Denormalized job documents and the projection that builds them.

use serde::{Deserialize, Serialize};

use crate::error::{JobSearchError, Result};
use crate::storage::{Company, Job, JobSkill};

/// Search-index projection of a job with its company and skills embedded.
///
/// Keyed by `id`; a sync pass always replaces the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDocument {
    pub id: i64,
    pub title: String,
    pub industry: String,
    pub company_name: String,
    pub description: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub requirements: String,
    pub job_skills: Vec<String>,
}

impl JobDocument {
    /// Canonical JSON form stored alongside the indexed fields.
    pub fn to_source(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_source(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Project a job, its company and its full skill list into one document.
///
/// Fails with [`JobSearchError::MissingCompany`] when the company could not
/// be resolved or does not own the job; the caller must skip that job.
pub fn build_document(
    job: &Job,
    company: Option<&Company>,
    skills: &[JobSkill],
) -> Result<JobDocument> {
    let company = company
        .filter(|company| company.id == job.company_id)
        .ok_or(JobSearchError::MissingCompany {
            job_id: job.id,
            company_id: job.company_id,
        })?;

    Ok(JobDocument {
        id: job.id,
        title: job.title.clone(),
        industry: job.industry.clone(),
        company_name: company.name.clone(),
        description: job.description.clone(),
        location: job.location.clone(),
        salary_min: job.salary_min,
        salary_max: job.salary_max,
        requirements: job.requirements.clone(),
        job_skills: skills.iter().map(|s| s.skill.clone()).collect(),
    })
}

//! Canonical relational records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub industry: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: i64,
    pub title: String,
    /// Copied from the owning company when the job is created.
    pub industry: String,
    pub company_id: i64,
    pub description: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub requirements: String,
    pub created_at: DateTime<Utc>,
}

/// One (job, skill) association row. Duplicate pairs are allowed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSkill {
    pub id: i64,
    pub job_id: i64,
    pub skill: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCompany {
    pub name: String,
    pub industry: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJob {
    pub title: String,
    pub company_id: i64,
    pub description: String,
    pub location: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub requirements: String,
}

/// A job id together with how many queried skills it declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillOverlapRow {
    pub job_id: i64,
    pub overlap: u32,
}

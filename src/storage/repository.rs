//! Relational job repository
//!
//! The canonical store for jobs, companies and job skills. The indexing
//! pipeline and the skill matcher consume it through [`JobRepository`];
//! every paged read takes a validated [`Pagination`] and callers page until
//! an empty page comes back.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::core::Pagination;
use crate::error::{JobSearchError, Result};
use crate::storage::Database;
use crate::storage::models::{Company, Job, JobSkill, NewCompany, NewJob, SkillOverlapRow};

/// Read operations the search core needs from the relational store.
pub trait JobRepository: Send + Sync {
    fn get_job(&self, job_id: i64) -> Result<Option<Job>>;

    fn get_company(&self, company_id: i64) -> Result<Option<Company>>;

    /// All jobs ordered by id.
    fn list_jobs(&self, page: Pagination) -> Result<Vec<Job>>;

    fn list_jobs_by_company(&self, company_id: i64, page: Pagination) -> Result<Vec<Job>>;

    /// Skill rows of one job in insertion order.
    fn list_job_skills(&self, job_id: i64, page: Pagination) -> Result<Vec<JobSkill>>;

    /// Job ids declaring at least one of `skills`, with the number of
    /// distinct queried skills each declares, ordered by that count
    /// descending then job id ascending.
    fn list_jobs_by_skills(&self, skills: &[String], page: Pagination)
    -> Result<Vec<SkillOverlapRow>>;
}

const JOB_COLUMNS: &str = "id, title, industry, company_id, description, location, \
                           salary_min, salary_max, requirements, created_at";

/// [`JobRepository`] backed by the SQLite [`Database`].
pub struct SqliteJobRepository<'a> {
    db: &'a Database,
}

impl<'a> SqliteJobRepository<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    // =========================================================================
    // WRITES
    // =========================================================================

    pub fn create_company(&self, company: &NewCompany) -> Result<Company> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO companies (name, industry, location) VALUES (?1, ?2, ?3)",
            params![company.name, company.industry, company.location],
        )?;
        Ok(Company {
            id: conn.last_insert_rowid(),
            name: company.name.clone(),
            industry: company.industry.clone(),
            location: company.location.clone(),
        })
    }

    /// Insert a job. Its industry is taken from the owning company.
    pub fn create_job(&self, job: &NewJob) -> Result<Job> {
        if job.salary_min > job.salary_max {
            return Err(JobSearchError::InvalidQuery(format!(
                "salary_min {} exceeds salary_max {}",
                job.salary_min, job.salary_max
            )));
        }
        let company = self
            .get_company(job.company_id)?
            .ok_or(JobSearchError::MissingCompany {
                job_id: 0,
                company_id: job.company_id,
            })?;
        let created_at = Utc::now();

        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO jobs (title, industry, company_id, description, location,
                               salary_min, salary_max, requirements, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                job.title,
                company.industry,
                job.company_id,
                job.description,
                job.location,
                job.salary_min,
                job.salary_max,
                job.requirements,
                created_at.to_rfc3339(),
            ],
        )?;
        Ok(Job {
            id: conn.last_insert_rowid(),
            title: job.title.clone(),
            industry: company.industry,
            company_id: job.company_id,
            description: job.description.clone(),
            location: job.location.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            requirements: job.requirements.clone(),
            created_at,
        })
    }

    pub fn add_job_skill(&self, job_id: i64, skill: &str) -> Result<JobSkill> {
        let conn = self.db.conn();
        conn.execute(
            "INSERT INTO job_skills (job_id, skill) VALUES (?1, ?2)",
            params![job_id, skill],
        )?;
        Ok(JobSkill {
            id: conn.last_insert_rowid(),
            job_id,
            skill: skill.to_string(),
        })
    }

    /// Delete a job and its skill rows. Returns whether a job was removed.
    pub fn delete_job(&self, job_id: i64) -> Result<bool> {
        let conn = self.db.conn();
        conn.execute("DELETE FROM job_skills WHERE job_id = ?1", [job_id])?;
        let removed = conn.execute("DELETE FROM jobs WHERE id = ?1", [job_id])?;
        Ok(removed > 0)
    }
}

impl JobRepository for SqliteJobRepository<'_> {
    fn get_job(&self, job_id: i64) -> Result<Option<Job>> {
        let conn = self.db.conn();
        let job = conn
            .query_row(
                &format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ?1"),
                [job_id],
                job_from_row,
            )
            .optional()?;
        Ok(job)
    }

    fn get_company(&self, company_id: i64) -> Result<Option<Company>> {
        let conn = self.db.conn();
        let company = conn
            .query_row(
                "SELECT id, name, industry, location FROM companies WHERE id = ?1",
                [company_id],
                |row| {
                    Ok(Company {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        industry: row.get(2)?,
                        location: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(company)
    }

    fn list_jobs(&self, page: Pagination) -> Result<Vec<Job>> {
        let (limit, offset) = page.sql_params();
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs ORDER BY id LIMIT ?1 OFFSET ?2"
        ))?;
        let jobs = stmt
            .query_map(params![limit, offset], job_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn list_jobs_by_company(&self, company_id: i64, page: Pagination) -> Result<Vec<Job>> {
        let (limit, offset) = page.sql_params();
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE company_id = ?1
             ORDER BY id LIMIT ?2 OFFSET ?3"
        ))?;
        let jobs = stmt
            .query_map(params![company_id, limit, offset], job_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(jobs)
    }

    fn list_job_skills(&self, job_id: i64, page: Pagination) -> Result<Vec<JobSkill>> {
        let (limit, offset) = page.sql_params();
        let conn = self.db.conn();
        let mut stmt = conn.prepare(
            "SELECT id, job_id, skill FROM job_skills WHERE job_id = ?1
             ORDER BY id LIMIT ?2 OFFSET ?3",
        )?;
        let skills = stmt
            .query_map(params![job_id, limit, offset], |row| {
                Ok(JobSkill {
                    id: row.get(0)?,
                    job_id: row.get(1)?,
                    skill: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(skills)
    }

    fn list_jobs_by_skills(
        &self,
        skills: &[String],
        page: Pagination,
    ) -> Result<Vec<SkillOverlapRow>> {
        if skills.is_empty() {
            return Ok(Vec::new());
        }
        let (limit, offset) = page.sql_params();
        let placeholders = vec!["?"; skills.len()].join(", ");
        let sql = format!(
            "SELECT job_id, COUNT(DISTINCT skill) AS overlap
             FROM job_skills
             WHERE skill IN ({placeholders})
             GROUP BY job_id
             ORDER BY overlap DESC, job_id ASC
             LIMIT ? OFFSET ?"
        );

        let mut values: Vec<rusqlite::types::Value> = skills
            .iter()
            .map(|s| rusqlite::types::Value::Text(s.clone()))
            .collect();
        values.push(rusqlite::types::Value::Integer(limit));
        values.push(rusqlite::types::Value::Integer(offset));

        let conn = self.db.conn();
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(values), |row| {
                Ok(SkillOverlapRow {
                    job_id: row.get(0)?,
                    overlap: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }
}

fn job_from_row(row: &Row<'_>) -> rusqlite::Result<Job> {
    let created_raw: String = row.get(9)?;
    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(9, Type::Text, Box::new(err)))?
        .with_timezone(&Utc);
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        industry: row.get(2)?,
        company_id: row.get(3)?,
        description: row.get(4)?,
        location: row.get(5)?,
        salary_min: row.get(6)?,
        salary_max: row.get(7)?,
        requirements: row.get(8)?,
        created_at,
    })
}

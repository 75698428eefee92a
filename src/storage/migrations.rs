//! Schema migrations for the relational job store

use rusqlite::Connection;

use crate::error::Result;

pub const SCHEMA_VERSION: u32 = 1;

const MIGRATIONS: &[&str] = &[
    // v1: companies, jobs, job skills
    r"
    CREATE TABLE IF NOT EXISTS companies (
        id          INTEGER PRIMARY KEY AUTOINCREMENT,
        name        TEXT NOT NULL UNIQUE,
        industry    TEXT NOT NULL,
        location    TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS jobs (
        id           INTEGER PRIMARY KEY AUTOINCREMENT,
        title        TEXT NOT NULL,
        industry     TEXT NOT NULL,
        company_id   INTEGER NOT NULL,
        description  TEXT NOT NULL,
        location     TEXT NOT NULL,
        salary_min   INTEGER NOT NULL,
        salary_max   INTEGER NOT NULL,
        requirements TEXT NOT NULL,
        created_at   TEXT NOT NULL,
        CHECK (salary_min <= salary_max)
    );

    CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs(company_id);

    CREATE TABLE IF NOT EXISTS job_skills (
        id      INTEGER PRIMARY KEY AUTOINCREMENT,
        job_id  INTEGER NOT NULL REFERENCES jobs(id) ON DELETE CASCADE,
        skill   TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_job_skills_job ON job_skills(job_id);
    CREATE INDEX IF NOT EXISTS idx_job_skills_skill ON job_skills(skill);
    ",
];

/// Apply pending migrations and return the resulting schema version.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let version = u32::try_from(idx + 1).unwrap_or(u32::MAX);
        if version <= current {
            continue;
        }
        tracing::debug!(version, "applying schema migration");
        conn.execute_batch(sql)?;
        conn.execute_batch(&format!("PRAGMA user_version = {version};"))?;
    }
    Ok(SCHEMA_VERSION)
}

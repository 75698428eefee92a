//! Storage layer for jobsearch
//!
//! SQLite is the source of truth for jobs, companies and job skills. The
//! search index is derived from it and can always be rebuilt.

pub mod migrations;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use models::{Company, Job, JobSkill, NewCompany, NewJob, SkillOverlapRow};
pub use repository::{JobRepository, SqliteJobRepository};
pub use sqlite::Database;

//! jobsearch reindex - Push jobs from the database into the search index

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_json, robot_ok, robot_partial};
use crate::error::{JobSearchError, Result};
use crate::search::{IndexSynchronizer, SyncReport};
use crate::storage::SqliteJobRepository;

#[derive(Args, Debug)]
pub struct ReindexArgs {
    /// Reindex a single job (after insert or update)
    #[arg(long, conflicts_with = "company")]
    pub job: Option<i64>,

    /// Reindex every job of one company
    #[arg(long)]
    pub company: Option<i64>,

    /// Number of indexing workers (overrides config)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Jobs fetched per database page (overrides config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

pub fn run(ctx: &AppContext, args: &ReindexArgs) -> Result<()> {
    let mut config = ctx.config.sync;
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(page_size) = args.page_size {
        config.page_size = page_size;
    }
    if config.page_size == 0 {
        return Err(JobSearchError::InvalidQuery(
            "--page-size must be at least 1".to_string(),
        ));
    }

    let repo = SqliteJobRepository::new(&ctx.db);
    let sync = IndexSynchronizer::new(&repo, ctx.index.as_ref(), config);
    let cancel = ctx.sync_cancel_token();

    let report = match (args.job, args.company) {
        (Some(job_id), _) => sync.reindex_job(job_id, &cancel)?,
        (None, Some(company_id)) => sync.reindex_company(company_id, &cancel)?,
        (None, None) => sync.reindex_all(&cancel)?,
    };

    if ctx.robot_mode {
        emit_report_robot(&report)
    } else {
        emit_report_human(&report);
        Ok(())
    }
}

fn emit_report_robot(report: &SyncReport) -> Result<()> {
    let failed = report.stats.num_failed() + report.skipped.len() as u64;
    if failed == 0 && !report.cancelled {
        emit_json(&robot_ok(report))
    } else {
        emit_json(&robot_partial(report, report.stats.indexed, failed))
    }
}

fn emit_report_human(report: &SyncReport) {
    let mut layout = HumanLayout::new();
    layout
        .kv("indexed", report.stats.indexed.to_string().green())
        .kv("failed", report.stats.failed.len())
        .kv("skipped", report.skipped.len())
        .kv("not attempted", report.stats.not_attempted.len());
    println!("{}", layout.build());

    for failure in &report.stats.failed {
        println!("  {} job {}: {}", "failed".red(), failure.job_id, failure.error);
    }
    for skipped in &report.skipped {
        println!("  {} job {}: {}", "skipped".yellow(), skipped.job_id, skipped.reason);
    }
    if report.cancelled {
        println!("{}", "Run cancelled before completion".yellow());
    }
}

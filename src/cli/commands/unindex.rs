//! jobsearch unindex - Drop a job's document from the search index

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok};
use crate::error::Result;
use crate::search::IndexSynchronizer;
use crate::storage::SqliteJobRepository;

#[derive(Args, Debug)]
pub struct UnindexArgs {
    /// Job id to remove
    pub job_id: i64,
}

pub fn run(ctx: &AppContext, args: &UnindexArgs) -> Result<()> {
    let repo = SqliteJobRepository::new(&ctx.db);
    let removed = IndexSynchronizer::new(&repo, ctx.index.as_ref(), ctx.config.sync)
        .remove_job(args.job_id)?;

    if ctx.robot_mode {
        emit_json(&robot_ok(serde_json::json!({
            "job_id": args.job_id,
            "removed": removed,
        })))
    } else {
        if removed {
            println!("Removed job {} from the index", args.job_id);
        } else {
            println!("Job {} was not indexed", args.job_id);
        }
        Ok(())
    }
}

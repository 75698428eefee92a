//! jobsearch match - Rank jobs by overlap with a skill set

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok};
use crate::error::Result;
use crate::matching::SkillMatcher;
use crate::storage::{JobRepository, SqliteJobRepository};

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Skill labels (case-sensitive); repeat or separate with commas
    #[arg(long = "skill", short = 's', value_delimiter = ',')]
    pub skills: Vec<String>,

    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

pub fn run(ctx: &AppContext, args: &MatchArgs) -> Result<()> {
    let repo = SqliteJobRepository::new(&ctx.db);
    let limit = args
        .limit
        .unwrap_or_else(|| i64::try_from(ctx.config.matching.default_limit).unwrap_or(i64::MAX));

    let matches = SkillMatcher::new(&repo, ctx.config.matching.max_page_size)
        .match_skills(&args.skills, limit, args.offset)?;

    if ctx.robot_mode {
        return emit_json(&robot_ok(&matches));
    }

    if matches.is_empty() {
        println!("{}", "No jobs share these skills".yellow());
        return Ok(());
    }
    for m in &matches {
        let title = repo
            .get_job(m.job_id)?
            .map_or_else(|| "(deleted)".to_string(), |job| job.title);
        println!("{:>6}  {}  {}", m.job_id, title.bold(), format!("overlap {}", m.overlap).cyan());
    }
    Ok(())
}

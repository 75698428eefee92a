//! jobsearch search - Filtered search over indexed jobs

use clap::Args;
use colored::Colorize;

use crate::app::AppContext;
use crate::cli::output::{emit_json, robot_ok};
use crate::error::Result;
use crate::search::{FilteredSearch, SearchCriteria, SearchResult};

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Text matched against title and description
    #[arg(value_name = "TEXT")]
    pub text: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,

    #[arg(long)]
    pub location: Option<String>,

    /// Only jobs whose salary range reaches this amount
    #[arg(long)]
    pub salary_min: Option<i64>,

    /// Only jobs whose salary range starts at or below this amount
    #[arg(long)]
    pub salary_max: Option<i64>,

    #[arg(long, short = 'n', allow_negative_numbers = true)]
    pub limit: Option<i64>,

    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub offset: i64,
}

pub fn run(ctx: &AppContext, args: &SearchArgs) -> Result<()> {
    let criteria = SearchCriteria {
        text: args.text.clone(),
        industry: args.industry.clone(),
        location: args.location.clone(),
        salary_floor: args.salary_min,
        salary_ceiling: args.salary_max,
    };
    let limit = args
        .limit
        .unwrap_or_else(|| i64::try_from(ctx.config.search.default_limit).unwrap_or(i64::MAX));

    let results = FilteredSearch::new(ctx.index.as_ref(), ctx.config.search.max_page_size)
        .search(criteria, limit, args.offset)?;

    if ctx.robot_mode {
        emit_json(&robot_ok(&results))
    } else {
        print_results(&results);
        Ok(())
    }
}

fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("{}", "No matching jobs".yellow());
        return;
    }
    for hit in results {
        println!(
            "{:>6}  {}  {} · {} · {} ({}-{})  {}",
            hit.job_id,
            hit.title.bold(),
            hit.company_name,
            hit.industry,
            hit.location,
            hit.salary_min,
            hit.salary_max,
            format!("{:.3}", hit.score).dimmed(),
        );
    }
}

//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod index;
pub mod matching;
pub mod search;
pub mod unindex;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rebuild the search index from the job database
    Reindex(index::ReindexArgs),

    /// Remove a deleted job from the search index
    Unindex(unindex::UnindexArgs),

    /// Filtered search over indexed jobs
    Search(search::SearchArgs),

    /// Rank jobs by overlap with a skill set
    Match(matching::MatchArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Reindex(args) => index::run(ctx, args),
        Commands::Unindex(args) => unindex::run(ctx, args),
        Commands::Search(args) => search::run(ctx, args),
        Commands::Match(args) => matching::run(ctx, args),
    }
}

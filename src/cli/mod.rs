//! Command-line interface components
//!
//! This module contains CLI-specific code for the Energy Fetcher tools:
//! argument parsing and the per-command pipeline handlers.

pub mod args;
pub mod commands;

pub use args::{
    ApiSplitArgs, Cli, Commands, FetchManyArgs, FetchOneArgs, FlattenArgs, GlobalArgs,
    PortfolioArgs, SplitArgs, SummaryArgs,
};
pub use commands::{
    handle_api_split, handle_fetch_many, handle_fetch_one, handle_flatten, handle_portfolio,
    handle_split, handle_summary, write_summaries, CommandContext,
};

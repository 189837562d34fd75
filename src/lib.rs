pub mod assemble;
pub mod candidates;
pub mod classify;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod discover;
pub mod histogram;
pub mod io_utils;
pub mod merge_counts;
pub mod path;
pub mod table;
pub mod tables;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("bacdive_enums", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!("Parsed command line: {:?}", cli.command);
    match cli.command {
        Commands::Discover(args) => discover::execute(&args),
        Commands::MergeCounts(args) => merge_counts::execute(&args),
        Commands::Candidates(args) => candidates::execute(&args),
        Commands::Histogram(args) => histogram::execute(&args),
    }
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{
    ArgAction,
    Args,
};
use indicatif::{
    ProgressBar,
    ProgressStyle,
};
use log::LevelFilter;

#[derive(Args, Debug, Clone)]
pub(crate) struct UtilsArgs {
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        help = "Number of input files processed in parallel."
    )]
    pub threads: usize,

    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Verbosity level (repeat for more)."
    )]
    pub verbose: u8,

    #[arg(long, default_value_t = false, help = "Display progress bar.")]
    pub progress: bool,
}

impl UtilsArgs {
    pub fn setup(&self) -> anyhow::Result<()> {
        init_logger(self.verbose)
    }
}

fn init_logger(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    pretty_env_logger::formatted_timed_builder()
        .filter_level(level)
        .try_init()
        .context("Failed to set up logger")
}

pub fn init_pbar(total: u64) -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new(total);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}, ETA: {eta}] [{bar:40.cyan/blue}] {pos:>5.green}/{len:5} {msg}")?
            .progress_chars("#>-"),
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

pub fn init_spinner() -> anyhow::Result<ProgressBar> {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {pos:>7.green} {msg}")?,
    );
    progress_bar.set_message("Processing...");
    Ok(progress_bar)
}

/// Expands every pattern through the shell-style glob; patterns without a
/// match are kept verbatim so missing files surface as errors later.
pub fn expand_wildcards(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    for pattern in patterns {
        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = entries.flatten().peekable();
                if matched.peek().is_none() {
                    paths.push(PathBuf::from(pattern));
                }
                else {
                    paths.extend(matched);
                }
            },
            Err(_) => paths.push(PathBuf::from(pattern)),
        }
    }
    paths
}

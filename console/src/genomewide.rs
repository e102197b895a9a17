use std::path::{
    Path,
    PathBuf,
};
use std::process::exit;
use std::time::Instant;

use anyhow::Context as _;
use clap::Args;
use console::style;
use itertools::Itertools;
use log::{
    info,
    warn,
};
use methaplo::prelude::*;
use rayon::prelude::*;

use crate::utils::{
    expand_wildcards,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct GenomewideArgs {
    #[arg(
        short = 'i',
        long = "inputs",
        num_args = 1..,
        required = true,
        help = "Coordinate-sorted Bismark BAM files."
    )]
    inputs: Vec<String>,

    #[arg(
        short = 'o',
        long = "outputs",
        num_args = 1..,
        required = true,
        help = "Output score tables, one per input."
    )]
    outputs: Vec<PathBuf>,

    #[arg(
        short = 's',
        long = "bin-size",
        required = true,
        help = "Bin size in base pairs; must exceed the maximum read length."
    )]
    bin_size: u64,

    #[arg(
        long,
        default_value_t = false,
        help = "Treat paired-end mates as two independent fragments."
    )]
    split_mates: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Append methylation concordance columns."
    )]
    concordance: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Do not fail on records that contradict the sorted-input \
                precondition."
    )]
    no_sort_check: bool,

    #[arg(
        long,
        default_value_t = 1_000_000,
        help = "Log a progress line every this many records."
    )]
    log_every: u64,
}

impl GenomewideArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        let inputs = expand_wildcards(&self.inputs);
        self.validate(&inputs);

        info!(
            "{} input(s), bin size {}, {} worker(s)",
            inputs.len(),
            self.bin_size,
            utils.threads
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(utils.threads.clamp(1, inputs.len()))
            .build()
            .context("Failed to create thread pool")?;

        let failures: Vec<_> = pool.install(|| {
            inputs
                .par_iter()
                .zip(self.outputs.par_iter())
                .filter_map(|(input, output)| {
                    match self.run_single(input, output) {
                        Ok(()) => None,
                        Err(e) => {
                            // an aborted source must not leave a partial
                            // table behind
                            let _ = std::fs::remove_file(output);
                            Some((input.clone(), e))
                        },
                    }
                })
                .collect()
        });

        if !failures.is_empty() {
            for (input, e) in failures.iter() {
                eprintln!(
                    "{} {}: {:#}",
                    style("Failed").red(),
                    input.display(),
                    e
                );
            }
            anyhow::bail!("{} of {} source(s) failed", failures.len(), inputs.len());
        }
        Ok(())
    }

    fn run_single(
        &self,
        input: &Path,
        output: &Path,
    ) -> anyhow::Result<()> {
        let started = Instant::now();
        info!("{} -> {}", input.display(), output.display());

        let source = BamSource::with_options(input, 1024, self.log_every)?;
        if !source.sorted_declared() {
            warn!(
                "{}: proceeding although the header does not declare \
                 coordinate sorting",
                input.display()
            );
        }

        let aggregator = BinAggregator::new(source, self.bin_size)
            .with_merge_mates(!self.split_mates)
            .with_sort_check(!self.no_sort_check);
        let mut writer = ScoresWriter::from_path(output, self.concordance)?;

        let mut bins = 0u64;
        for scores in aggregator {
            writer.write_scores(&scores?)?;
            bins += 1;
        }
        writer.finish()?;

        info!(
            "{}: {} bin(s) in {:.2?}",
            input.display(),
            bins,
            started.elapsed()
        );
        Ok(())
    }

    fn validate(
        &self,
        inputs: &[PathBuf],
    ) {
        if self.bin_size == 0 {
            eprintln!("{}", style("Error: bin size must be positive.").red());
            exit(1);
        }
        if inputs.len() != self.outputs.len() {
            eprintln!(
                "{}",
                style(format!(
                    "Error: {} input(s) but {} output(s).",
                    inputs.len(),
                    self.outputs.len()
                ))
                .red()
            );
            exit(1);
        }
        for input in inputs.iter() {
            if !input.exists() {
                eprintln!(
                    "Error: input file {} not found.",
                    style(input.display()).red()
                );
                exit(1);
            }
            if !input.is_file() {
                eprintln!(
                    "Error: input {} is not a file.",
                    style(input.display()).red()
                );
                exit(1);
            }
        }
        for output in self.outputs.iter() {
            if output.is_dir() {
                eprintln!(
                    "Error: output {} is a directory.",
                    style(output.display()).red()
                );
                exit(1);
            }
        }
        if let Some(duplicate) = self.outputs.iter().duplicates().next() {
            eprintln!(
                "Error: output {} is given more than once.",
                style(duplicate.display()).red()
            );
            exit(1);
        }
    }
}

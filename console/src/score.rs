use std::path::PathBuf;
use std::process::exit;

use clap::Args;
use console::style;
use indicatif::ProgressBar;
use log::info;
use methaplo::prelude::*;

use crate::utils::{
    init_spinner,
    UtilsArgs,
};

#[derive(Args, Debug, Clone)]
pub(crate) struct ScoreArgs {
    #[arg(
        short = 'i',
        long,
        required = true,
        help = "Extracted read-info table (chromosome, start, end, calls)."
    )]
    input: PathBuf,

    #[arg(
        short = 'o',
        long,
        required = true,
        help = "Path for the generated score table."
    )]
    output: PathBuf,

    #[arg(
        long,
        default_value_t = false,
        help = "Treat paired-end mates as two independent fragments."
    )]
    split_mates: bool,
}

impl ScoreArgs {
    pub fn run(
        &self,
        utils: &UtilsArgs,
    ) -> anyhow::Result<()> {
        self.validate();
        info!("{} -> {}", self.input.display(), self.output.display());

        let source = TableSource::from_path(&self.input)?;
        // per-record scoring always reports the concordance columns
        let mut writer = ScoresWriter::from_path(&self.output, true)?;

        let pbar = if utils.progress {
            init_spinner()?
        }
        else {
            ProgressBar::hidden()
        };

        let mut rows = 0u64;
        for record in source {
            let record = record?;
            let fragments = ContextFragments::from_raw(
                record.calls(),
                !self.split_mates,
            );
            let scores = BinScores::compute(
                record.chrom(),
                record.start(),
                record.end(),
                &fragments,
            );
            writer.write_scores(&scores)?;
            rows += 1;
            pbar.inc(1);
        }
        writer.finish()?;
        pbar.finish_and_clear();

        info!("Wrote {} score row(s)", rows);
        Ok(())
    }

    fn validate(&self) {
        if !self.input.exists() {
            eprintln!(
                "Error: input file {} not found.",
                style(self.input.display()).red()
            );
            exit(1);
        }
        if !self.input.is_file() {
            eprintln!(
                "Error: input {} is not a file.",
                style(self.input.display()).red()
            );
            exit(1);
        }
        if self.output.is_dir() {
            eprintln!(
                "Error: output {} is a directory.",
                style(self.output.display()).red()
            );
            exit(1);
        }
    }
}

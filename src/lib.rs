//! # methaplo
//!
//! `methaplo` computes per-bin DNA methylation summary statistics from
//! coordinate-sorted bisulfite sequencing alignments carrying Bismark-style
//! per-base call strings. For every fixed-size genomic bin and both
//! methylation contexts (CpG and non-CpG) it reports site-level methylation
//! counts, read-level fully-methylated and fully-unmethylated fragment
//! counts, the methylation haplotype load (MHL, Guo et al. 2017) together
//! with its unmethylated counterpart (uMHL), and optionally the methylation
//! concordance count (Shi et al. 2021).
//!
//! ## Structure
//!
//! * [`data_structs`]: the call-string alphabet and its per-context
//!   normalization ([`ContextFragments`]), aligned read records
//!   ([`ReadRecord`]) and per-bin score rows ([`BinScores`]).
//! * [`stats`]: the per-context statistics engine and the linear-time
//!   haplotype-load calculator.
//! * [`binner`]: the streaming aggregator ([`BinAggregator`]) that folds a
//!   sorted record stream into fixed-size bins, splitting boundary-spanning
//!   fragments without double counting.
//! * [`io`]: record sources (BAM, read-info tables) and the tab-separated
//!   score sink.
//!
//! ## Usage
//!
//! ```no_run
//! use methaplo::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let source = BamSource::try_new("sample.bam")?;
//!     let mut writer = ScoresWriter::from_path("sample.scores.tsv", false)?;
//!
//!     for scores in BinAggregator::new(source, 1000) {
//!         writer.write_scores(&scores?)?;
//!     }
//!     writer.finish()
//! }
//! ```
//!
//! Every input file is an independent unit of work: aggregators share no
//! state, so any number of sources can be processed in parallel.

pub mod binner;
pub mod data_structs;
pub mod io;
pub mod prelude;
pub mod stats;

#[allow(unused_imports)]
use prelude::*;

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::Context as _;
use serde::{
    Serialize,
    Serializer,
};

use crate::data_structs::typedef::{
    CountType,
    DensityType,
    PosType,
};
use crate::data_structs::BinScores;

/// Serializes an undefined statistic as an explicit marker, never as zero.
fn serialize_density<S>(
    value: &DensityType,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer, {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    }
    else {
        serializer.serialize_str("NA")
    }
}

// csv serialization does not support serde(flatten), so the two row shapes
// are spelled out.
#[derive(Serialize)]
struct ScoresRow<'a> {
    chr: &'a str,
    start: PosType,
    end: PosType,
    ch_mc: CountType,
    ch_c: CountType,
    cg_mc: CountType,
    cg_c: CountType,
    ch_fully_meth_reads: CountType,
    ch_fully_unmeth_reads: CountType,
    ch_total_reads: CountType,
    cg_fully_meth_reads: CountType,
    cg_fully_unmeth_reads: CountType,
    cg_total_reads: CountType,
    #[serde(serialize_with = "serialize_density")]
    ch_mhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    ch_umhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    cg_mhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    cg_umhl: DensityType,
}

#[derive(Serialize)]
struct ScoresRowFull<'a> {
    chr: &'a str,
    start: PosType,
    end: PosType,
    ch_mc: CountType,
    ch_c: CountType,
    cg_mc: CountType,
    cg_c: CountType,
    ch_fully_meth_reads: CountType,
    ch_fully_unmeth_reads: CountType,
    ch_total_reads: CountType,
    cg_fully_meth_reads: CountType,
    cg_fully_unmeth_reads: CountType,
    cg_total_reads: CountType,
    #[serde(serialize_with = "serialize_density")]
    ch_mhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    ch_umhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    cg_mhl: DensityType,
    #[serde(serialize_with = "serialize_density")]
    cg_umhl: DensityType,
    ch_conc: CountType,
    cg_conc: CountType,
}

impl<'a> From<&'a BinScores> for ScoresRowFull<'a> {
    fn from(scores: &'a BinScores) -> Self {
        Self {
            chr: &scores.chrom,
            start: scores.start,
            end: scores.end,
            ch_mc: scores.ch.mc,
            ch_c: scores.ch.c,
            cg_mc: scores.cg.mc,
            cg_c: scores.cg.c,
            ch_fully_meth_reads: scores.ch.fully_meth_reads,
            ch_fully_unmeth_reads: scores.ch.fully_unmeth_reads,
            ch_total_reads: scores.ch.total_reads,
            cg_fully_meth_reads: scores.cg.fully_meth_reads,
            cg_fully_unmeth_reads: scores.cg.fully_unmeth_reads,
            cg_total_reads: scores.cg.total_reads,
            ch_mhl: scores.ch.mhl,
            ch_umhl: scores.ch.umhl,
            cg_mhl: scores.cg.mhl,
            cg_umhl: scores.cg.umhl,
            ch_conc: scores.ch.concordance,
            cg_conc: scores.cg.concordance,
        }
    }
}

impl<'a> From<&'a BinScores> for ScoresRow<'a> {
    fn from(scores: &'a BinScores) -> Self {
        Self {
            chr: &scores.chrom,
            start: scores.start,
            end: scores.end,
            ch_mc: scores.ch.mc,
            ch_c: scores.ch.c,
            cg_mc: scores.cg.mc,
            cg_c: scores.cg.c,
            ch_fully_meth_reads: scores.ch.fully_meth_reads,
            ch_fully_unmeth_reads: scores.ch.fully_unmeth_reads,
            ch_total_reads: scores.ch.total_reads,
            cg_fully_meth_reads: scores.cg.fully_meth_reads,
            cg_fully_unmeth_reads: scores.cg.fully_unmeth_reads,
            cg_total_reads: scores.cg.total_reads,
            ch_mhl: scores.ch.mhl,
            ch_umhl: scores.ch.umhl,
            cg_mhl: scores.cg.mhl,
            cg_umhl: scores.cg.umhl,
        }
    }
}

/// Tab-separated score sink: one header row, then one row per bin in write
/// order. Undefined statistics are written as `NA`.
pub struct ScoresWriter<W: Write> {
    writer: csv::Writer<W>,
    concordance: bool,
}

impl ScoresWriter<File> {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        concordance: bool,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        Ok(Self::new(file, concordance))
    }
}

impl<W: Write> ScoresWriter<W> {
    /// Wraps a sink; `concordance` appends the two concordance columns to
    /// every row.
    pub fn new(
        sink: W,
        concordance: bool,
    ) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .has_headers(true)
            .from_writer(sink);
        Self {
            writer,
            concordance,
        }
    }

    pub fn write_scores(
        &mut self,
        scores: &BinScores,
    ) -> anyhow::Result<()> {
        if self.concordance {
            self.writer
                .serialize(ScoresRowFull::from(scores))
                .context("Failed to write scores row")
        }
        else {
            self.writer
                .serialize(ScoresRow::from(scores))
                .context("Failed to write scores row")
        }
    }

    pub fn finish(mut self) -> anyhow::Result<()> {
        self.writer.flush().context("Failed to flush scores")
    }
}

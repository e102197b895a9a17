use super::calls::ContextFragments;
use super::enums::Context;
use super::typedef::{
    CountType,
    DensityType,
    PosType,
};
use crate::stats::{
    concordance_count,
    haplotype_load,
    read_counts,
    site_counts,
};

/// Summary statistics of one methylation context within a single bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextScores {
    /// Methylated site count.
    pub mc: CountType,
    /// Covered site count.
    pub c: CountType,
    /// Fragments carrying only methylated calls.
    pub fully_meth_reads: CountType,
    /// Fragments carrying only unmethylated calls.
    pub fully_unmeth_reads: CountType,
    /// Fragments contributing to this context.
    pub total_reads: CountType,
    /// Methylation haplotype load; NaN without data.
    pub mhl: DensityType,
    /// Unmethylation haplotype load; NaN without data.
    pub umhl: DensityType,
    /// Methylation concordance count.
    pub concordance: CountType,
}

impl ContextScores {
    /// Computes all statistics of one context from its fragment list.
    pub fn compute(
        fragments: &[String],
        context: Context,
    ) -> Self {
        let (mc, c) = site_counts(fragments, context);
        let reads = read_counts(fragments, context);
        let (mhl, umhl) = haplotype_load(fragments, context);
        Self {
            mc,
            c,
            fully_meth_reads: reads.fully_meth,
            fully_unmeth_reads: reads.fully_unmeth,
            total_reads: reads.total,
            mhl,
            umhl,
            concordance: concordance_count(fragments, context),
        }
    }

    /// Site-level methylation rate, `None` without covered sites.
    pub fn methylation_rate(&self) -> Option<DensityType> {
        (self.c > 0).then(|| self.mc as DensityType / self.c as DensityType)
    }

    /// Read-level fully-methylated rate, `None` without fragments.
    pub fn fully_meth_rate(&self) -> Option<DensityType> {
        (self.total_reads > 0)
            .then(|| self.fully_meth_reads as DensityType / self.total_reads as DensityType)
    }

    /// Read-level fully-unmethylated rate, `None` without fragments.
    pub fn fully_unmeth_rate(&self) -> Option<DensityType> {
        (self.total_reads > 0).then(|| {
            self.fully_unmeth_reads as DensityType / self.total_reads as DensityType
        })
    }
}

/// One output row: both context tracks of one genomic interval.
///
/// Produced per bin by the aggregator, or per record when scoring an
/// extracted read table.
#[derive(Debug, Clone, PartialEq)]
pub struct BinScores {
    pub chrom: String,
    pub start: PosType,
    pub end:   PosType,
    pub ch:    ContextScores,
    pub cg:    ContextScores,
}

impl BinScores {
    /// Scores both context tracks of an interval.
    pub fn compute(
        chrom: impl Into<String>,
        start: PosType,
        end: PosType,
        fragments: &ContextFragments,
    ) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            ch: ContextScores::compute(fragments.fragments(Context::CH), Context::CH),
            cg: ContextScores::compute(fragments.fragments(Context::CG), Context::CG),
        }
    }

    pub fn context(
        &self,
        context: Context,
    ) -> &ContextScores {
        match context {
            Context::CH => &self.ch,
            Context::CG => &self.cg,
        }
    }
}

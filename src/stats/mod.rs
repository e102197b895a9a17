//! Per-context statistics over normalized call-string fragments.
//!
//! All functions take the fragment list of a single methylation context, as
//! produced by
//! [`ContextFragments`](crate::data_structs::calls::ContextFragments), and
//! never fail: missing data resolves to zero counts or, for the haplotype
//! load, to NaN.

mod haplotype;

#[cfg(test)]
mod tests;

pub use haplotype::haplotype_load;

use crate::data_structs::enums::Context;
use crate::data_structs::typedef::CountType;

/// Read-level fragment classification counts.
///
/// A fragment counts as fully methylated when its distinct call codes are
/// exactly the uppercase context letter, fully unmethylated when they are
/// exactly the lowercase one. Mixed fragments contribute to neither count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCounts {
    pub fully_meth:   CountType,
    pub fully_unmeth: CountType,
    pub total:        CountType,
}

/// Site-level counts `(methylated, covered)` over all fragments.
pub fn site_counts<S: AsRef<str>>(
    fragments: &[S],
    context: Context,
) -> (CountType, CountType) {
    let meth = context.meth_code();
    let mut mc = 0;
    let mut c = 0;
    for fragment in fragments {
        let fragment = fragment.as_ref();
        mc += fragment.chars().filter(|&code| code == meth).count() as CountType;
        c += fragment.len() as CountType;
    }
    (mc, c)
}

/// Classifies every fragment as fully methylated, fully unmethylated or
/// mixed.
pub fn read_counts<S: AsRef<str>>(
    fragments: &[S],
    context: Context,
) -> ReadCounts {
    let meth = context.meth_code();
    let unmeth = context.unmeth_code();
    let mut counts = ReadCounts {
        total: fragments.len() as CountType,
        ..Default::default()
    };
    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        if fragment.chars().all(|code| code == meth) {
            counts.fully_meth += 1;
        }
        else if fragment.chars().all(|code| code == unmeth) {
            counts.fully_unmeth += 1;
        }
    }
    counts
}

/// Methylation concordance: unmethylated sites within fragments that also
/// carry at least one methylated site, summed over fragments.
pub fn concordance_count<S: AsRef<str>>(
    fragments: &[S],
    context: Context,
) -> CountType {
    let meth = context.meth_code();
    let unmeth = context.unmeth_code();
    fragments
        .iter()
        .map(AsRef::as_ref)
        .filter(|fragment| fragment.contains(meth))
        .map(|fragment| {
            fragment.chars().filter(|&code| code == unmeth).count() as CountType
        })
        .sum()
}

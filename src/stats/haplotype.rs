use itertools::Itertools;

use crate::data_structs::enums::Context;
use crate::data_structs::typedef::DensityType;

/// Methylation and unmethylation haplotype load of one context's fragments.
///
/// For every substring length `k` up to the longest fragment, the fraction
/// of length-`k` substrings that are fully methylated runs is weighted by
/// `k / (L * (L + 1) / 2)` (triangular weights, `L` the longest fragment
/// length) and summed; longer concordant runs thereby carry more weight
/// (Guo et al. 2017). The unmethylation load swaps the roles of the two
/// call codes.
///
/// Returns `(NaN, NaN)` when no fragment carries any call. A fully
/// methylated fragment set yields `(1.0, 0.0)`.
///
/// Runs are counted through an exact run-length histogram built in one pass
/// over the fragments, followed by a cumulative transform into
/// counts-of-substrings-of-length-`k`, so the whole computation is linear
/// in total call length.
pub fn haplotype_load<S: AsRef<str>>(
    fragments: &[S],
    context: Context,
) -> (DensityType, DensityType) {
    let max_len = fragments
        .iter()
        .map(|fragment| fragment.as_ref().len())
        .max()
        .unwrap_or(0);
    if max_len == 0 {
        return (DensityType::NAN, DensityType::NAN);
    }

    let meth = context.meth_code();
    let unmeth = context.unmeth_code();

    let mut frag_hist = vec![0u64; max_len + 1];
    let mut meth_hist = vec![0u64; max_len + 1];
    let mut unmeth_hist = vec![0u64; max_len + 1];

    for fragment in fragments {
        let fragment = fragment.as_ref();
        if fragment.is_empty() {
            continue;
        }
        frag_hist[fragment.len()] += 1;
        // maximal single-code runs; any other code acts as a separator
        for (code, run) in &fragment.chars().chunk_by(|&code| code) {
            if code == meth {
                meth_hist[run.count()] += 1;
            }
            else if code == unmeth {
                unmeth_hist[run.count()] += 1;
            }
        }
    }

    let totals = substring_counts(&frag_hist);
    let meth_counts = substring_counts(&meth_hist);
    let unmeth_counts = substring_counts(&unmeth_hist);

    let norm = (max_len * (max_len + 1) / 2) as DensityType;
    let mut mhl = 0.0;
    let mut umhl = 0.0;
    for k in 1..=max_len {
        if totals[k] == 0 {
            continue;
        }
        let weight = k as DensityType / norm;
        mhl += weight * meth_counts[k] as DensityType / totals[k] as DensityType;
        umhl += weight * unmeth_counts[k] as DensityType / totals[k] as DensityType;
    }
    (mhl, umhl)
}

/// Converts a histogram of exact run lengths into, per length `k`, the
/// number of length-`k` substrings contained in any run: a run of length
/// `r` contributes `r - k + 1` substrings for every `k <= r`. Computed as a
/// double suffix sum, linear in the histogram length.
fn substring_counts(hist: &[u64]) -> Vec<u64> {
    let mut counts = vec![0u64; hist.len()];
    let mut runs_at_least = 0u64;
    let mut total = 0u64;
    for k in (1..hist.len()).rev() {
        runs_at_least += hist[k];
        total += runs_at_least;
        counts[k] = total;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::substring_counts;

    /// Brute-force reference: sum over runs of `r - k + 1`.
    fn substring_counts_naive(hist: &[u64]) -> Vec<u64> {
        let mut counts = vec![0u64; hist.len()];
        for k in 1..hist.len() {
            for (r, &n) in hist.iter().enumerate().skip(k) {
                counts[k] += n * (r - k + 1) as u64;
            }
        }
        counts
    }

    #[test]
    fn test_substring_counts_matches_naive() {
        let cases: Vec<Vec<u64>> = vec![
            vec![0],
            vec![0, 3],
            vec![0, 1, 0, 2],
            vec![0, 5, 4, 3, 2, 1],
            vec![0, 0, 0, 0, 7],
        ];
        for hist in cases {
            assert_eq!(substring_counts(&hist), substring_counts_naive(&hist));
        }
    }
}

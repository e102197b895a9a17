use assert_approx_eq::assert_approx_eq;
use rstest::rstest;

use super::*;
use crate::data_structs::Context;

fn fragments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

// --- site_counts ---

#[test]
fn test_site_counts() {
    let (mc, c) = site_counts(&fragments(&["HhH", "h"]), Context::CH);
    assert_eq!((mc, c), (2, 4));
}

#[test]
fn test_site_counts_empty() {
    let (mc, c) = site_counts(&Vec::<String>::new(), Context::CH);
    assert_eq!((mc, c), (0, 0));
}

#[test]
fn test_site_counts_order_invariant() {
    let forward = site_counts(&fragments(&["Hh", "ZZ", "h"]), Context::CH);
    let backward = site_counts(&fragments(&["h", "ZZ", "Hh"]), Context::CH);
    assert_eq!(forward, backward);
}

// --- read_counts ---

#[test]
fn test_read_counts_classification() {
    // three single-call fragments: two methylated, one unmethylated
    let counts = read_counts(&fragments(&["H", "h", "H"]), Context::CH);
    assert_eq!(counts.fully_meth, 2);
    assert_eq!(counts.fully_unmeth, 1);
    assert_eq!(counts.total, 3);
}

#[test]
fn test_read_counts_mixed_fragment_counts_as_neither() {
    let counts = read_counts(&fragments(&["Hh", "HH", "hh"]), Context::CH);
    assert_eq!(counts.fully_meth, 1);
    assert_eq!(counts.fully_unmeth, 1);
    assert_eq!(counts.total, 3);
}

#[test]
fn test_read_counts_empty() {
    let counts = read_counts(&Vec::<String>::new(), Context::CG);
    assert_eq!(counts, ReadCounts::default());
}

// --- concordance_count ---

#[rstest]
#[case(&["Hhh", "hh", "HH"], 2)]
#[case(&["hh", "hhh"], 0)]
#[case(&["HH"], 0)]
#[case(&[], 0)]
fn test_concordance_count(
    #[case] parts: &[&str],
    #[case] expected: u64,
) {
    assert_eq!(concordance_count(&fragments(parts), Context::CH), expected);
}

// --- haplotype_load ---

#[test]
fn test_haplotype_load_empty_is_nan() {
    let (mhl, umhl) = haplotype_load(&Vec::<String>::new(), Context::CH);
    assert!(mhl.is_nan());
    assert!(umhl.is_nan());
}

#[test]
fn test_haplotype_load_all_empty_fragments_is_nan() {
    let (mhl, umhl) = haplotype_load(&fragments(&["", ""]), Context::CH);
    assert!(mhl.is_nan());
    assert!(umhl.is_nan());
}

#[rstest]
#[case(&["H"])]
#[case(&["HHHH"])]
#[case(&["HH", "HHH", "H"])]
fn test_haplotype_load_fully_methylated(#[case] parts: &[&str]) {
    let (mhl, umhl) = haplotype_load(&fragments(parts), Context::CH);
    assert_approx_eq!(mhl, 1.0, 1e-12);
    assert_approx_eq!(umhl, 0.0, 1e-12);
}

#[test]
fn test_haplotype_load_symmetry() {
    let (mhl, umhl) = haplotype_load(&fragments(&["hhhh"]), Context::CH);
    assert_approx_eq!(mhl, 0.0, 1e-12);
    assert_approx_eq!(umhl, 1.0, 1e-12);
}

#[test]
fn test_haplotype_load_hand_computed() {
    // fragments HHh and H: lengths 3 and 1, methylated runs of lengths 2
    // and 1, one unmethylated run of length 1
    //
    //   N = [4, 2, 1], n = [3, 1, 0], u = [1, 0, 0], weights k/6
    //   MHL  = (1/6)(3/4) + (2/6)(1/2) = 7/24
    //   uMHL = (1/6)(1/4)              = 1/24
    let (mhl, umhl) = haplotype_load(&fragments(&["HHh", "H"]), Context::CH);
    assert_approx_eq!(mhl, 7.0 / 24.0, 1e-12);
    assert_approx_eq!(umhl, 1.0 / 24.0, 1e-12);
}

#[test]
fn test_haplotype_load_alternating() {
    // hH: every run has length one
    let (mhl, umhl) = haplotype_load(&fragments(&["hH"]), Context::CH);
    assert_approx_eq!(mhl, 1.0 / 6.0, 1e-12);
    assert_approx_eq!(umhl, 1.0 / 6.0, 1e-12);
}

#[test]
fn test_haplotype_load_first_term_is_site_rate() {
    // for single-site fragments MHL degenerates to the methylation rate
    let parts = fragments(&["H", "h", "H", "h", "h"]);
    let (mhl, _) = haplotype_load(&parts, Context::CH);
    assert_approx_eq!(mhl, 2.0 / 5.0, 1e-12);
}

#[test]
fn test_haplotype_load_respects_context_letters() {
    let (mhl, umhl) = haplotype_load(&fragments(&["ZZ"]), Context::CG);
    assert_approx_eq!(mhl, 1.0, 1e-12);
    assert_approx_eq!(umhl, 0.0, 1e-12);
}

#[test]
fn test_haplotype_load_order_invariant() {
    let a = haplotype_load(&fragments(&["HHh", "H", "hh"]), Context::CH);
    let b = haplotype_load(&fragments(&["hh", "HHh", "H"]), Context::CH);
    assert_approx_eq!(a.0, b.0, 1e-12);
    assert_approx_eq!(a.1, b.1, 1e-12);
}

use super::{
    empty_skip_target,
    BinAggregator,
};
use crate::data_structs::{
    BinScores,
    ContextFragments,
    ReadRecord,
};

fn source(
    records: Vec<ReadRecord>
) -> impl Iterator<Item = anyhow::Result<ReadRecord>> {
    records.into_iter().map(Ok)
}

fn collect_rows(aggregator: BinAggregator<impl Iterator<Item = anyhow::Result<ReadRecord>>>) -> Vec<BinScores> {
    aggregator
        .collect::<anyhow::Result<Vec<_>>>()
        .expect("aggregation failed")
}

#[test]
fn test_empty_source_yields_nothing() {
    let rows = collect_rows(BinAggregator::new(source(vec![]), 1000));
    assert!(rows.is_empty());
}

#[test]
fn test_single_record_single_bin() {
    let records = vec![ReadRecord::new("chr1", 10, 13, "HhZ")];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.chrom, "chr1");
    assert_eq!((row.start, row.end), (0, 1000));
    assert_eq!((row.ch.mc, row.ch.c), (1, 2));
    assert_eq!((row.cg.mc, row.cg.c), (1, 1));
}

#[test]
fn test_boundary_split() {
    // 100 calls starting at 950 with 1000-sized bins: the first 50 belong
    // to [0, 1000), the remaining 50 to [1000, 2000)
    let calls = "H".repeat(50) + &"Z".repeat(50);
    let records = vec![
        ReadRecord::new("chr1", 950, 1050, calls),
        ReadRecord::new("chr1", 1200, 1210, "h".repeat(10)),
    ];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    assert_eq!(rows.len(), 2);

    let first = &rows[0];
    assert_eq!((first.start, first.end), (0, 1000));
    assert_eq!((first.ch.mc, first.ch.c), (50, 50));
    assert_eq!(first.cg.c, 0);

    let second = &rows[1];
    assert_eq!((second.start, second.end), (1000, 2000));
    assert_eq!((second.cg.mc, second.cg.c), (50, 50));
    assert_eq!((second.ch.mc, second.ch.c), (0, 10));
}

#[test]
fn test_split_loses_no_characters() {
    // scores of a split record must reproduce the direct scores of the
    // unsplit call string at site level
    let calls = "HhZzXx".repeat(30);
    let records = vec![
        ReadRecord::new("chr1", 910, 1090, calls.clone()),
        ReadRecord::new("chr1", 2500, 2510, "H".repeat(10)),
    ];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));
    assert_eq!(rows.len(), 3);

    let direct = BinScores::compute(
        "chr1",
        0,
        0,
        &ContextFragments::from_raw(&calls, true),
    );
    let split_ch: u64 = rows[..2].iter().map(|row| row.ch.c).sum();
    let split_ch_mc: u64 = rows[..2].iter().map(|row| row.ch.mc).sum();
    let split_cg: u64 = rows[..2].iter().map(|row| row.cg.c).sum();
    let split_cg_mc: u64 = rows[..2].iter().map(|row| row.cg.mc).sum();
    assert_eq!(split_ch, direct.ch.c);
    assert_eq!(split_ch_mc, direct.ch.mc);
    assert_eq!(split_cg, direct.cg.c);
    assert_eq!(split_cg_mc, direct.cg.mc);
}

#[test]
fn test_chromosome_change_flushes() {
    let records = vec![
        ReadRecord::new("chr1", 100, 102, "HH"),
        ReadRecord::new("chr2", 100, 102, "hh"),
    ];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].chrom, "chr1");
    assert_eq!((rows[0].start, rows[0].end), (0, 1000));
    assert_eq!(rows[1].chrom, "chr2");
    assert_eq!((rows[1].start, rows[1].end), (0, 1000));
}

#[test]
fn test_distant_record_skips_empty_bins() {
    let records = vec![
        ReadRecord::new("chr1", 10, 12, "HH"),
        ReadRecord::new("chr1", 5500, 5502, "hh"),
    ];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].start, rows[0].end), (0, 1000));
    assert_eq!((rows[1].start, rows[1].end), (5000, 6000));
}

#[test]
fn test_record_starting_at_bin_end_is_held() {
    // start == bin_end keeps the record attached to the current bin with an
    // empty in-bin portion; its calls belong to the next window
    let records = vec![
        ReadRecord::new("chr1", 10, 12, "HH"),
        ReadRecord::new("chr1", 1000, 1002, "ZZ"),
        ReadRecord::new("chr1", 1100, 1102, "hh"),
    ];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    assert_eq!(rows.len(), 2);
    assert_eq!((rows[0].start, rows[0].end), (0, 1000));
    assert_eq!(rows[0].cg.c, 0);
    assert_eq!((rows[1].start, rows[1].end), (1000, 2000));
    assert_eq!(rows[1].cg.c, 2);
    assert_eq!(rows[1].ch.c, 2);
}

#[test]
fn test_trailing_hold_is_discarded() {
    let records = vec![ReadRecord::new("chr1", 950, 1050, "H".repeat(100))];
    let rows = collect_rows(BinAggregator::new(source(records), 1000));

    // only the in-bin half is reported; the held half has no bin to land in
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ch.c, 50);
}

#[test]
fn test_mate_handling_reaches_normalization() {
    let records = vec![ReadRecord::new("chr1", 10, 14, "hH;hh")];

    let merged =
        collect_rows(BinAggregator::new(source(records.clone()), 1000));
    assert_eq!(merged[0].ch.total_reads, 1);

    let split = collect_rows(
        BinAggregator::new(source(records), 1000).with_merge_mates(false),
    );
    assert_eq!(split[0].ch.total_reads, 2);
}

#[test]
fn test_unsorted_starts_error() {
    let records = vec![
        ReadRecord::new("chr1", 500, 502, "HH"),
        ReadRecord::new("chr1", 100, 102, "hh"),
    ];
    let result: anyhow::Result<Vec<_>> =
        BinAggregator::new(source(records), 1000).collect();
    assert!(result.is_err());
}

#[test]
fn test_revisited_chromosome_errors() {
    let records = vec![
        ReadRecord::new("chr1", 100, 102, "HH"),
        ReadRecord::new("chr2", 100, 102, "hh"),
        ReadRecord::new("chr1", 200, 202, "HH"),
    ];
    let result: anyhow::Result<Vec<_>> =
        BinAggregator::new(source(records), 1000).collect();
    assert!(result.is_err());
}

#[test]
fn test_sort_check_can_be_disabled() {
    let records = vec![
        ReadRecord::new("chr1", 500, 502, "HH"),
        ReadRecord::new("chr1", 100, 102, "hh"),
    ];
    let rows = collect_rows(
        BinAggregator::new(source(records), 1000).with_sort_check(false),
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ch.c, 4);
}

#[test]
fn test_source_error_ends_iteration() {
    let items: Vec<anyhow::Result<ReadRecord>> = vec![
        Ok(ReadRecord::new("chr1", 10, 12, "HH")),
        Err(anyhow::anyhow!("truncated input")),
    ];
    let mut aggregator = BinAggregator::new(items.into_iter(), 1000);
    assert!(aggregator.next().unwrap().is_err());
    assert!(aggregator.next().is_none());
}

#[test]
fn test_empty_skip_target() {
    assert_eq!(empty_skip_target(0, 1000), 0);
    assert_eq!(empty_skip_target(500, 1000), 0);
    assert_eq!(empty_skip_target(1000, 1000), 0);
    assert_eq!(empty_skip_target(1001, 1000), 1000);
    assert_eq!(empty_skip_target(5500, 1000), 5000);
    assert_eq!(empty_skip_target(6000, 1000), 5000);
}

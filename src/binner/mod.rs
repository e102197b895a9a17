//! Streaming aggregation of coordinate-sorted read records into fixed-size
//! genomic bins.
//!
//! [`BinAggregator`] wraps any fallible [`ReadRecord`] iterator and yields
//! one [`BinScores`] row per non-empty bin, in flush order. It keeps exactly
//! one current bin plus one holding buffer for call characters beyond the
//! current bin boundary; a fragment spanning the boundary is partitioned
//! between the two, never duplicated.
//!
//! The upstream source must be sorted by `(chromosome, start)` and the bin
//! size must exceed the maximum read length; neither is recoverable here if
//! violated. An optional order check (on by default) turns detectable
//! violations into errors instead of silently wrong output.

use std::collections::VecDeque;

use anyhow::bail;
use hashbrown::HashSet;
use log::warn;

use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    BinScores,
    ContextFragments,
    ReadRecord,
};

#[cfg(test)]
mod tests;

/// Accumulation state of the current bin.
struct BinState {
    chrom:     String,
    bin_start: PosType,
    /// Raw call substrings overlapping the current bin.
    current:   Vec<String>,
    /// Raw call substrings beyond the current bin boundary.
    holding:   Vec<String>,
}

impl BinState {
    fn new(chrom: String) -> Self {
        Self {
            chrom,
            bin_start: 0,
            current: Vec::new(),
            holding: Vec::new(),
        }
    }

    fn bin_end(
        &self,
        bin_size: PosType,
    ) -> PosType {
        self.bin_start + bin_size
    }

    /// Scores and clears the current buffer; `None` when it holds nothing.
    fn flush(
        &mut self,
        bin_size: PosType,
        merge_mates: bool,
    ) -> Option<BinScores> {
        if self.current.is_empty() {
            return None;
        }
        let fragments = ContextFragments::from_fragments(
            self.current.iter().map(String::as_str),
            merge_mates,
        );
        let scores = BinScores::compute(
            self.chrom.clone(),
            self.bin_start,
            self.bin_end(bin_size),
            &fragments,
        );
        self.current.clear();
        Some(scores)
    }

    /// Moves to the next bin: a fresh chromosome restarts at zero, within a
    /// chromosome the window slides by one bin size. The holding buffer
    /// becomes the new current buffer either way.
    fn advance(
        &mut self,
        chrom: &str,
        bin_size: PosType,
    ) {
        if self.chrom != chrom {
            self.chrom = chrom.to_string();
            self.bin_start = 0;
        }
        else {
            self.bin_start += bin_size;
        }
        self.current = std::mem::take(&mut self.holding);
    }
}

/// Streaming bin aggregator over a sorted read-record source.
///
/// Implements `Iterator<Item = anyhow::Result<BinScores>>`; empty bins are
/// skipped. The first source error ends iteration.
pub struct BinAggregator<I> {
    source: I,
    bin_size: PosType,
    merge_mates: bool,
    sort_check: bool,
    bin: Option<BinState>,
    pending: VecDeque<BinScores>,
    seen_chroms: HashSet<String>,
    last_start: PosType,
    done: bool,
}

impl<I> BinAggregator<I>
where
    I: Iterator<Item = anyhow::Result<ReadRecord>>,
{
    /// Creates an aggregator with paired-end mates merged and the input
    /// order check enabled.
    pub fn new(
        source: I,
        bin_size: PosType,
    ) -> Self {
        assert!(bin_size > 0, "Bin size must be positive");
        Self {
            source,
            bin_size,
            merge_mates: true,
            sort_check: true,
            bin: None,
            pending: VecDeque::new(),
            seen_chroms: HashSet::new(),
            last_start: 0,
            done: false,
        }
    }

    /// Controls whether paired-end mates count as one fragment or two.
    pub fn with_merge_mates(
        mut self,
        merge_mates: bool,
    ) -> Self {
        self.merge_mates = merge_mates;
        self
    }

    /// Controls the fail-fast input order validation.
    pub fn with_sort_check(
        mut self,
        sort_check: bool,
    ) -> Self {
        self.sort_check = sort_check;
        self
    }

    /// Errors on records that contradict the sorted-input precondition:
    /// starts moving backwards within a chromosome, or a chromosome seen
    /// again after the stream moved past it.
    fn check_order(
        &mut self,
        record: &ReadRecord,
    ) -> anyhow::Result<()> {
        match self.bin.as_ref() {
            Some(bin) if bin.chrom == record.chrom() => {
                if record.start() < self.last_start {
                    bail!(
                        "Unsorted input: {} starts before the previous record \
                         ({} < {})",
                        record,
                        record.start(),
                        self.last_start
                    );
                }
            },
            _ => {
                if !self.seen_chroms.insert(record.chrom().to_string()) {
                    bail!(
                        "Unsorted input: chromosome {} reappears after other \
                         chromosomes",
                        record.chrom()
                    );
                }
            },
        }
        self.last_start = record.start();
        Ok(())
    }

    /// Folds one record into the bin state, queueing rows for every bin the
    /// record flushes past.
    fn accept(
        &mut self,
        record: ReadRecord,
    ) -> anyhow::Result<()> {
        if self.sort_check {
            self.check_order(&record)?;
        }

        if self.bin.is_none() {
            self.bin = Some(BinState::new(record.chrom().to_string()));
        }
        let bin = self.bin.as_mut().unwrap();

        // Flush until the record joins the current bin: every chromosome
        // change and every window the record starts beyond completes the
        // bin under construction.
        while bin.chrom != record.chrom()
            || record.start() > bin.bin_end(self.bin_size)
        {
            if let Some(scores) = bin.flush(self.bin_size, self.merge_mates) {
                self.pending.push_back(scores);
            }
            bin.advance(record.chrom(), self.bin_size);
            // Runs of completely empty bins emit nothing; skip them in one
            // step instead of sliding one window at a time.
            if bin.chrom == record.chrom()
                && bin.current.is_empty()
                && bin.holding.is_empty()
            {
                bin.bin_start = bin
                    .bin_start
                    .max(empty_skip_target(record.start(), self.bin_size));
            }
        }

        let bin_end = bin.bin_end(self.bin_size);
        let (_, start, end, calls) = record.into_parts();
        if end <= bin_end {
            // Fully inside the current bin.
            bin.current.push(calls);
        }
        else {
            // Partition at the bin boundary: one call character per covered
            // reference base, so the cut is a plain index.
            let cut = ((bin_end - start) as usize).min(calls.len());
            let (head, tail) = calls.split_at(cut);
            if !head.is_empty() {
                bin.current.push(head.to_string());
            }
            if !tail.is_empty() {
                bin.holding.push(tail.to_string());
            }
        }
        Ok(())
    }

    /// Final flush after the source is exhausted. Held characters belong to
    /// a bin that was never reached and are dropped.
    fn finish(&mut self) {
        if let Some(mut bin) = self.bin.take() {
            if let Some(scores) = bin.flush(self.bin_size, self.merge_mates) {
                self.pending.push_back(scores);
            }
            if !bin.holding.is_empty() {
                warn!(
                    "Discarding {} held call fragment(s) beyond the last bin \
                     of {}",
                    bin.holding.len(),
                    bin.chrom
                );
            }
        }
    }
}

/// Largest bin start whose window still admits a record starting at
/// `start`, i.e. the window the flush loop would stop at when every bin in
/// between is empty.
fn empty_skip_target(
    start: PosType,
    bin_size: PosType,
) -> PosType {
    start.div_ceil(bin_size).saturating_sub(1) * bin_size
}

impl<I> Iterator for BinAggregator<I>
where
    I: Iterator<Item = anyhow::Result<ReadRecord>>,
{
    type Item = anyhow::Result<BinScores>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            // Completed bins are served before more input is pulled.
            if let Some(scores) = self.pending.pop_front() {
                return Some(Ok(scores));
            }
            if self.done {
                return None;
            }
            match self.source.next() {
                Some(Ok(record)) => {
                    if let Err(e) = self.accept(record) {
                        self.done = true;
                        return Some(Err(e));
                    }
                },
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                },
                None => {
                    self.done = true;
                    self.finish();
                },
            }
        }
    }
}

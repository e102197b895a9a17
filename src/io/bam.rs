use std::path::Path;
use std::thread::JoinHandle;

use anyhow::Context as _;
use crossbeam::channel::Receiver;
use log::{
    info,
    warn,
};
use rust_htslib::bam;
use rust_htslib::bam::record::{
    Aux,
    Cigar,
    CigarStringView,
};
use rust_htslib::bam::Read as _;

use crate::data_structs::typedef::PosType;
use crate::data_structs::{
    canonical_chrom,
    ReadRecord,
};

/// Aux tag carrying the Bismark per-base methylation call string.
const CALL_TAG: &[u8; 2] = b"XM";

/// Streaming read-record source over a coordinate-sorted Bismark alignment
/// file.
///
/// Decoding runs on a background thread that feeds a bounded channel, so
/// BAM decompression overlaps with downstream aggregation. Records are
/// yielded in file order with chromosome names in canonical `chr`-prefixed
/// form and call strings projected onto reference coordinates through the
/// alignment CIGAR, one call per covered base.
///
/// Unmapped records and records without a usable call tag are skipped (one
/// warning per source). Sortedness itself remains a caller-side
/// precondition; a header not declaring `SO:coordinate` is only warned
/// about.
pub struct BamSource {
    receiver: Receiver<anyhow::Result<ReadRecord>>,
    sorted_declared: bool,
    _join_handle: JoinHandle<()>,
}

impl BamSource {
    const DEFAULT_LOG_EVERY: u64 = 1_000_000;
    const DEFAULT_QUEUE_LEN: usize = 1024;

    pub fn try_new<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Self::with_options(
            path,
            Self::DEFAULT_QUEUE_LEN,
            Self::DEFAULT_LOG_EVERY,
        )
    }

    /// Opens a source with explicit channel capacity and progress cadence
    /// (a progress line is logged every `log_every` records).
    pub fn with_options<P: AsRef<Path>>(
        path: P,
        queue_len: usize,
        log_every: u64,
    ) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let reader = bam::Reader::from_path(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let sorted_declared = header_declares_coordinate_sort(reader.header());
        if !sorted_declared {
            warn!(
                "{} does not declare SO:coordinate; aggregation over an \
                 unsorted file produces invalid results",
                path.display()
            );
        }

        let target_names: Vec<String> = reader
            .header()
            .target_names()
            .iter()
            .map(|name| canonical_chrom(&String::from_utf8_lossy(name)))
            .collect();

        let label = path.display().to_string();
        let (sender, receiver) = crossbeam::channel::bounded(queue_len);
        let join_handle = std::thread::spawn(move || {
            decode_records(reader, target_names, label, log_every, |record| {
                sender.send(record).is_ok()
            })
        });

        Ok(Self {
            receiver,
            sorted_declared,
            _join_handle: join_handle,
        })
    }

    /// Whether the file header declares coordinate sorting.
    pub fn sorted_declared(&self) -> bool {
        self.sorted_declared
    }
}

impl Iterator for BamSource {
    type Item = anyhow::Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        // The channel closes once the decode thread is done.
        self.receiver.recv().ok()
    }
}

/// Decode loop of the background thread. `emit` returns false once the
/// receiving side hung up.
fn decode_records(
    mut reader: bam::Reader,
    target_names: Vec<String>,
    label: String,
    log_every: u64,
    emit: impl Fn(anyhow::Result<ReadRecord>) -> bool,
) {
    let mut record = bam::Record::new();
    let mut total: u64 = 0;
    let mut warned_missing_tag = false;
    let mut warned_tag_mismatch = false;

    while let Some(result) = reader.read(&mut record) {
        if let Err(e) = result {
            emit(Err(anyhow::Error::new(e)
                .context(format!("Failed to read record from {}", label))));
            return;
        }
        total += 1;
        if log_every > 0 && total % log_every == 0 {
            info!("{}: {} records", label, total);
        }

        if record.is_unmapped() || record.tid() < 0 {
            continue;
        }
        let calls = match record.aux(CALL_TAG) {
            Ok(Aux::String(calls)) => calls,
            _ => {
                if !warned_missing_tag {
                    warn!(
                        "{}: records without an XM call tag are skipped",
                        label
                    );
                    warned_missing_tag = true;
                }
                continue;
            },
        };

        let cigar = record.cigar();
        let start = record.pos() as PosType;
        let end = cigar.end_pos() as PosType;
        if end <= start {
            continue;
        }
        let projected = match project_calls(calls, &cigar) {
            Some(projected) => projected,
            None => {
                if !warned_tag_mismatch {
                    warn!(
                        "{}: records whose XM tag does not cover the aligned \
                         sequence are skipped",
                        label
                    );
                    warned_tag_mismatch = true;
                }
                continue;
            },
        };

        let chrom = target_names[record.tid() as usize].clone();
        if !emit(Ok(ReadRecord::new(chrom, start, end, projected))) {
            return;
        }
    }
    info!("{}: finished after {} records", label, total);
}

/// Projects a per-query call string onto reference coordinates: soft clips
/// and insertions are dropped, deletions and reference skips are filled
/// with the non-cytosine code, so the result carries exactly one call per
/// covered reference base. `None` when the tag is shorter than the aligned
/// sequence.
fn project_calls(
    calls: &str,
    cigar: &CigarStringView,
) -> Option<String> {
    let mut projected = String::with_capacity(calls.len());
    let mut query = 0usize;
    for op in cigar.iter() {
        let len = op.len() as usize;
        match op {
            Cigar::Match(_) | Cigar::Equal(_) | Cigar::Diff(_) => {
                projected.push_str(calls.get(query..query + len)?);
                query += len;
            },
            Cigar::Ins(_) | Cigar::SoftClip(_) => {
                query += len;
            },
            Cigar::Del(_) | Cigar::RefSkip(_) => {
                for _ in 0..len {
                    projected.push('.');
                }
            },
            Cigar::HardClip(_) | Cigar::Pad(_) => {},
        }
    }
    Some(projected)
}

fn header_declares_coordinate_sort(header: &bam::HeaderView) -> bool {
    let text = bam::Header::from_template(header).to_bytes();
    String::from_utf8_lossy(&text).contains("SO:coordinate")
}

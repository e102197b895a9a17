use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context as _;
use log::info;
use serde::Deserialize;

use crate::data_structs::typedef::PosType;
use crate::data_structs::ReadRecord;

/// Raw row of an extracted read-info table.
#[derive(Debug, Deserialize)]
struct RawRow {
    chrom: String,
    start: PosType,
    end:   PosType,
    calls: Option<String>,
}

/// Read-record source over a header-less tab-separated table of
/// `(chromosome, start, end, call string)` rows, as produced by upstream
/// read extraction.
///
/// Rows without a call string are skipped and counted; the skip total is
/// logged once the source is exhausted.
pub struct TableSource<R: Read> {
    inner:    csv::DeserializeRecordsIntoIter<R, RawRow>,
    skipped:  usize,
    reported: bool,
}

impl TableSource<File> {
    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<R: Read> TableSource<R> {
    pub fn new(reader: R) -> Self {
        let inner = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .from_reader(reader)
            .into_deserialize();
        Self {
            inner,
            skipped: 0,
            reported: false,
        }
    }

    /// Rows dropped for lacking a call string.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: Read> Iterator for TableSource<R> {
    type Item = anyhow::Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next() {
                Some(Ok(row)) => {
                    if row.start >= row.end {
                        return Some(Err(anyhow::anyhow!(
                            "Malformed table row: empty interval {}:{}-{}",
                            row.chrom,
                            row.start,
                            row.end
                        )));
                    }
                    match row.calls {
                        Some(calls) if !calls.is_empty() => {
                            return Some(Ok(ReadRecord::new(
                                row.chrom, row.start, row.end, calls,
                            )));
                        },
                        // Extraction leaves the column empty for reads
                        // without calls.
                        _ => self.skipped += 1,
                    }
                },
                Some(Err(e)) => {
                    return Some(Err(
                        anyhow::Error::new(e).context("Malformed table row")
                    ));
                },
                None => {
                    if self.skipped > 0 && !self.reported {
                        info!(
                            "Skipped {} row(s) without a call string",
                            self.skipped
                        );
                        self.reported = true;
                    }
                    return None;
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TableSource;

    #[test]
    fn test_table_rows_and_skips() {
        let data = "chr1\t0\t4\tzZhH\nchr1\t10\t12\t\nchr2\t5\t8\tHHH\n";
        let mut source = TableSource::new(data.as_bytes());

        let first = source.next().unwrap().unwrap();
        assert_eq!(first.chrom(), "chr1");
        assert_eq!((first.start(), first.end()), (0, 4));
        assert_eq!(first.calls(), "zZhH");

        // the empty-call row is dropped
        let second = source.next().unwrap().unwrap();
        assert_eq!(second.chrom(), "chr2");
        assert!(source.next().is_none());
        assert_eq!(source.skipped(), 1);
    }
}

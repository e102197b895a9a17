use std::fmt::Display;

use serde::{
    Deserialize,
    Serialize,
};

use super::typedef::PosType;

/// Prefixes a bare chromosome name with `chr` if it is not already carried.
pub fn canonical_chrom(name: &str) -> String {
    if name.starts_with("chr") {
        name.to_string()
    }
    else {
        format!("chr{}", name)
    }
}

/// One aligned read (or merged fragment) with its per-base call string.
///
/// Covers the half-open reference interval `[start, end)`. The call string
/// is expected to carry exactly one code per covered reference base; any
/// indel- or clip-induced misalignment must be resolved by the producing
/// source before records reach the bin aggregator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRecord {
    chrom: String,
    start: PosType,
    end:   PosType,
    calls: String,
}

impl ReadRecord {
    pub fn new(
        chrom: impl Into<String>,
        start: PosType,
        end: PosType,
        calls: impl Into<String>,
    ) -> Self {
        assert!(
            start < end,
            "Read interval must be non-empty and half-open"
        );
        Self {
            chrom: chrom.into(),
            start,
            end,
            calls: calls.into(),
        }
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> PosType {
        self.start
    }

    pub fn end(&self) -> PosType {
        self.end
    }

    pub fn calls(&self) -> &str {
        &self.calls
    }

    /// Length of the covered reference interval.
    pub fn length(&self) -> PosType {
        self.end - self.start
    }

    pub(crate) fn into_parts(self) -> (String, PosType, PosType, String) {
        (self.chrom, self.start, self.end, self.calls)
    }
}

impl Display for ReadRecord {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

//! Input sources and the score sink.
//!
//! Both sources produce the same lazy, ordered stream of
//! [`ReadRecord`](crate::data_structs::ReadRecord)s the aggregator
//! consumes: [`bam::BamSource`] decodes a coordinate-sorted Bismark
//! alignment file on a background thread, [`table::TableSource`] reads an
//! extracted tab-separated read-info table. [`write::ScoresWriter`]
//! serializes score rows as a tab-separated table with explicit `NA`
//! markers for undefined statistics.

pub mod bam;
pub mod table;
pub mod write;

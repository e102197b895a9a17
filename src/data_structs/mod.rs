//! Core data structures of the crate: the call-string alphabet and its
//! per-context normalization, aligned read records, per-bin score rows and
//! the shared numeric type aliases.

pub mod calls;
pub(crate) mod enums;
mod record;
mod scores;
pub mod typedef;


pub use calls::ContextFragments;
pub use enums::Context;
pub use record::{
    canonical_chrom,
    ReadRecord,
};
pub use scores::{
    BinScores,
    ContextScores,
};

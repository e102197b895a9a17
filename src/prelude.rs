pub use crate::binner::BinAggregator;
pub use crate::data_structs::calls::ContextFragments;
pub use crate::data_structs::typedef::{
    CountType,
    DensityType,
    PosType,
};
pub use crate::data_structs::{
    canonical_chrom,
    BinScores,
    Context,
    ContextScores,
    ReadRecord,
};
pub use crate::io::bam::BamSource;
pub use crate::io::table::TableSource;
pub use crate::io::write::ScoresWriter;

pub type PosType = u64;
pub type CountType = u64;
pub type DensityType = f64;

use std::convert::Infallible;
use std::fmt::Display;
use std::str::FromStr;

use serde::{
    Deserialize,
    Serialize,
};

/// Methylation context of a cytosine call.
///
/// CHG and CHH calls are folded into a single CH track during call-string
/// normalization, so only two contexts survive downstream.
#[derive(Eq, Hash, PartialEq, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum Context {
    /// Non-CpG context (CHG and CHH folded together).
    CH,
    /// CpG context.
    CG,
}

impl Context {
    /// Lowercase call code denoting an unmethylated site in this context.
    pub const fn unmeth_code(&self) -> char {
        match self {
            Context::CH => 'h',
            Context::CG => 'z',
        }
    }

    /// Uppercase call code denoting a methylated site in this context.
    pub const fn meth_code(&self) -> char {
        match self {
            Context::CH => 'H',
            Context::CG => 'Z',
        }
    }
}

impl Display for Context {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Context::CH => write!(f, "CH"),
            Context::CG => write!(f, "CG"),
        }
    }
}

impl FromStr for Context {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CG" | "CPG" => Ok(Context::CG),
            _ => Ok(Context::CH),
        }
    }
}

impl Serialize for Context {
    fn serialize<S>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer, {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Context {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>, {
        let s = String::deserialize(deserializer)?;
        FromStr::from_str(&s).map_err(serde::de::Error::custom)
    }
}

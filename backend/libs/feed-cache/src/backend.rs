use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which `CacheStore` a service builds at startup (`CACHE_BACKEND`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Redis,
    /// Process-local; invalidations from other processes are not seen
    Memory,
}

impl FromStr for CacheBackend {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(format!("Unsupported CACHE_BACKEND '{}'", other)),
        }
    }
}

impl fmt::Display for CacheBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheBackend::Redis => "redis",
            CacheBackend::Memory => "memory",
        })
    }
}

//! Counter configuration, loadable from JSON.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::table::{DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR};
use crate::tokenizer::DEFAULT_STRADDLE_CAPACITY;

/// Read buffer size used by the stream driver
pub const DEFAULT_CHUNK_SIZE: usize = 4096 * 16;

/// Key storage layout of the frequency table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableKind {
    #[default]
    Arena,
    Inline,
    /// `std::collections::HashMap`, the baseline the other layouts are
    /// measured against
    Std,
}

/// Word hash function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashKind {
    #[default]
    Fnv1,
    Fnv1a,
    Djb2Mix,
    Fx,
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashKind::Fnv1 => "fnv1",
            HashKind::Fnv1a => "fnv1a",
            HashKind::Djb2Mix => "djb2-mix",
            HashKind::Fx => "fx",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Arena => "arena",
            TableKind::Inline => "inline",
            TableKind::Std => "std",
        })
    }
}

impl FromStr for HashKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fnv1" => Ok(HashKind::Fnv1),
            "fnv1a" => Ok(HashKind::Fnv1a),
            "djb2-mix" => Ok(HashKind::Djb2Mix),
            "fx" => Ok(HashKind::Fx),
            other => Err(Error::InvalidConfig(format!(
                "unknown hasher '{other}', expected fnv1, fnv1a, djb2-mix or fx"
            ))),
        }
    }
}

impl FromStr for TableKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "arena" => Ok(TableKind::Arena),
            "inline" => Ok(TableKind::Inline),
            "std" => Ok(TableKind::Std),
            other => Err(Error::InvalidConfig(format!(
                "unknown table '{other}', expected arena, inline or std"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CounterConfig {
    /// Buckets allocated up front, rounded up to a power of two
    pub initial_capacity: usize,
    /// Fraction of occupied buckets that triggers growth, in (0, 1)
    pub max_load_factor: f32,
    /// Initial size of the tokenizer's straddle buffer
    pub straddle_capacity: usize,
    /// Bytes per read when counting a stream
    pub chunk_size: usize,
    pub table: TableKind,
    pub hasher: HashKind,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            max_load_factor: DEFAULT_MAX_LOAD_FACTOR,
            straddle_capacity: DEFAULT_STRADDLE_CAPACITY,
            chunk_size: DEFAULT_CHUNK_SIZE,
            table: TableKind::default(),
            hasher: HashKind::default(),
        }
    }
}

impl CounterConfig {
    /// Parses a JSON configuration. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CounterConfig =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunk_size must be at least 1".into()));
        }
        Ok(())
    }
}

//! Harness configuration.
//!
//! Resolved from environment variables, all optional:
//! - `CFILE_BENCH_DIR`: directory for the data files (default `.`).
//! - `CFILE_BENCH_SEED`: u64 seed for reproducible datasets. Unset or
//!   unparsable means a fresh OS seed per run.
//! - `CFILE_BENCH_FORMAT`: `plain` (default) or `jsonl` report lines.
//! - `CFILE_BENCH_LOG`: path of a structured JSONL log. Unset disables it.

use std::path::PathBuf;

use crate::dataset::DatasetKind;

pub const ENV_DIR: &str = "CFILE_BENCH_DIR";
pub const ENV_SEED: &str = "CFILE_BENCH_SEED";
pub const ENV_FORMAT: &str = "CFILE_BENCH_FORMAT";
pub const ENV_LOG: &str = "CFILE_BENCH_LOG";

/// How measurements are printed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// `name: N ms` lines grouped under phase headers.
    #[default]
    Plain,
    /// One JSON object per measurement.
    Jsonl,
}

impl ReportFormat {
    /// Parse from string (case-insensitive). Unknown values fall back to plain.
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "jsonl" | "json" | "ndjson" => Self::Jsonl,
            _ => Self::Plain,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchConfig {
    pub data_dir: PathBuf,
    pub seed: Option<u64>,
    pub format: ReportFormat,
    pub log_path: Option<PathBuf>,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            seed: None,
            format: ReportFormat::Plain,
            log_path: None,
        }
    }
}

impl BenchConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup. Empty values count as unset.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            data_dir: get(ENV_DIR).map_or(defaults.data_dir, PathBuf::from),
            seed: get(ENV_SEED).and_then(|v| v.trim().parse().ok()),
            format: get(ENV_FORMAT).map_or(defaults.format, |v| ReportFormat::from_str_loose(&v)),
            log_path: get(ENV_LOG).map(PathBuf::from),
        }
    }

    /// Data file for a dataset, overwritten on every run.
    #[must_use]
    pub fn data_path(&self, kind: DatasetKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }
}

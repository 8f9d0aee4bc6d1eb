//! Stdio write/read timing harness.
//!
//! For a requested value count, generates random integers and floating-point
//! numbers, writes them one per line through each [`Strategy`] (std buffered
//! files, raw libc streams, and several ways of driving a
//! [`cfile_core::CFile`]), then reads them back and sums them through the same
//! strategies. Each step is reported as elapsed milliseconds; read steps also
//! report the sum as a correctness check.

pub mod config;
pub mod dataset;
pub mod error;
pub mod runner;
pub mod strategy;
pub mod structured_log;

pub use config::{BenchConfig, ReportFormat};
pub use dataset::{DatasetKind, Value};
pub use error::BenchError;
pub use runner::{Measurement, Runner};
pub use strategy::{Phase, ReadTotal, STRATEGIES, Strategy, Transport};

//! Benchmark execution: generate both datasets, time every strategy through
//! the write phase and then the read phase, and report each measurement.

use std::error::Error as _;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;

use crate::config::{BenchConfig, ReportFormat};
use crate::dataset::{DatasetKind, Value, dataset_rng, generate};
use crate::error::BenchError;
use crate::strategy::{Phase, STRATEGIES, Strategy};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// One timed strategy run.
#[derive(Debug, Clone, Serialize)]
pub struct Measurement {
    pub dataset: DatasetKind,
    pub phase: Phase,
    pub strategy: &'static str,
    /// Values written, or values read back.
    pub count: usize,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<String>,
    /// Why the strategy did not run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    #[serde(skip)]
    errno: Option<i32>,
}

impl Measurement {
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skipped.is_some()
    }

    fn log_entry(&self) -> LogEntry {
        let (level, outcome) = if self.is_skipped() {
            (LogLevel::Warn, Outcome::Skip)
        } else {
            (LogLevel::Info, Outcome::Pass)
        };
        let mut entry = LogEntry::new("", level, "strategy_measured")
            .with_step(self.dataset, self.phase)
            .with_strategy(self.strategy)
            .with_count(self.count as u64)
            .with_elapsed_ms(self.elapsed_ms)
            .with_outcome(outcome);
        if let Some(sum) = &self.sum {
            entry = entry.with_sum(sum.clone());
        }
        if let Some(reason) = &self.skipped {
            entry = entry.with_details(serde_json::json!({ "reason": reason }));
        }
        if let Some(errno) = self.errno {
            entry = entry.with_errno(errno);
        }
        entry
    }
}

/// Plain report line, names right-aligned to the widest strategy name.
impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>12}: ", self.strategy)?;
        if let Some(reason) = &self.skipped {
            return write!(f, "skipped ({reason})");
        }
        if let Some(sum) = &self.sum {
            write!(f, "{sum} - ")?;
        }
        write!(f, "{} ms", self.elapsed_ms)
    }
}

/// Drives one benchmark run.
pub struct Runner<'a> {
    config: &'a BenchConfig,
    report: &'a mut dyn Write,
    log: Option<&'a mut LogEmitter>,
    measurements: Vec<Measurement>,
}

impl<'a> Runner<'a> {
    #[must_use]
    pub fn new(config: &'a BenchConfig, report: &'a mut dyn Write) -> Self {
        Self {
            config,
            report,
            log: None,
            measurements: Vec::new(),
        }
    }

    /// Also record every step in a structured log.
    #[must_use]
    pub fn with_log(mut self, log: &'a mut LogEmitter) -> Self {
        self.log = Some(log);
        self
    }

    /// Run both datasets with `count` values each.
    pub fn run(mut self, count: usize) -> Result<Vec<Measurement>, BenchError> {
        let config = self.config;
        fs::create_dir_all(&config.data_dir)?;
        self.log_event(
            LogLevel::Info,
            "run_start",
            serde_json::json!({
                "count": count,
                "seed": config.seed,
                "data_dir": config.data_dir.display().to_string(),
            }),
        )?;

        let mut rng = dataset_rng(config.seed);
        let integers: Vec<u32> = generate(&mut rng, count);
        self.run_dataset(&config.data_path(DatasetKind::Integral), &integers)?;
        let floats: Vec<f64> = generate(&mut rng, count);
        self.run_dataset(&config.data_path(DatasetKind::FloatingPoint), &floats)?;

        let skipped = self.measurements.iter().filter(|m| m.is_skipped()).count();
        self.log_event(
            LogLevel::Info,
            "run_end",
            serde_json::json!({
                "measurements": self.measurements.len(),
                "skipped": skipped,
            }),
        )?;
        self.report.flush()?;
        if let Some(log) = self.log.as_deref_mut() {
            log.flush()?;
        }
        Ok(self.measurements)
    }

    fn run_dataset<T: Value>(&mut self, path: &Path, values: &[T]) -> Result<(), BenchError> {
        for phase in [Phase::Write, Phase::Read] {
            if self.config.format == ReportFormat::Plain {
                writeln!(self.report, "{phase} benchmark ({})", T::KIND)?;
            }
            for strategy in STRATEGIES {
                let m = measure(strategy, phase, path, values)?;
                self.record(m)?;
            }
            if self.config.format == ReportFormat::Plain {
                writeln!(self.report)?;
            }
        }
        Ok(())
    }

    fn record(&mut self, m: Measurement) -> Result<(), BenchError> {
        match self.config.format {
            ReportFormat::Plain => writeln!(self.report, "{m}")?,
            ReportFormat::Jsonl => writeln!(self.report, "{}", serde_json::to_string(&m)?)?,
        }
        if let Some(log) = self.log.as_deref_mut() {
            log.emit_entry(m.log_entry())?;
        }
        self.measurements.push(m);
        Ok(())
    }

    fn log_event(
        &mut self,
        level: LogLevel,
        event: &str,
        details: serde_json::Value,
    ) -> io::Result<()> {
        if let Some(log) = self.log.as_deref_mut() {
            log.emit_entry(LogEntry::new("", level, event).with_details(details))?;
        }
        Ok(())
    }
}

/// Time one strategy. Open failures become a skipped measurement; any other
/// failure aborts the run.
fn measure<T: Value>(
    strategy: Strategy,
    phase: Phase,
    path: &Path,
    values: &[T],
) -> Result<Measurement, BenchError> {
    let start = Instant::now();
    let result = match phase {
        Phase::Write => strategy.write(path, values).map(|()| (values.len(), None)),
        Phase::Read => strategy
            .read::<T>(path)
            .map(|total| (total.count, Some(total.sum.to_string()))),
    };
    let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut m = Measurement {
        dataset: T::KIND,
        phase,
        strategy: strategy.name(phase),
        count: 0,
        elapsed_ms,
        sum: None,
        skipped: None,
        errno: None,
    };
    match result {
        Ok((count, sum)) => {
            m.count = count;
            m.sum = sum;
        }
        Err(err) if err.is_open_failure() => {
            m.errno = open_errno(&err);
            m.skipped = Some(err.to_string());
        }
        Err(err) => return Err(err),
    }
    Ok(m)
}

fn open_errno(err: &BenchError) -> Option<i32> {
    let mut current: &(dyn std::error::Error + 'static) = err.source()?;
    loop {
        if let Some(io_err) = current.downcast_ref::<io::Error>() {
            return io_err.raw_os_error();
        }
        current = current.source()?;
    }
}

//! CLI entrypoint: `cfile-bench <count>`.

use std::io::Write;
use std::process::ExitCode;

use cfile_bench::structured_log::LogEmitter;
use cfile_bench::{BenchConfig, BenchError, Runner};
use clap::Parser;
use clap::error::ErrorKind;

/// Time equivalent ways of writing and reading numbers through C stdio.
///
/// Data files go to `CFILE_BENCH_DIR` (default: current directory).
/// `CFILE_BENCH_SEED`, `CFILE_BENCH_FORMAT` (plain|jsonl) and
/// `CFILE_BENCH_LOG` (JSONL log path, `-` for stdout) tune the run.
#[derive(Debug, Parser)]
#[command(name = "cfile-bench", version)]
struct Cli {
    /// Number of values per dataset.
    count: usize,
}

fn run_id() -> String {
    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    format!("{}-{millis}", std::process::id())
}

fn run(cli: &Cli, config: &BenchConfig) -> Result<(), BenchError> {
    let stdout = std::io::stdout();
    let mut report = stdout.lock();

    let mut log = match config.log_path.as_deref() {
        None => None,
        Some(path) if path.as_os_str() == "-" => Some(LogEmitter::to_stdout(&run_id())),
        Some(path) => Some(LogEmitter::to_file(path, &run_id())?),
    };

    let mut runner = Runner::new(config, &mut report);
    if let Some(log) = log.as_mut() {
        runner = runner.with_log(log);
    }
    runner.run(cli.count)?;
    report.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    let config = BenchConfig::from_env();
    match run(&cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cfile-bench: {err}");
            ExitCode::from(1)
        }
    }
}

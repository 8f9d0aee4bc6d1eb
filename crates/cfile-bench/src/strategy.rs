//! The write/read strategies being compared.
//!
//! Every strategy writes one value per line and reads values back until the
//! first conversion failure or end of file. The stream is acquired inside the
//! strategy so that open and close are part of what gets timed.

use std::ffi::{CStr, CString};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use cfile_core::{BufReadSource, CFile, CFileError, cprintf, cscanf};
use serde::{Deserialize, Serialize};

use crate::dataset::{Text, Value};
use crate::error::BenchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Write,
    Read,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Write => "write",
            Self::Read => "read",
        })
    }
}

/// How a strategy reaches the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    /// std `File` behind `BufWriter`/`BufReader`.
    Buffered,
    /// Raw libc `fopen`/`fprintf`/`fscanf`/`fclose`.
    Libc,
    /// `cprintf!`/`cscanf!` on a `CFile`.
    CFile,
    /// libc `fprintf`/`fscanf` on the stream borrowed from a `CFile`.
    CFilePtr,
    /// The `std::io` traits implemented by `CFile`.
    IoCFile,
    /// A caller-supplied `dyn Write`/`dyn BufRead` stream.
    Stream,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub transport: Transport,
    /// Open with `"wb"`/`"rb"`. Only meaningful where the open call takes a
    /// mode string.
    pub binary: bool,
}

const fn strategy(transport: Transport, binary: bool) -> Strategy {
    Strategy { transport, binary }
}

/// Every strategy, in report order.
pub const STRATEGIES: [Strategy; 9] = [
    strategy(Transport::Buffered, false),
    strategy(Transport::Libc, false),
    strategy(Transport::Libc, true),
    strategy(Transport::CFile, false),
    strategy(Transport::CFile, true),
    strategy(Transport::CFilePtr, false),
    strategy(Transport::CFilePtr, true),
    strategy(Transport::IoCFile, false),
    strategy(Transport::Stream, false),
];

/// Values read back by one strategy.
#[derive(Debug, Clone, Copy)]
pub struct ReadTotal<T: Value> {
    pub sum: T::Sum,
    pub count: usize,
}

impl<T: Value> ReadTotal<T> {
    fn new() -> Self {
        Self {
            sum: T::Sum::default(),
            count: 0,
        }
    }

    fn add(&mut self, value: T) {
        value.accumulate(&mut self.sum);
        self.count += 1;
    }
}

impl Strategy {
    /// Report name. The buffered transport is named after its std wrapper,
    /// which differs per phase.
    #[must_use]
    pub const fn name(self, phase: Phase) -> &'static str {
        match (self.transport, self.binary) {
            (Transport::Buffered, _) => match phase {
                Phase::Write => "bufwriter",
                Phase::Read => "bufreader",
            },
            (Transport::Libc, false) => "FILE*",
            (Transport::Libc, true) => "bin FILE*",
            (Transport::CFile, false) => "cfile",
            (Transport::CFile, true) => "bin cfile",
            (Transport::CFilePtr, false) => "() cfile",
            (Transport::CFilePtr, true) => "bin () cfile",
            (Transport::IoCFile, _) => "io cfile",
            (Transport::Stream, _) => "stream",
        }
    }

    const fn mode(self, phase: Phase) -> &'static str {
        match (phase, self.binary) {
            (Phase::Write, false) => "w",
            (Phase::Write, true) => "wb",
            (Phase::Read, false) => "r",
            (Phase::Read, true) => "rb",
        }
    }

    const fn c_mode(self, phase: Phase) -> &'static CStr {
        match (phase, self.binary) {
            (Phase::Write, false) => c"w",
            (Phase::Write, true) => c"wb",
            (Phase::Read, false) => c"r",
            (Phase::Read, true) => c"rb",
        }
    }

    /// Write `values` to `path`, one per line, replacing the file.
    pub fn write<T: Value>(self, path: &Path, values: &[T]) -> Result<(), BenchError> {
        let mode = self.mode(Phase::Write);
        match self.transport {
            Transport::Buffered => {
                let mut out = BufWriter::new(create(path)?);
                for &v in values {
                    writeln!(out, "{}", Text(v))?;
                }
                out.flush()?;
            }
            Transport::Libc => write_libc(path, self.c_mode(Phase::Write), values)?,
            Transport::CFile => {
                let mut f = CFile::try_open(path, mode)?;
                for &v in values {
                    cprintf!(f, "{}\n", Text(v))?;
                }
                f.try_close()?;
            }
            Transport::CFilePtr => {
                let f = CFile::try_open(path, mode)?;
                let stream = f.as_file().ok_or(CFileError::Unlinked)?;
                for &v in values {
                    // SAFETY: `stream` borrows `f`, which is open and not
                    // touched through any other path during the loop.
                    if unsafe { T::fprintf(stream.as_raw(), v) } < 0 {
                        return Err(io::Error::last_os_error().into());
                    }
                }
            }
            Transport::IoCFile => {
                let mut f = CFile::try_open(path, mode)?;
                for &v in values {
                    writeln!(f, "{}", Text(v))?;
                }
                f.try_close()?;
            }
            Transport::Stream => {
                let mut out = BufWriter::new(create(path)?);
                write_stream(&mut out, values)?;
                out.flush()?;
            }
        }
        Ok(())
    }

    /// Read `path` back, summing values until the first one that does not
    /// convert.
    pub fn read<T: Value>(self, path: &Path) -> Result<ReadTotal<T>, BenchError> {
        let mode = self.mode(Phase::Read);
        match self.transport {
            Transport::Buffered => read_lines(BufReader::new(open(path)?)),
            Transport::Libc => read_libc(path, self.c_mode(Phase::Read)),
            Transport::CFile => {
                let mut f = CFile::try_open(path, mode)?;
                let mut total = ReadTotal::new();
                let mut v = T::default();
                while cscanf!(f, &mut v) == 1 {
                    total.add(v);
                }
                Ok(total)
            }
            Transport::CFilePtr => {
                let f = CFile::try_open(path, mode)?;
                let stream = f.as_file().ok_or(CFileError::Unlinked)?;
                let mut total = ReadTotal::new();
                let mut v = T::default();
                // SAFETY: `stream` borrows `f`, which is open for the whole loop.
                while unsafe { T::fscanf(stream.as_raw(), &mut v) } == 1 {
                    total.add(v);
                }
                Ok(total)
            }
            Transport::IoCFile => read_lines(BufReader::new(CFile::try_open(path, mode)?)),
            Transport::Stream => read_stream(&mut BufReader::new(open(path)?)),
        }
    }
}

/// Write `values` to an explicit output stream.
pub fn write_stream<T: Value>(out: &mut dyn Write, values: &[T]) -> io::Result<()> {
    for &v in values {
        writeln!(out, "{}", Text(v))?;
    }
    Ok(())
}

/// Scan values from an explicit input stream until the first field that
/// does not convert.
pub fn read_stream<T: Value>(input: &mut dyn BufRead) -> Result<ReadTotal<T>, BenchError> {
    let mut src = BufReadSource::new(input);
    let mut total = ReadTotal::new();
    while let Some(v) = T::scan(&mut src)? {
        total.add(v);
    }
    Ok(total)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn create(path: &Path) -> Result<File, BenchError> {
    File::create(path).map_err(|source| BenchError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn open(path: &Path) -> Result<File, BenchError> {
    File::open(path).map_err(|source| BenchError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Whitespace-separated tokens parsed with `FromStr`.
fn read_lines<T: Value, R: BufRead>(mut input: R) -> Result<ReadTotal<T>, BenchError> {
    let mut total = ReadTotal::new();
    let mut line = String::new();
    loop {
        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(total);
        }
        for token in line.split_ascii_whitespace() {
            let Ok(v) = token.parse::<T>() else {
                return Ok(total);
            };
            total.add(v);
        }
    }
}

fn fopen(path: &Path, mode: &CStr) -> Result<*mut libc::FILE, BenchError> {
    let c_path =
        CString::new(path.as_os_str().as_bytes()).map_err(|_| BenchError::from(CFileError::NulByte))?;
    // SAFETY: both arguments are NUL-terminated.
    let file = unsafe { libc::fopen(c_path.as_ptr(), mode.as_ptr()) };
    if file.is_null() {
        return Err(BenchError::Open {
            path: path.to_path_buf(),
            source: io::Error::last_os_error(),
        });
    }
    Ok(file)
}

fn fclose(file: *mut libc::FILE) -> io::Result<()> {
    // SAFETY: `file` came from fopen and is closed exactly once here.
    if unsafe { libc::fclose(file) } == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

fn write_libc<T: Value>(path: &Path, mode: &CStr, values: &[T]) -> Result<(), BenchError> {
    let file = fopen(path, mode)?;
    let mut failure = None;
    for &v in values {
        // SAFETY: `file` is open until the fclose below.
        if unsafe { T::fprintf(file, v) } < 0 {
            failure = Some(io::Error::last_os_error());
            break;
        }
    }
    let closed = fclose(file);
    if let Some(err) = failure {
        return Err(err.into());
    }
    Ok(closed?)
}

fn read_libc<T: Value>(path: &Path, mode: &CStr) -> Result<ReadTotal<T>, BenchError> {
    let file = fopen(path, mode)?;
    let mut total = ReadTotal::new();
    let mut v = T::default();
    // SAFETY: `file` is open until the fclose below.
    while unsafe { T::fscanf(file, &mut v) } == 1 {
        total.add(v);
    }
    fclose(file)?;
    Ok(total)
}

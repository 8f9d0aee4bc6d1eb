//! Benchmark datasets: the value types, how they are generated, and how each
//! is spelled in text and through the C stdio formats.

use std::ffi::{c_int, c_uint};
use std::fmt;
use std::ptr;
use std::str::FromStr;

use cfile_core::Scan;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Integral,
    FloatingPoint,
}

impl DatasetKind {
    /// Name of the data file, relative to the data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Integral => "data.dat",
            Self::FloatingPoint => "data-f.dat",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integral => "integral",
            Self::FloatingPoint => "floating point",
        })
    }
}

/// A numeric type the harness writes one per line and sums on read.
pub trait Value: Scan + FromStr + Default + Copy + fmt::Debug + 'static {
    /// Accumulator for the read phase.
    type Sum: Copy + Default + PartialEq + fmt::Display + fmt::Debug;

    const KIND: DatasetKind;

    fn generate<R: Rng>(rng: &mut R) -> Self;

    fn accumulate(self, sum: &mut Self::Sum);

    /// Text form, identical to what [`Value::fprintf`] produces minus the
    /// newline.
    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result;

    /// `fprintf(file, "<fmt>\n", value)`.
    ///
    /// # Safety
    ///
    /// `file` must be an open stream.
    unsafe fn fprintf(file: *mut libc::FILE, value: Self) -> c_int;

    /// `fscanf(file, "<fmt>", out)`, returning the number of fields assigned.
    ///
    /// # Safety
    ///
    /// `file` must be an open stream.
    unsafe fn fscanf(file: *mut libc::FILE, out: &mut Self) -> c_int;
}

/// Drawn from the non-negative C `int` range.
impl Value for u32 {
    type Sum = u64;

    const KIND: DatasetKind = DatasetKind::Integral;

    fn generate<R: Rng>(rng: &mut R) -> Self {
        rng.random_range(0..=i32::MAX.unsigned_abs())
    }

    fn accumulate(self, sum: &mut u64) {
        *sum += u64::from(self);
    }

    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }

    unsafe fn fprintf(file: *mut libc::FILE, value: Self) -> c_int {
        // SAFETY: the caller guarantees `file`; "%u" matches an unsigned int.
        unsafe { libc::fprintf(file, c"%u\n".as_ptr(), c_uint::from(value)) }
    }

    unsafe fn fscanf(file: *mut libc::FILE, out: &mut Self) -> c_int {
        // SAFETY: the caller guarantees `file`; "%u" stores an unsigned int.
        unsafe { libc::fscanf(file, c"%u".as_ptr(), ptr::from_mut(out)) }
    }
}

/// Uniform in `[0, 1)`, printed with six decimals like `%f`.
impl Value for f64 {
    type Sum = f64;

    const KIND: DatasetKind = DatasetKind::FloatingPoint;

    fn generate<R: Rng>(rng: &mut R) -> Self {
        rng.random::<f64>()
    }

    fn accumulate(self, sum: &mut f64) {
        *sum += self;
    }

    fn fmt_text(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:.6}")
    }

    unsafe fn fprintf(file: *mut libc::FILE, value: Self) -> c_int {
        // SAFETY: the caller guarantees `file`; "%f" matches a double.
        unsafe { libc::fprintf(file, c"%f\n".as_ptr(), value) }
    }

    unsafe fn fscanf(file: *mut libc::FILE, out: &mut Self) -> c_int {
        // SAFETY: the caller guarantees `file`; "%lf" stores a double.
        unsafe { libc::fscanf(file, c"%lf".as_ptr(), ptr::from_mut(out)) }
    }
}

/// Displays a [`Value`] in its text form.
#[derive(Debug, Clone, Copy)]
pub struct Text<T>(pub T);

impl<T: Value> fmt::Display for Text<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_text(f)
    }
}

/// Seeded when `seed` is given, otherwise from the OS.
#[must_use]
pub fn dataset_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

#[must_use]
pub fn generate<T: Value, R: Rng>(rng: &mut R, count: usize) -> Vec<T> {
    (0..count).map(|_| T::generate(rng)).collect()
}

/// Expected read-phase sum of `values`.
#[must_use]
pub fn expected_sum<T: Value>(values: &[T]) -> T::Sum {
    let mut sum = T::Sum::default();
    for &v in values {
        v.accumulate(&mut sum);
    }
    sum
}

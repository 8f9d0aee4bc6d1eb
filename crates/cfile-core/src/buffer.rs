//! Stream buffering modes.
//!
//! Reference: POSIX.1-2024 setvbuf, ISO C11 7.21.5.6

/// Minimum buffer size accepted by `setbuf` (glibc `BUFSIZ`).
pub const BUFSIZ: usize = 8192;

/// Buffering mode matching `_IOFBF`, `_IOLBF`, `_IONBF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufMode {
    /// Fully buffered: flush when buffer is full.
    Full,
    /// Line buffered: flush on newline or buffer full.
    Line,
    /// Unbuffered: every write goes straight to the descriptor.
    None,
}

impl BufMode {
    /// Convert from the C `setvbuf` mode constant.
    pub fn from_posix(mode: i32) -> Option<BufMode> {
        match mode {
            libc::_IOFBF => Some(BufMode::Full),
            libc::_IOLBF => Some(BufMode::Line),
            libc::_IONBF => Some(BufMode::None),
            _ => Option::None,
        }
    }

    pub fn to_posix(self) -> i32 {
        match self {
            BufMode::Full => libc::_IOFBF,
            BufMode::Line => libc::_IOLBF,
            BufMode::None => libc::_IONBF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posix_constants_roundtrip() {
        for mode in [BufMode::Full, BufMode::Line, BufMode::None] {
            assert_eq!(BufMode::from_posix(mode.to_posix()), Some(mode));
        }
        assert_eq!(BufMode::from_posix(42), None);
    }
}

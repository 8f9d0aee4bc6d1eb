//! fopen mode strings.
//!
//! Reference: POSIX.1-2024 fopen, ISO C11 7.21.5.3
//!
//! Modes are validated before they reach the C library so that a malformed
//! mode is reported as [`CFileError::InvalidMode`] instead of being handed to
//! `fopen`, whose behavior for unknown modes is implementation-defined.

use std::ffi::{CStr, CString};
use std::fmt;
use std::str::FromStr;

use crate::error::CFileError;

/// Flags decoded from a mode string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub readable: bool,
    pub writable: bool,
    pub append: bool,
    pub truncate: bool,
    pub create: bool,
    /// `b` modifier. Only meaningful where the host translates line endings.
    pub binary: bool,
    pub exclusive: bool,
}

/// Parse a fopen mode string (e.g. "r", "w+", "rb", "a+b").
///
/// Returns `None` if the mode string is invalid.
pub fn parse_mode(mode: &[u8]) -> Option<OpenFlags> {
    let (&base, modifiers) = mode.split_first()?;

    let mut flags = OpenFlags::default();
    match base {
        b'r' => flags.readable = true,
        b'w' => {
            flags.writable = true;
            flags.create = true;
            flags.truncate = true;
        }
        b'a' => {
            flags.writable = true;
            flags.create = true;
            flags.append = true;
        }
        _ => return None,
    }

    // '+', 'b', 'x' in any order, each at most once.
    let mut seen_plus = false;
    for &m in modifiers {
        match m {
            b'+' if !seen_plus => {
                seen_plus = true;
                flags.readable = true;
                flags.writable = true;
            }
            b'b' if !flags.binary => flags.binary = true,
            // C11: 'x' is only valid together with 'w'.
            b'x' if base == b'w' && !flags.exclusive => flags.exclusive = true,
            _ => return None,
        }
    }

    Some(flags)
}

/// A validated mode string, ready to pass to `fopen`/`freopen`.
#[derive(Clone, PartialEq, Eq)]
pub struct OpenMode {
    flags: OpenFlags,
    raw: CString,
}

impl OpenMode {
    pub fn parse(mode: &str) -> Result<Self, CFileError> {
        let flags =
            parse_mode(mode.as_bytes()).ok_or_else(|| CFileError::InvalidMode(mode.to_owned()))?;
        // parse_mode rejects every byte outside "rwa+bx", so NUL cannot appear.
        let raw = CString::new(mode).map_err(|_| CFileError::NulByte)?;
        Ok(Self { flags, raw })
    }

    pub fn flags(&self) -> OpenFlags {
        self.flags
    }

    pub fn as_str(&self) -> &str {
        // Constructed from a &str that passed parse_mode, so always ASCII.
        self.raw.to_str().unwrap_or_default()
    }

    pub fn as_c_str(&self) -> &CStr {
        &self.raw
    }
}

impl FromStr for OpenMode {
    type Err = CFileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OpenMode({:?})", self.as_str())
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode_read() {
        let f = parse_mode(b"r").unwrap();
        assert!(f.readable);
        assert!(!f.writable);
        assert!(!f.append);
    }

    #[test]
    fn test_parse_mode_write() {
        let f = parse_mode(b"w").unwrap();
        assert!(!f.readable);
        assert!(f.writable);
        assert!(f.truncate);
        assert!(f.create);
    }

    #[test]
    fn test_parse_mode_append_plus() {
        let f = parse_mode(b"a+").unwrap();
        assert!(f.readable);
        assert!(f.writable);
        assert!(f.append);
    }

    #[test]
    fn test_parse_mode_binary_any_order() {
        assert_eq!(parse_mode(b"r+b"), parse_mode(b"rb+"));
        let f = parse_mode(b"wb").unwrap();
        assert!(f.binary);
        assert!(f.writable);
    }

    #[test]
    fn test_parse_mode_exclusive() {
        let f = parse_mode(b"wx").unwrap();
        assert!(f.writable);
        assert!(f.exclusive);
        assert!(parse_mode(b"rx").is_none());
    }

    #[test]
    fn test_parse_mode_invalid() {
        assert!(parse_mode(b"").is_none());
        assert!(parse_mode(b"z").is_none());
        assert!(parse_mode(b"rbb").is_none());
        assert!(parse_mode(b"r++").is_none());
        assert!(parse_mode(b"rt").is_none());
    }

    #[test]
    fn open_mode_keeps_c_string() {
        let mode: OpenMode = "rb".parse().unwrap();
        assert_eq!(mode.as_c_str().to_bytes(), b"rb");
        assert_eq!(mode.to_string(), "rb");
        assert!(mode.flags().binary);
    }

    #[test]
    fn open_mode_rejects_garbage() {
        let err = OpenMode::parse("q").unwrap_err();
        assert!(matches!(err, CFileError::InvalidMode(ref m) if m == "q"));
        assert!(OpenMode::parse("r\0").is_err());
    }
}

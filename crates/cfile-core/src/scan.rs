//! Typed formatted input.
//!
//! The scanf family trusts the caller to pair every conversion with a pointer
//! of the right type. Here each target's type selects its own token grammar
//! through [`Scan`], so a mismatch is a type error instead of memory
//! corruption. Conversions follow fscanf rules where they matter for numeric
//! data:
//!
//! - leading whitespace is skipped before every field;
//! - the longest prefix that fits the field's grammar is consumed;
//! - the first byte that does not fit is pushed back, never consumed;
//! - a field that is empty or fails to parse is a matching failure.
//!
//! Only one byte of pushback is ever needed, which is all `ungetc` guarantees.

use std::io::{self, BufRead};

use crate::error::CFileError;

/// A byte stream with single-byte pushback.
pub trait ByteSource {
    /// Next byte, or `None` at end of input.
    fn next_byte(&mut self) -> Result<Option<u8>, CFileError>;

    /// Return `byte` to the stream so the next `next_byte` yields it.
    fn push_back(&mut self, byte: u8) -> Result<(), CFileError>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn next_byte(&mut self) -> Result<Option<u8>, CFileError> {
        (**self).next_byte()
    }

    fn push_back(&mut self, byte: u8) -> Result<(), CFileError> {
        (**self).push_back(byte)
    }
}

/// Adapts any [`BufRead`] into a [`ByteSource`].
pub struct BufReadSource<R: ?Sized> {
    pending: Option<u8>,
    inner: R,
}

impl<R: BufRead> BufReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self {
            pending: None,
            inner,
        }
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: BufRead + ?Sized> ByteSource for BufReadSource<R> {
    fn next_byte(&mut self) -> Result<Option<u8>, CFileError> {
        if let Some(b) = self.pending.take() {
            return Ok(Some(b));
        }
        loop {
            match self.inner.fill_buf() {
                Ok([]) => return Ok(None),
                Ok(buf) => {
                    let b = buf[0];
                    self.inner.consume(1);
                    return Ok(Some(b));
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(CFileError::Transfer { op: "read", source: e }),
            }
        }
    }

    fn push_back(&mut self, byte: u8) -> Result<(), CFileError> {
        debug_assert!(self.pending.is_none(), "only one byte of pushback");
        self.pending = Some(byte);
        Ok(())
    }
}

/// A value that can be read as one whitespace-delimited field.
pub trait Scan: Sized {
    /// Read one field. `Ok(None)` means end of input before the field started
    /// or a matching failure; the caller tells them apart with `eof()`.
    fn scan<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Self>, CFileError>;
}

fn skip_whitespace<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<u8>, CFileError> {
    while let Some(b) = src.next_byte()? {
        if !b.is_ascii_whitespace() {
            return Ok(Some(b));
        }
    }
    Ok(None)
}

/// Collect the longest token whose bytes satisfy `accept(index, byte)`.
fn scan_token<S, F>(src: &mut S, mut accept: F) -> Result<Option<String>, CFileError>
where
    S: ByteSource + ?Sized,
    F: FnMut(usize, u8) -> bool,
{
    let Some(first) = skip_whitespace(src)? else {
        return Ok(None);
    };
    if !accept(0, first) {
        src.push_back(first)?;
        return Ok(None);
    }

    let mut token = vec![first];
    while let Some(b) = src.next_byte()? {
        if accept(token.len(), b) {
            token.push(b);
        } else {
            src.push_back(b)?;
            break;
        }
    }
    // Every accepted byte is ASCII.
    Ok(Some(String::from_utf8_lossy(&token).into_owned()))
}

fn signed_int_token<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<String>, CFileError> {
    scan_token(src, |i, b| b.is_ascii_digit() || (i == 0 && (b == b'-' || b == b'+')))
}

fn unsigned_int_token<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<String>, CFileError> {
    scan_token(src, |i, b| b.is_ascii_digit() || (i == 0 && b == b'+'))
}

/// Position inside a `%f` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatState {
    Start,
    Sign,
    /// A `.` with no digits before it.
    Dot,
    Int,
    Frac,
    Exp,
    ExpSign,
    ExpDigits,
    /// Inside `inf`, `infinity` or `nan`.
    Word,
}

impl FloatState {
    /// State after appending `b` to `token`, or `None` when `b` cannot extend
    /// any valid number.
    fn step(self, token: &[u8], b: u8) -> Option<Self> {
        use FloatState::*;
        match (self, b) {
            (Start, b'+' | b'-') => Some(Sign),
            (Start | Sign | Int, b'0'..=b'9') => Some(Int),
            (Start | Sign, b'.') => Some(Dot),
            (Int, b'.') => Some(Frac),
            (Dot | Frac, b'0'..=b'9') => Some(Frac),
            (Int | Frac, b'e' | b'E') => Some(Exp),
            (Exp, b'+' | b'-') => Some(ExpSign),
            (Exp | ExpSign | ExpDigits, b'0'..=b'9') => Some(ExpDigits),
            (Start | Sign | Word, _) if extends_word(token, b) => Some(Word),
            _ => None,
        }
    }
}

fn extends_word(token: &[u8], b: u8) -> bool {
    let word = token.strip_prefix(b"+").or_else(|| token.strip_prefix(b"-")).unwrap_or(token);
    let next = word.len();
    [&b"infinity"[..], b"nan"].iter().any(|name| {
        name.len() > next
            && name[..next].eq_ignore_ascii_case(word)
            && name[next].eq_ignore_ascii_case(&b)
    })
}

/// `%f`: stops at the first byte that cannot extend a valid number, so
/// `10a` reads `10` and `1.2.3` reads `1.2`. With one byte of pushback a
/// dangling exponent such as `3e` stays consumed and fails to convert.
fn float_token<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<String>, CFileError> {
    let Some(first) = skip_whitespace(src)? else {
        return Ok(None);
    };
    let mut token = Vec::new();
    let Some(mut state) = FloatState::Start.step(&token, first) else {
        src.push_back(first)?;
        return Ok(None);
    };
    token.push(first);

    while let Some(b) = src.next_byte()? {
        match state.step(&token, b) {
            Some(next) => {
                state = next;
                token.push(b);
            }
            None => {
                src.push_back(b)?;
                break;
            }
        }
    }
    Ok(Some(String::from_utf8_lossy(&token).into_owned()))
}

macro_rules! impl_scan_parse {
    ($token:ident => $($t:ty),* $(,)?) => {
        $(
            impl Scan for $t {
                fn scan<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Self>, CFileError> {
                    Ok($token(src)?.and_then(|tok| tok.parse().ok()))
                }
            }
        )*
    };
}

impl_scan_parse!(signed_int_token => i8, i16, i32, i64, i128, isize);
impl_scan_parse!(unsigned_int_token => u8, u16, u32, u64, u128, usize);
impl_scan_parse!(float_token => f32, f64);

/// `%s`: a run of non-whitespace bytes.
impl Scan for String {
    fn scan<S: ByteSource + ?Sized>(src: &mut S) -> Result<Option<Self>, CFileError> {
        let Some(first) = skip_whitespace(src)? else {
            return Ok(None);
        };
        let mut bytes = vec![first];
        while let Some(b) = src.next_byte()? {
            if b.is_ascii_whitespace() {
                src.push_back(b)?;
                break;
            }
            bytes.push(b);
        }
        Ok(String::from_utf8(bytes).ok())
    }
}

/// Read fields into each target in order, stopping at the first failure.
///
/// Evaluates to the number of fields successfully assigned, like the return
/// value of `fscanf`. Target types drive the conversion:
///
/// ```ignore
/// let (mut id, mut score) = (0u32, 0.0f64);
/// if cscanf!(file, &mut id, &mut score) == 2 { /* ... */ }
/// ```
#[macro_export]
macro_rules! cscanf {
    ($src:expr, $($target:expr),+ $(,)?) => {{
        let __src = &mut $src;
        let mut __matched = 0usize;
        'fields: {
            $(
                match $crate::scan::Scan::scan(&mut *__src) {
                    ::core::result::Result::Ok(::core::option::Option::Some(value)) => {
                        *$target = value;
                        __matched += 1;
                    }
                    _ => break 'fields,
                }
            )+
        }
        __matched
    }};
}

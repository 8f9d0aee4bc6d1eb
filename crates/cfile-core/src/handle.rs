//! Owning handle for a C stdio stream.
//!
//! A [`CFile`] owns at most one `FILE*`. The stream is closed exactly once:
//! by [`CFile::close`], by `Drop`, or by whoever takes it through
//! [`CFile::release`]. Moving a `CFile` moves the stream; there is no `Clone`.
//!
//! Every operation other than the constructors, `close` and `release`
//! requires a linked handle and returns [`CFileError::Unlinked`] otherwise,
//! so a null stream never reaches the C library.

use std::ffi::{CString, c_char, c_int, c_long, c_void};
use std::fmt;
use std::io::{self, SeekFrom};
use std::marker::PhantomData;
use std::os::fd::RawFd;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};
use std::ptr::{self, NonNull};

use crate::buffer::{BUFSIZ, BufMode};
use crate::error::CFileError;
use crate::mode::OpenMode;
use crate::pod::Pod;
use crate::scan::{ByteSource, Scan};

/// Whether a handle currently owns an open stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Linked,
    Unlinked,
}

/// Opaque stream position from [`CFile::getpos`], valid only for the stream
/// it was taken from.
#[derive(Clone, Copy)]
#[repr(C, align(16))]
pub struct StreamPos {
    // Storage for the platform `fpos_t` (16 bytes on glibc and musl).
    raw: [u8; 32],
}

const _: () = assert!(size_of::<libc::fpos_t>() <= size_of::<StreamPos>());

impl fmt::Debug for StreamPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StreamPos(..)")
    }
}

/// A borrowed, open stream, tied to the [`CFile`] it came from like
/// `BorrowedFd` is tied to its owner.
///
/// The view cannot outlive its handle:
///
/// ```compile_fail,E0716
/// let view = cfile_core::CFile::new().as_file();
/// assert!(view.is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BorrowedFile<'a> {
    file: NonNull<libc::FILE>,
    _owner: PhantomData<&'a CFile>,
}

impl BorrowedFile<'_> {
    /// The raw stream for a C call. It must not be closed, reopened, or
    /// adopted through [`CFile::from_raw`].
    pub fn as_raw(self) -> *mut libc::FILE {
        self.file.as_ptr()
    }
}

/// Owning wrapper around a `FILE*`.
pub struct CFile {
    file: Option<NonNull<libc::FILE>>,
    /// Buffer installed with `setbuf`/`setvbuf`. Dropped only after the
    /// stream stops referencing it.
    buffer: Option<Box<[u8]>>,
}

// SAFETY: the handle is the sole owner of its stream and stdio streams carry
// their own lock, so handing ownership to another thread is sound. `CFile` is
// not `Sync`: shared access must be serialized by the caller.
unsafe impl Send for CFile {}

fn path_to_cstring(path: &Path) -> Result<CString, CFileError> {
    CString::new(path.as_os_str().as_bytes()).map_err(|_| CFileError::NulByte)
}

fn open_stream(path: &Path, mode: &str) -> Result<NonNull<libc::FILE>, CFileError> {
    let mode = OpenMode::parse(mode)?;
    let c_path = path_to_cstring(path)?;
    // SAFETY: both arguments are valid NUL-terminated strings.
    let file = unsafe { libc::fopen(c_path.as_ptr(), mode.as_c_str().as_ptr()) };
    NonNull::new(file).ok_or_else(|| CFileError::Open {
        path: path.to_path_buf(),
        mode: mode.to_string(),
        source: io::Error::last_os_error(),
    })
}

impl CFile {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Create an unlinked handle.
    pub const fn new() -> Self {
        Self {
            file: None,
            buffer: None,
        }
    }

    /// Adopt an existing stream. A null `file` yields an unlinked handle.
    ///
    /// # Safety
    ///
    /// `file` must be null or an open stream that nothing else will close or
    /// use afterwards. In particular it must not come from a [`BorrowedFile`]
    /// of another live handle.
    pub unsafe fn from_raw(file: *mut libc::FILE) -> Self {
        Self {
            file: NonNull::new(file),
            buffer: None,
        }
    }

    /// Open `path` with a fopen `mode`. The handle is unlinked if the open
    /// fails; use [`CFile::try_open`] to learn why.
    pub fn open_path(path: impl AsRef<Path>, mode: &str) -> Self {
        Self::try_open(path, mode).unwrap_or_default()
    }

    pub fn try_open(path: impl AsRef<Path>, mode: &str) -> Result<Self, CFileError> {
        let file = open_stream(path.as_ref(), mode)?;
        Ok(Self {
            file: Some(file),
            buffer: None,
        })
    }

    /// Anonymous `w+` stream removed automatically when closed (`tmpfile`).
    pub fn tmpfile() -> Result<Self, CFileError> {
        // SAFETY: tmpfile takes no arguments.
        let file = unsafe { libc::tmpfile() };
        let file = NonNull::new(file).ok_or_else(|| CFileError::last_os("tmpfile"))?;
        Ok(Self {
            file: Some(file),
            buffer: None,
        })
    }

    // -----------------------------------------------------------------------
    // Ownership
    // -----------------------------------------------------------------------

    pub fn state(&self) -> LinkState {
        if self.file.is_some() {
            LinkState::Linked
        } else {
            LinkState::Unlinked
        }
    }

    pub fn is_linked(&self) -> bool {
        self.file.is_some()
    }

    pub fn is_unlinked(&self) -> bool {
        self.file.is_none()
    }

    /// Borrow the open stream, or `None` when unlinked.
    pub fn as_file(&self) -> Option<BorrowedFile<'_>> {
        self.file.map(|file| BorrowedFile {
            file,
            _owner: PhantomData,
        })
    }

    /// Give up ownership without closing. The caller must eventually close
    /// the returned stream (null if unlinked).
    ///
    /// A buffer installed with `setbuf`/`setvbuf` is leaked, since the
    /// released stream may still write into it.
    pub fn release(&mut self) -> *mut libc::FILE {
        if let Some(buffer) = self.buffer.take() {
            std::mem::forget(buffer);
        }
        self.file.take().map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Move the stream into a new handle, leaving `self` unlinked.
    pub fn take(&mut self) -> CFile {
        std::mem::take(self)
    }

    fn raw(&self) -> Result<*mut libc::FILE, CFileError> {
        self.file.map(NonNull::as_ptr).ok_or(CFileError::Unlinked)
    }

    // -----------------------------------------------------------------------
    // File state
    // -----------------------------------------------------------------------

    /// Close the current stream (if any) and open `path`. On failure the
    /// handle is left unlinked.
    pub fn open(&mut self, path: impl AsRef<Path>, mode: &str) -> &mut Self {
        self.close();
        if let Ok(file) = open_stream(path.as_ref(), mode) {
            self.file = Some(file);
        }
        self
    }

    /// Reuse the stream for another file or mode (`freopen`).
    ///
    /// If the reopen fails the C library has already closed the original
    /// stream, so the handle becomes unlinked.
    pub fn reopen(&mut self, path: impl AsRef<Path>, mode: &str) -> Result<(), CFileError> {
        let file = self.raw()?;
        let path = path.as_ref();
        let mode = OpenMode::parse(mode)?;
        let c_path = path_to_cstring(path)?;
        // SAFETY: `file` is owned by self; the strings are NUL-terminated.
        let reopened = unsafe { libc::freopen(c_path.as_ptr(), mode.as_c_str().as_ptr(), file) };
        self.finish_reopen(reopened, path, &mode)
    }

    /// Change the mode of the current stream (`freopen` with a null name).
    pub fn chmode(&mut self, mode: &str) -> Result<(), CFileError> {
        let file = self.raw()?;
        let mode = OpenMode::parse(mode)?;
        // SAFETY: `file` is owned by self; a null name keeps the same file.
        let reopened = unsafe { libc::freopen(ptr::null(), mode.as_c_str().as_ptr(), file) };
        self.finish_reopen(reopened, Path::new(""), &mode)
    }

    fn finish_reopen(
        &mut self,
        reopened: *mut libc::FILE,
        path: &Path,
        mode: &OpenMode,
    ) -> Result<(), CFileError> {
        let err = io::Error::last_os_error();
        // freopen discards any user buffer whether or not it succeeds.
        self.buffer = None;
        match NonNull::new(reopened) {
            Some(file) => {
                self.file = Some(file);
                Ok(())
            }
            None => {
                self.file = None;
                Err(CFileError::Open {
                    path: PathBuf::from(path),
                    mode: mode.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Flush and close the stream. No-op when unlinked.
    pub fn close(&mut self) {
        let _ = self.try_close();
    }

    /// Like [`CFile::close`] but reports an `fclose` failure. The handle is
    /// unlinked either way.
    pub fn try_close(&mut self) -> Result<(), CFileError> {
        let Some(file) = self.file.take() else {
            return Ok(());
        };
        // SAFETY: `file` was owned by self and has been removed from it, so
        // it cannot be closed a second time.
        let rc = unsafe { libc::fclose(file.as_ptr()) };
        let result = if rc == 0 {
            Ok(())
        } else {
            Err(CFileError::last_os("fclose"))
        };
        self.buffer = None;
        result
    }

    pub fn flush(&mut self) -> Result<(), CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        if unsafe { libc::fflush(file) } == 0 {
            Ok(())
        } else {
            Err(CFileError::last_os("fflush"))
        }
    }

    /// Install a fully-buffered buffer of at least [`BUFSIZ`] bytes, or make
    /// the stream unbuffered with `None`. Must precede any other I/O.
    pub fn setbuf(&mut self, buffer: Option<Box<[u8]>>) -> Result<(), CFileError> {
        let file = self.raw()?;
        match buffer {
            Some(mut buf) => {
                if buf.len() < BUFSIZ {
                    return Err(CFileError::BufferTooSmall {
                        needed: BUFSIZ,
                        actual: buf.len(),
                    });
                }
                // SAFETY: buf holds at least BUFSIZ bytes and is kept in self
                // until the stream is closed or reopened.
                unsafe { libc::setbuf(file, buf.as_mut_ptr().cast::<c_char>()) };
                self.buffer = Some(buf);
            }
            None => {
                // SAFETY: a null buffer selects unbuffered mode.
                unsafe { libc::setbuf(file, ptr::null_mut()) };
                self.buffer = None;
            }
        }
        Ok(())
    }

    /// `setvbuf`: choose the buffering mode and optionally supply the buffer.
    /// With `None` the C library allocates `size` bytes itself, except that a
    /// buffer installed earlier stays in use (and owned) unless `mode` is
    /// [`BufMode::None`].
    pub fn setvbuf(
        &mut self,
        buffer: Option<Box<[u8]>>,
        mode: BufMode,
        size: usize,
    ) -> Result<(), CFileError> {
        let file = self.raw()?;
        match buffer {
            Some(mut buf) => {
                if buf.len() < size {
                    return Err(CFileError::BufferTooSmall {
                        needed: size,
                        actual: buf.len(),
                    });
                }
                // SAFETY: buf holds `size` bytes; on success it is kept in self
                // for as long as the stream may use it.
                let rc = unsafe {
                    libc::setvbuf(file, buf.as_mut_ptr().cast::<c_char>(), mode.to_posix(), size)
                };
                if rc != 0 {
                    return Err(CFileError::last_os("setvbuf"));
                }
                self.buffer = Some(buf);
            }
            None => {
                // SAFETY: a null buffer lets the C library allocate. For full
                // and line buffering glibc keeps whatever buffer the stream
                // already has, which may be ours.
                let rc = unsafe { libc::setvbuf(file, ptr::null_mut(), mode.to_posix(), size) };
                if rc != 0 {
                    return Err(CFileError::last_os("setvbuf"));
                }
                // Only unbuffered mode detaches the stream from a caller buffer.
                if mode == BufMode::None {
                    self.buffer = None;
                }
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Positioning
    // -----------------------------------------------------------------------

    pub fn getpos(&self) -> Result<StreamPos, CFileError> {
        let file = self.raw()?;
        let mut pos = StreamPos { raw: [0; 32] };
        // SAFETY: StreamPos is large and aligned enough for fpos_t.
        let rc = unsafe { libc::fgetpos(file, pos.raw.as_mut_ptr().cast::<libc::fpos_t>()) };
        if rc == 0 {
            Ok(pos)
        } else {
            Err(CFileError::last_os("fgetpos"))
        }
    }

    pub fn setpos(&mut self, pos: &StreamPos) -> Result<(), CFileError> {
        let file = self.raw()?;
        // SAFETY: `pos` was filled by fgetpos.
        let rc = unsafe { libc::fsetpos(file, pos.raw.as_ptr().cast::<libc::fpos_t>()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(CFileError::last_os("fsetpos"))
        }
    }

    pub fn tell(&self) -> Result<u64, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        let pos = unsafe { libc::ftell(file) };
        u64::try_from(pos).map_err(|_| CFileError::last_os("ftell"))
    }

    pub fn seek(&mut self, pos: SeekFrom) -> Result<(), CFileError> {
        let file = self.raw()?;
        let (offset, whence) = match pos {
            SeekFrom::Start(n) => (c_long::try_from(n).map_err(offset_out_of_range)?, libc::SEEK_SET),
            SeekFrom::Current(n) => {
                (c_long::try_from(n).map_err(offset_out_of_range)?, libc::SEEK_CUR)
            }
            SeekFrom::End(n) => (c_long::try_from(n).map_err(offset_out_of_range)?, libc::SEEK_END),
        };
        // SAFETY: `file` is open and owned by self.
        if unsafe { libc::fseek(file, offset, whence) } == 0 {
            Ok(())
        } else {
            Err(CFileError::last_os("fseek"))
        }
    }

    /// Seek to the start and clear the error indicator.
    pub fn rewind(&mut self) -> Result<(), CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        unsafe { libc::rewind(file) };
        Ok(())
    }

    pub fn clearerr(&mut self) -> Result<(), CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        unsafe { libc::clearerr(file) };
        Ok(())
    }

    pub fn eof(&self) -> Result<bool, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        Ok(unsafe { libc::feof(file) } != 0)
    }

    pub fn error(&self) -> Result<bool, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        Ok(unsafe { libc::ferror(file) } != 0)
    }

    /// Descriptor underlying the stream.
    pub fn fileno(&self) -> Result<RawFd, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        let fd = unsafe { libc::fileno(file) };
        if fd < 0 {
            Err(CFileError::last_os("fileno"))
        } else {
            Ok(fd)
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Next byte, or `None` at end of file or on error.
    pub fn getc(&mut self) -> Result<Option<u8>, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        let c = unsafe { libc::fgetc(file) };
        Ok(u8::try_from(c).ok())
    }

    /// Push `byte` back onto the stream. Returns false if the C library
    /// refused (only one byte of pushback is guaranteed).
    pub fn ungetc(&mut self, byte: u8) -> Result<bool, CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        Ok(unsafe { libc::ungetc(c_int::from(byte), file) } != libc::EOF)
    }

    /// Look at the next byte without consuming it.
    pub fn peek(&mut self) -> Result<Option<u8>, CFileError> {
        let c = self.getc()?;
        if let Some(b) = c {
            self.ungetc(b)?;
        }
        Ok(c)
    }

    /// Read one line of at most `buf.len() - 1` bytes (`fgets`). The returned
    /// slice excludes the terminating NUL and keeps the newline if one was
    /// read; NUL bytes inside the line are kept. `None` means end of file or
    /// error with nothing read.
    pub fn gets<'b>(&mut self, buf: &'b mut [u8]) -> Result<Option<&'b [u8]>, CFileError> {
        let file = self.raw()?;
        if buf.len() < 2 {
            return Err(CFileError::BufferTooSmall {
                needed: 2,
                actual: buf.len(),
            });
        }
        let len = c_int::try_from(buf.len()).unwrap_or(c_int::MAX);
        let cap = len as usize;
        // fgets never reports its length, so prefill with '\n': the line ends
        // at the first '\n' that is either followed by the terminator (a read
        // newline) or preceded by it (filler after a line cut short by EOF).
        buf[..cap].fill(b'\n');
        // SAFETY: fgets writes at most `len` bytes including the NUL.
        let got = unsafe { libc::fgets(buf.as_mut_ptr().cast::<c_char>(), len, file) };
        if got.is_null() {
            return Ok(None);
        }
        Ok(Some(&buf[..fgets_len(&buf[..cap])]))
    }

    /// Bulk binary read into `buf`. Returns the number of whole elements
    /// read, which is short on end of file or error; check `eof()`/`error()`.
    pub fn read<T: Pod>(&mut self, buf: &mut [T]) -> Result<usize, CFileError> {
        let file = self.raw()?;
        let size = size_of::<T>();
        if size == 0 || buf.is_empty() {
            return Ok(0);
        }
        // SAFETY: buf is valid for `buf.len()` elements of `size` bytes and
        // any byte pattern is a valid T.
        Ok(unsafe { libc::fread(buf.as_mut_ptr().cast::<c_void>(), size, buf.len(), file) })
    }

    /// Raw `fread` of `count` elements of `size` bytes into `buf`.
    pub fn read_bytes(
        &mut self,
        buf: &mut [u8],
        size: usize,
        count: usize,
    ) -> Result<usize, CFileError> {
        let file = self.raw()?;
        check_capacity(buf.len(), size, count)?;
        // SAFETY: size * count bytes fit in buf.
        Ok(unsafe { libc::fread(buf.as_mut_ptr().cast::<c_void>(), size, count, file) })
    }

    /// Read one whitespace-delimited field of type `T`.
    pub fn scan<T: Scan>(&mut self) -> Result<Option<T>, CFileError> {
        T::scan(self)
    }

    // -----------------------------------------------------------------------
    // Output
    // -----------------------------------------------------------------------

    pub fn putc(&mut self, byte: u8) -> Result<(), CFileError> {
        let file = self.raw()?;
        // SAFETY: `file` is open and owned by self.
        if unsafe { libc::fputc(c_int::from(byte), file) } == libc::EOF {
            Err(CFileError::last_os("fputc"))
        } else {
            Ok(())
        }
    }

    /// Write `s` without a trailing newline (`fputs`).
    pub fn puts(&mut self, s: &str) -> Result<(), CFileError> {
        let file = self.raw()?;
        let s = CString::new(s).map_err(|_| CFileError::NulByte)?;
        // SAFETY: `s` is NUL-terminated; `file` is open and owned by self.
        if unsafe { libc::fputs(s.as_ptr(), file) } < 0 {
            Err(CFileError::last_os("fputs"))
        } else {
            Ok(())
        }
    }

    /// Bulk binary write of `buf`. Returns the number of whole elements
    /// written.
    pub fn write<T: Pod>(&mut self, buf: &[T]) -> Result<usize, CFileError> {
        let file = self.raw()?;
        let size = size_of::<T>();
        if size == 0 || buf.is_empty() {
            return Ok(0);
        }
        // SAFETY: buf is valid for `buf.len()` elements of `size` bytes.
        Ok(unsafe { libc::fwrite(buf.as_ptr().cast::<c_void>(), size, buf.len(), file) })
    }

    /// Raw `fwrite` of `count` elements of `size` bytes from `buf`.
    pub fn write_bytes(&mut self, buf: &[u8], size: usize, count: usize) -> Result<usize, CFileError> {
        let file = self.raw()?;
        check_capacity(buf.len(), size, count)?;
        // SAFETY: size * count bytes are readable from buf.
        Ok(unsafe { libc::fwrite(buf.as_ptr().cast::<c_void>(), size, count, file) })
    }

    /// Formatted write. Prefer the [`cprintf!`](crate::cprintf) macro.
    ///
    /// Returns the number of bytes written.
    pub fn printf(&mut self, args: fmt::Arguments<'_>) -> Result<usize, CFileError> {
        let file = self.raw()?;
        let mut out = StreamWriter {
            file,
            written: 0,
            failure: None,
        };
        match fmt::write(&mut out, args) {
            Ok(()) => Ok(out.written),
            Err(_) => match out.failure {
                Some(source) => Err(CFileError::Transfer {
                    op: "fprintf",
                    source,
                }),
                None => Err(CFileError::Format),
            },
        }
    }
}

fn offset_out_of_range<E>(_: E) -> CFileError {
    CFileError::Transfer {
        op: "fseek",
        source: io::Error::from(io::ErrorKind::InvalidInput),
    }
}

/// Length of the line `fgets` stored in `buf`, which was prefilled with
/// `'\n'` before the call.
fn fgets_len(buf: &[u8]) -> usize {
    let mut from = 0;
    while let Some(off) = buf[from..].iter().position(|&b| b == b'\n') {
        let at = from + off;
        if buf.get(at + 1) == Some(&0) {
            return at + 1;
        }
        if at > 0 && buf[at - 1] == 0 {
            return at - 1;
        }
        from = at + 1;
    }
    // Full buffer without a newline: everything before the terminator.
    buf.len() - 1
}

fn check_capacity(available: usize, size: usize, count: usize) -> Result<(), CFileError> {
    match size.checked_mul(count) {
        Some(needed) if needed <= available => Ok(()),
        needed => Err(CFileError::BufferTooSmall {
            needed: needed.unwrap_or(usize::MAX),
            actual: available,
        }),
    }
}

/// `fmt::Write` sink that forwards each piece straight to the stream.
struct StreamWriter {
    file: *mut libc::FILE,
    written: usize,
    failure: Option<io::Error>,
}

impl fmt::Write for StreamWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if s.is_empty() {
            return Ok(());
        }
        // SAFETY: `file` is the open stream of the CFile borrowed by printf.
        let n = unsafe { libc::fwrite(s.as_ptr().cast::<c_void>(), 1, s.len(), self.file) };
        self.written += n;
        if n == s.len() {
            Ok(())
        } else {
            self.failure = Some(io::Error::last_os_error());
            Err(fmt::Error)
        }
    }
}

impl Default for CFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CFile {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for CFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CFile")
            .field("state", &self.state())
            .field("file", &self.file)
            .field("owns_buffer", &self.buffer.is_some())
            .finish()
    }
}

impl ByteSource for CFile {
    fn next_byte(&mut self) -> Result<Option<u8>, CFileError> {
        self.getc()
    }

    fn push_back(&mut self, byte: u8) -> Result<(), CFileError> {
        if self.ungetc(byte)? {
            Ok(())
        } else {
            Err(CFileError::last_os("ungetc"))
        }
    }
}

// The inherent `read`/`write`/`flush`/`seek` take precedence in method-call
// syntax; these impls make a CFile usable wherever std expects a stream.

impl io::Write for CFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.write_bytes(buf, 1, buf.len())?;
        if n == 0 && !buf.is_empty() {
            return Err(io::Error::last_os_error());
        }
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        CFile::flush(self).map_err(Into::into)
    }
}

impl io::Read for CFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = buf.len();
        let n = self.read_bytes(buf, 1, len)?;
        if n == 0 && len != 0 && CFile::error(self)? {
            return Err(io::Error::last_os_error());
        }
        Ok(n)
    }
}

impl io::Seek for CFile {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        CFile::seek(self, pos)?;
        Ok(self.tell()?)
    }
}

/// Formatted write to a [`CFile`], checked at compile time like `write!`.
///
/// Evaluates to `Result<usize, CFileError>` with the number of bytes written.
///
/// ```ignore
/// cprintf!(file, "{}\n", value)?;
/// ```
#[macro_export]
macro_rules! cprintf {
    ($file:expr, $($arg:tt)*) => {
        ($file).printf(::core::format_args!($($arg)*))
    };
}

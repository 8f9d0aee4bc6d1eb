//! # cfile-core
//!
//! Owning wrapper around a C stdio `FILE*`.
//!
//! [`CFile`] owns at most one open stream and closes it exactly once. The C
//! stdio surface is forwarded with Rust types at the seams:
//!
//! - ownership: moves instead of copies, [`CFile::release`] to hand the raw
//!   stream back, borrowed-only [`CFile::as_file`];
//! - formatted output: [`cprintf!`] over `format_args!`, checked at compile time;
//! - formatted input: [`cscanf!`] with targets typed through [`Scan`];
//! - binary I/O: [`CFile::read`]/[`CFile::write`] restricted to [`Pod`] types;
//! - failures: `Result<_, CFileError>` plus element counts for short transfers.
//!
//! Unix only: paths are passed to `fopen` as raw bytes.

pub mod buffer;
pub mod error;
pub mod handle;
pub mod mode;
pub mod pod;
pub mod scan;

pub use buffer::{BUFSIZ, BufMode};
pub use error::CFileError;
pub use handle::{BorrowedFile, CFile, LinkState, StreamPos};
pub use mode::{OpenFlags, OpenMode, parse_mode};
pub use pod::Pod;
pub use scan::{BufReadSource, ByteSource, Scan};

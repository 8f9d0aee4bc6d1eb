//! Integration test: stream ownership.
//!
//! Validates that:
//! 1. Opens link the handle on success and leave it unlinked on failure.
//! 2. Moving a handle transfers the stream and unlinks the source.
//! 3. close() is idempotent and Drop closes exactly once.
//! 4. release() hands the open stream back without closing it.
//! 5. open/reopen/chmode close or replace the previous stream.
//!
//! Run: cargo test -p cfile-core --test ownership_test

use std::fs;
use std::path::Path;

use cfile_core::{CFile, CFileError, LinkState, cprintf};

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}

fn fd_is_open(fd: i32) -> bool {
    // SAFETY: F_GETFD only inspects the descriptor table.
    unsafe { libc::fcntl(fd, libc::F_GETFD) != -1 }
}

// ---------------------------------------------------------------------------
// 1. Open
// ---------------------------------------------------------------------------

#[test]
fn successful_open_is_linked() {
    let dir = tempfile::tempdir().unwrap();
    let f = CFile::open_path(dir.path().join("a.txt"), "w");
    assert_eq!(f.state(), LinkState::Linked);
    assert!(f.as_file().is_some());
}

#[test]
fn failed_open_is_unlinked() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");
    let f = CFile::open_path(&missing, "r");
    assert_eq!(f.state(), LinkState::Unlinked);

    match CFile::try_open(&missing, "r") {
        Err(CFileError::Open { path, mode, source }) => {
            assert_eq!(path, missing);
            assert_eq!(mode, "r");
            assert_eq!(source.raw_os_error(), Some(libc::ENOENT));
        }
        other => panic!("expected open failure, got {other:?}"),
    }
}

#[test]
fn invalid_mode_never_reaches_fopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("m.txt");
    assert!(matches!(
        CFile::try_open(&path, "rw"),
        Err(CFileError::InvalidMode(_))
    ));
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// 2. Move
// ---------------------------------------------------------------------------

#[test]
fn take_moves_stream_and_unlinks_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("move.txt");

    let mut a = CFile::open_path(&path, "w");
    let raw = a.as_file().unwrap().as_raw();
    let mut b = a.take();

    assert!(a.is_unlinked());
    assert!(b.is_linked());
    assert_eq!(b.as_file().unwrap().as_raw(), raw);
    assert!(matches!(a.flush(), Err(CFileError::Unlinked)));

    drop(a);
    cprintf!(b, "still open\n").unwrap();
    drop(b);
    assert_eq!(read(&path), "still open\n");
}

#[test]
fn assignment_closes_destination_first() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.txt");
    let second = dir.path().join("second.txt");

    let mut dst = CFile::open_path(&first, "w");
    cprintf!(dst, "first").unwrap();

    let mut src = CFile::open_path(&second, "w");
    dst = src.take();

    // The old stream was flushed and closed by the assignment.
    assert_eq!(read(&first), "first");
    assert!(src.is_unlinked());

    cprintf!(dst, "second").unwrap();
    drop(dst);
    assert_eq!(read(&second), "second");
}

#[test]
fn handle_can_move_to_another_thread() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("thread.txt");
    let mut f = CFile::open_path(&path, "w");

    std::thread::spawn(move || {
        cprintf!(f, "from thread").unwrap();
    })
    .join()
    .unwrap();

    assert_eq!(read(&path), "from thread");
}

// ---------------------------------------------------------------------------
// 3. Close
// ---------------------------------------------------------------------------

#[test]
fn close_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("close.txt");
    let mut f = CFile::open_path(&path, "w");
    cprintf!(f, "data").unwrap();

    f.close();
    assert!(f.is_unlinked());
    f.close();
    assert!(f.is_unlinked());
    assert!(f.try_close().is_ok());
    assert_eq!(read(&path), "data");
}

#[test]
fn drop_flushes_and_closes() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("drop.txt");
    {
        let mut f = CFile::open_path(&path, "w");
        cprintf!(f, "{}", 42).unwrap();
    }
    assert_eq!(read(&path), "42");
}

// ---------------------------------------------------------------------------
// 4. Release
// ---------------------------------------------------------------------------

#[test]
fn release_transfers_ownership_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("release.txt");

    let mut f = CFile::open_path(&path, "w");
    cprintf!(f, "hello").unwrap();
    let fd = f.fileno().unwrap();
    let raw = f.release();
    assert!(!raw.is_null());
    assert!(f.is_unlinked());
    drop(f);

    // The released stream survived the drop and can be adopted again.
    assert!(fd_is_open(fd));
    // SAFETY: `raw` came from release() and has no other owner.
    let mut g = unsafe { CFile::from_raw(raw) };
    cprintf!(g, " world").unwrap();
    drop(g);

    assert_eq!(read(&path), "hello world");
}

#[test]
fn release_keeps_installed_buffer_alive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("released-buffer.txt");

    let mut f = CFile::open_path(&path, "w");
    f.setbuf(Some(vec![0u8; cfile_core::BUFSIZ].into_boxed_slice()))
        .unwrap();
    cprintf!(f, "buffered").unwrap();
    let raw = f.release();
    drop(f);

    // SAFETY: `raw` came from release() and has no other owner.
    let g = unsafe { CFile::from_raw(raw) };
    drop(g);
    assert_eq!(read(&path), "buffered");
}

#[test]
fn borrowed_view_writes_through_owner() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("borrowed.txt");

    let mut f = CFile::open_path(&path, "w");
    let view = f.as_file().unwrap();
    // SAFETY: `view` borrows the open stream owned by `f`.
    assert!(unsafe { libc::fputs(c"via view\n".as_ptr(), view.as_raw()) } >= 0);
    cprintf!(f, "via owner\n").unwrap();
    drop(f);

    assert_eq!(read(&path), "via view\nvia owner\n");
    assert!(CFile::new().as_file().is_none());
}

// ---------------------------------------------------------------------------
// 5. open / reopen / chmode
// ---------------------------------------------------------------------------

#[test]
fn open_closes_previous_stream() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let mut f = CFile::open_path(&a, "w");
    cprintf!(f, "a").unwrap();
    assert!(f.open(&b, "w").is_linked());
    assert_eq!(read(&a), "a");

    assert!(f.open(dir.path().join("nope/c.txt"), "w").is_unlinked());
    assert!(b.exists());
}

#[test]
fn reopen_switches_file() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("one.txt");
    let b = dir.path().join("two.txt");

    let mut f = CFile::open_path(&a, "w");
    cprintf!(f, "one").unwrap();
    f.reopen(&b, "w").unwrap();
    cprintf!(f, "two").unwrap();
    f.close();

    assert_eq!(read(&a), "one");
    assert_eq!(read(&b), "two");
}

#[test]
fn failed_reopen_unlinks() {
    let dir = tempfile::tempdir().unwrap();
    let mut f = CFile::open_path(dir.path().join("x.txt"), "w");
    let err = f.reopen(dir.path().join("missing/y.txt"), "r").unwrap_err();
    assert!(matches!(err, CFileError::Open { .. }));
    assert!(f.is_unlinked());
    // Nothing left to close.
    f.close();
}

#[test]
fn chmode_reopens_same_file_for_reading() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mode.txt");

    let mut f = CFile::open_path(&path, "w");
    cprintf!(f, "abc").unwrap();
    f.chmode("r").unwrap();
    assert!(f.is_linked());
    let mut buf = [0u8; 8];
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"abc"[..]));
}

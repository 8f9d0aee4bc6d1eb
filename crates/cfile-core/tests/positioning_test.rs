//! Integration test: positioning and buffering.
//!
//! Run: cargo test -p cfile-core --test positioning_test

use std::io::SeekFrom;

use cfile_core::{BufMode, CFile, CFileError, cprintf};

fn alphabet() -> CFile {
    let mut f = CFile::tmpfile().unwrap();
    f.puts("abcdefghijklmnopqrstuvwxyz").unwrap();
    f.rewind().unwrap();
    f
}

// ---------------------------------------------------------------------------
// seek / tell
// ---------------------------------------------------------------------------

#[test]
fn seek_from_each_origin() {
    let mut f = alphabet();

    f.seek(SeekFrom::Start(3)).unwrap();
    assert_eq!(f.tell().unwrap(), 3);
    assert_eq!(f.getc().unwrap(), Some(b'd'));

    f.seek(SeekFrom::Current(2)).unwrap();
    assert_eq!(f.getc().unwrap(), Some(b'g'));

    f.seek(SeekFrom::End(-1)).unwrap();
    assert_eq!(f.getc().unwrap(), Some(b'z'));
    assert_eq!(f.tell().unwrap(), 26);
}

#[test]
fn seek_before_start_fails_and_keeps_handle() {
    let mut f = alphabet();
    let err = f.seek(SeekFrom::Current(-5)).unwrap_err();
    match err {
        CFileError::Transfer { op, source } => {
            assert_eq!(op, "fseek");
            assert_eq!(source.raw_os_error(), Some(libc::EINVAL));
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(f.is_linked());
    assert_eq!(f.getc().unwrap(), Some(b'a'));
}

#[test]
fn seek_on_pipe_is_transfer_failure() {
    let mut fds = [0; 2];
    // SAFETY: fds has room for two descriptors.
    assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
    // SAFETY: the write end is ours; the buffer is valid for 2 bytes.
    unsafe {
        assert_eq!(libc::write(fds[1], b"hi".as_ptr().cast(), 2), 2);
        libc::close(fds[1]);
    }
    // SAFETY: fds[0] is an open descriptor handed to the new stream.
    let stream = unsafe { libc::fdopen(fds[0], c"r".as_ptr()) };
    assert!(!stream.is_null());
    // SAFETY: the stream was just created and has no other owner.
    let mut f = unsafe { CFile::from_raw(stream) };

    assert!(matches!(
        f.seek(SeekFrom::Start(0)),
        Err(CFileError::Transfer { op: "fseek", .. })
    ));
    assert!(f.is_linked());
    assert_eq!(f.getc().unwrap(), Some(b'h'));
}

// ---------------------------------------------------------------------------
// getpos / setpos / rewind
// ---------------------------------------------------------------------------

#[test]
fn setpos_returns_to_saved_position() {
    let mut f = alphabet();
    f.seek(SeekFrom::Start(10)).unwrap();
    let pos = f.getpos().unwrap();

    assert_eq!(f.getc().unwrap(), Some(b'k'));
    f.seek(SeekFrom::End(0)).unwrap();
    f.setpos(&pos).unwrap();
    assert_eq!(f.tell().unwrap(), 10);
    assert_eq!(f.getc().unwrap(), Some(b'k'));
}

#[test]
fn rewind_clears_end_of_file() {
    let mut f = alphabet();
    f.seek(SeekFrom::End(0)).unwrap();
    assert_eq!(f.getc().unwrap(), None);
    assert!(f.eof().unwrap());

    f.rewind().unwrap();
    assert!(!f.eof().unwrap());
    assert_eq!(f.tell().unwrap(), 0);
}

#[test]
fn io_seek_reports_new_offset() {
    use std::io::Seek as _;

    let mut f = alphabet();
    assert_eq!(std::io::Seek::seek(&mut f, SeekFrom::Start(5)).unwrap(), 5);
    assert_eq!(f.stream_position().unwrap(), 5);
}

// ---------------------------------------------------------------------------
// Buffering
// ---------------------------------------------------------------------------

#[test]
fn unbuffered_stream_writes_through() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("unbuffered.txt");

    let mut f = CFile::open_path(&path, "w");
    f.setvbuf(None, BufMode::None, 0).unwrap();
    cprintf!(f, "now").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "now");
}

#[test]
fn caller_buffer_holds_output_until_flush() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("buffered.txt");

    let mut f = CFile::open_path(&path, "w");
    f.setvbuf(Some(vec![0u8; 256].into_boxed_slice()), BufMode::Full, 256)
        .unwrap();
    cprintf!(f, "later").unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    f.flush().unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "later");
}

#[test]
fn setvbuf_rejects_buffer_shorter_than_size() {
    let mut f = CFile::tmpfile().unwrap();
    assert!(matches!(
        f.setvbuf(Some(vec![0u8; 10].into_boxed_slice()), BufMode::Line, 64),
        Err(CFileError::BufferTooSmall {
            needed: 64,
            actual: 10
        })
    ));
}

#[test]
fn reopen_drops_caller_buffer_safely() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let mut f = CFile::open_path(&a, "w");
    f.setbuf(Some(vec![0u8; cfile_core::BUFSIZ].into_boxed_slice()))
        .unwrap();
    cprintf!(f, "before").unwrap();
    f.reopen(&b, "w").unwrap();
    cprintf!(f, "after").unwrap();
    drop(f);

    assert_eq!(std::fs::read_to_string(&a).unwrap(), "before");
    assert_eq!(std::fs::read_to_string(&b).unwrap(), "after");
}

#[test]
fn setvbuf_without_buffer_keeps_installed_buffer_alive() {
    let mut f = CFile::tmpfile().unwrap();
    f.setbuf(Some(vec![0u8; cfile_core::BUFSIZ].into_boxed_slice()))
        .unwrap();
    f.setvbuf(None, BufMode::Full, cfile_core::BUFSIZ).unwrap();

    // Fresh allocations of the same size must not alias the stream buffer.
    let others: Vec<Vec<u8>> = (0..8).map(|_| vec![0u8; cfile_core::BUFSIZ]).collect();
    cprintf!(f, "MARKER-{}", 42).unwrap();
    assert!(
        others
            .iter()
            .all(|v| !v.windows(9).any(|w| w == b"MARKER-42"))
    );

    f.rewind().unwrap();
    let mut line = [0u8; 32];
    assert_eq!(f.gets(&mut line).unwrap(), Some(&b"MARKER-42"[..]));
}

//! Integration test: data written through a CFile reads back unchanged.
//!
//! Covers formatted text (cprintf!/cscanf!) in text and binary modes, bulk
//! binary transfer of Pod values, short reads at end of file, and the std
//! io::Read/io::Write adapters.
//!
//! Run: cargo test -p cfile-core --test roundtrip_test

use std::io::{Read as _, Write as _};

use cfile_core::{CFile, cprintf, cscanf};

// ---- Formatted text ----

fn formatted_sum(write_mode: &str, read_mode: &str) -> u64 {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("numbers.dat");

    let mut out = CFile::open_path(&path, write_mode);
    for i in 1..=5u32 {
        cprintf!(out, "{i}\n").unwrap();
    }
    out.close();

    let mut input = CFile::open_path(&path, read_mode);
    assert!(input.is_linked());
    let mut sum = 0u64;
    let mut value = 0u32;
    while cscanf!(input, &mut value) == 1 {
        sum += u64::from(value);
    }
    assert!(input.eof().unwrap());
    sum
}

#[test]
fn formatted_roundtrip_text_mode() {
    assert_eq!(formatted_sum("w", "r"), 15);
}

#[test]
fn formatted_roundtrip_binary_mode() {
    assert_eq!(formatted_sum("wb", "rb"), 15);
}

#[test]
fn mixed_fields_scan_in_order() {
    let mut f = CFile::tmpfile().unwrap();
    cprintf!(f, "id {} score {:.3}\n", 17, 0.25).unwrap();
    f.rewind().unwrap();

    let (mut tag, mut id, mut label, mut score) = (String::new(), 0u32, String::new(), 0.0f64);
    assert_eq!(cscanf!(f, &mut tag, &mut id, &mut label, &mut score), 4);
    assert_eq!(tag, "id");
    assert_eq!(id, 17);
    assert_eq!(label, "score");
    assert_eq!(score, 0.25);
}

#[test]
fn matching_failure_stops_before_bad_field() {
    let mut f = CFile::tmpfile().unwrap();
    cprintf!(f, "3 x 4").unwrap();
    f.rewind().unwrap();

    let (mut a, mut b) = (0i32, 0i32);
    assert_eq!(cscanf!(f, &mut a, &mut b), 1);
    assert_eq!(a, 3);
    // The offending byte is still in the stream.
    assert_eq!(f.getc().unwrap(), Some(b'x'));
    assert!(!f.eof().unwrap());
}

#[test]
fn float_text_survives_six_decimals() {
    let values = [0.0, 0.125, 0.333333, 0.999999];
    let mut f = CFile::tmpfile().unwrap();
    for v in values {
        cprintf!(f, "{v:.6}\n").unwrap();
    }
    f.rewind().unwrap();

    let mut back = Vec::new();
    let mut v = 0.0f64;
    while cscanf!(f, &mut v) == 1 {
        back.push(v);
    }
    assert_eq!(back, values);
}

// ---- Binary ----

#[test]
fn bulk_binary_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bulk.bin");
    let values: Vec<u64> = (0..1000).map(|i| i * 7919).collect();

    let mut out = CFile::open_path(&path, "wb");
    assert_eq!(out.write(&values).unwrap(), values.len());
    out.close();
    assert_eq!(
        std::fs::metadata(&path).unwrap().len(),
        (values.len() * size_of::<u64>()) as u64
    );

    let mut input = CFile::open_path(&path, "rb");
    let mut back = vec![0u64; values.len()];
    assert_eq!(input.read(&mut back).unwrap(), values.len());
    assert_eq!(back, values);
}

#[test]
fn element_at_a_time_binary_roundtrip() {
    let mut f = CFile::tmpfile().unwrap();
    for i in 0..100 {
        let v = f64::from(i) / 8.0;
        assert_eq!(f.write(std::slice::from_ref(&v)).unwrap(), 1);
    }
    f.rewind().unwrap();

    let mut sum = 0.0;
    let mut v = [0.0f64];
    while f.read(&mut v).unwrap() == 1 {
        sum += v[0];
    }
    assert_eq!(sum, (0..100).map(|i| f64::from(i) / 8.0).sum::<f64>());
    assert!(f.eof().unwrap());
}

#[test]
fn short_read_reports_end_of_file() {
    let mut f = CFile::tmpfile().unwrap();
    assert_eq!(f.write(&[1u32, 2, 3]).unwrap(), 3);
    f.rewind().unwrap();

    let mut buf = [0u32; 5];
    assert_eq!(f.read(&mut buf).unwrap(), 3);
    assert_eq!(&buf[..3], &[1, 2, 3]);
    assert!(f.eof().unwrap());
    assert!(!f.error().unwrap());

    f.clearerr().unwrap();
    assert!(!f.eof().unwrap());
}

#[test]
fn array_elements_are_transferred_whole() {
    let mut f = CFile::tmpfile().unwrap();
    let points = [[1i32, 2], [3, 4], [5, 6]];
    assert_eq!(f.write(&points).unwrap(), 3);
    assert_eq!(f.write(&[7i32]).unwrap(), 1);
    f.rewind().unwrap();

    // The trailing half element is not counted.
    let mut back = [[0i32; 2]; 4];
    assert_eq!(f.read(&mut back).unwrap(), 3);
    assert_eq!(&back[..3], &points);
}

// ---- std adapters ----

#[test]
fn std_io_traits_interoperate() {
    let mut f = CFile::tmpfile().unwrap();
    writeln!(f, "line {}", 1).unwrap();
    f.write_all(b"line 2\n").unwrap();
    std::io::Write::flush(&mut f).unwrap();
    f.rewind().unwrap();

    let mut text = String::new();
    f.read_to_string(&mut text).unwrap();
    assert_eq!(text, "line 1\nline 2\n");
}

#[test]
fn puts_putc_and_gets() {
    let mut f = CFile::tmpfile().unwrap();
    f.puts("first line\n").unwrap();
    f.putc(b'z').unwrap();
    f.rewind().unwrap();

    let mut buf = [0u8; 64];
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"first line\n"[..]));
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"z"[..]));
    assert_eq!(f.gets(&mut buf).unwrap(), None);
}

#[test]
fn gets_splits_long_lines() {
    let mut f = CFile::tmpfile().unwrap();
    f.puts("abcdefgh\n").unwrap();
    f.rewind().unwrap();

    let mut buf = [0u8; 4];
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"abc"[..]));
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"def"[..]));
    assert_eq!(f.gets(&mut buf).unwrap(), Some(&b"gh\n"[..]));
}

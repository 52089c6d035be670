#![allow(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use super::*;
use std::thread;

#[test]
fn reader_sees_eof_after_writer_dropped() {
    let (mut writer, mut reader) = pipe(4);
    writer.write_all(b"hello").unwrap();
    drop(writer);

    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    assert_eq!(out, "hello");
}

#[test]
fn small_read_buffer_drains_chunk_in_pieces() {
    let (mut writer, mut reader) = pipe(1);
    writer.write_all(b"abcdef").unwrap();
    drop(writer);

    let mut buf = [0u8; 4];
    assert_eq!(reader.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"abcd");
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"ef");
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
}

#[test]
fn writer_blocked_on_full_pipe_resumes_when_drained() {
    let (mut writer, mut reader) = pipe(1);

    let producer = thread::spawn(move || {
        for i in 0..100 {
            writer.write_all(format!("{i},").as_bytes()).unwrap();
        }
    });

    let mut out = String::new();
    reader.read_to_string(&mut out).unwrap();
    producer.join().unwrap();

    assert_eq!(out.split(',').filter(|s| !s.is_empty()).count(), 100);
    assert!(out.starts_with("0,1,2,"));
}

#[test]
fn write_after_reader_dropped_is_broken_pipe() {
    let (mut writer, reader) = pipe(1);
    drop(reader);
    let err = writer.write(b"x").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
}

#[test]
fn empty_write_sends_nothing() {
    let (mut writer, mut reader) = pipe(1);
    assert_eq!(writer.write(b"").unwrap(), 0);
    drop(writer);
    let mut out = Vec::new();
    reader.read_to_end(&mut out).unwrap();
    assert!(out.is_empty());
}

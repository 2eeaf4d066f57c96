use std::io::Cursor;

use super::*;
use crate::archive::{Reader, Writer};
use crate::clock::ManualClock;
use crate::config::RecordConfig;
use crate::error::ArchiveError;
use crate::recorder::RecorderState;

/// Three u32 entries stamped at 0.5, 0.75 and 0.75
fn sample_record() -> Vec<u8> {
    let clock = ManualClock::new();
    let mut writer = RecordWriter::with_clock(Vec::new(), 1, clock.clone()).unwrap();

    clock.advance(0.5);
    writer.write(&1u32).unwrap();
    clock.advance(0.25);
    writer.write(&2u32).unwrap();
    writer.write(&3u32).unwrap();

    assert_eq!(writer.entry_count(), 3);
    writer.into_inner()
}

fn open(bytes: Vec<u8>) -> (ManualClock, RecordReader<Cursor<Vec<u8>>, ManualClock>) {
    let clock = ManualClock::new();
    let reader = RecordReader::with_clock(Cursor::new(bytes), 1, clock.clone()).unwrap();
    (clock, reader)
}

#[test]
fn test_layout_prefixes_every_entry() {
    let bytes = sample_record();
    assert_eq!(bytes.len(), 4 + 3 * (TIMECODE_SIZE + 4));
    assert_eq!(&bytes[..4], &1u32.to_ne_bytes());
    assert_eq!(&bytes[4..12], &0.5f64.to_ne_bytes());
    assert_eq!(&bytes[12..16], &1u32.to_ne_bytes());
}

#[test]
fn test_timecodes_are_non_decreasing() {
    let (_, mut reader) = open(sample_record());
    let mut previous = f64::MIN;
    let mut values = Vec::new();

    while !reader.is_end().unwrap() {
        let mut value = 0u32;
        reader.read(&mut value).unwrap();
        assert!(reader.last_timecode() >= previous);
        previous = reader.last_timecode();
        values.push(value);
    }

    assert_eq!(values, vec![1, 2, 3]);
    assert_eq!(previous, 0.75);
    assert_eq!(reader.recorder().state(), RecorderState::Ended);
}

#[test]
fn test_peek_is_idempotent() {
    let (_, mut reader) = open(sample_record());
    assert_eq!(reader.peek_timecode().unwrap(), 0.5);
    assert_eq!(reader.peek_timecode().unwrap(), 0.5);

    let mut value = 0u32;
    reader.read(&mut value).unwrap();
    assert_eq!(value, 1);
    assert_eq!(reader.peek_timecode().unwrap(), 0.75);
}

#[test]
fn test_paced_playback() {
    let (clock, mut reader) = open(sample_record());
    reader.skip_time().unwrap();
    assert_eq!(reader.time(), 0.5);
    assert!(!reader.next_entry_due().unwrap());

    clock.advance(0.125);
    reader.update();
    assert!(reader.next_entry_due().unwrap());
    let mut value = 0u32;
    reader.read(&mut value).unwrap();
    assert!(!reader.next_entry_due().unwrap());

    clock.advance(0.5);
    reader.update();
    let mut due = Vec::new();
    while reader.next_entry_due().unwrap() {
        reader.read(&mut value).unwrap();
        due.push(value);
    }
    assert_eq!(due, vec![2, 3]);
    assert!(reader.is_end().unwrap());
}

#[test]
fn test_pause_holds_playback() {
    let (clock, mut reader) = open(sample_record());
    reader.skip_time().unwrap();

    reader.pause();
    clock.advance(10.0);
    reader.update();
    assert_eq!(reader.time(), 0.5);
    assert!(!reader.next_entry_due().unwrap());

    reader.resume();
    clock.advance(0.125);
    reader.update();
    assert!(reader.next_entry_due().unwrap());
}

#[test]
fn test_speed_scales_playback() {
    let (clock, mut reader) = open(sample_record());
    reader.set_speed(4.0);
    clock.advance(0.25);
    reader.update();
    assert_eq!(reader.time(), 1.0);
}

#[test]
fn test_collections_stamp_count_and_blob() {
    let clock = ManualClock::new();
    let mut writer = RecordWriter::with_clock(Vec::new(), 1, clock.clone()).unwrap();
    writer
        .write(&vec![1u16, 2, 3])
        .unwrap()
        .write(&String::from("hi"))
        .unwrap()
        .write(&Vec::<u64>::new())
        .unwrap();
    assert_eq!(writer.entry_count(), 6);

    let bytes = writer.into_inner();
    assert_eq!(
        bytes.len(),
        4 + (TIMECODE_SIZE + 4)
            + (TIMECODE_SIZE + 6)
            + (TIMECODE_SIZE + 4)
            + (TIMECODE_SIZE + 2)
            + (TIMECODE_SIZE + 4)
            + TIMECODE_SIZE
    );

    let (_, mut reader) = open(bytes);
    let mut numbers: Vec<u16> = Vec::new();
    let mut text = String::new();
    let mut empty: Vec<u64> = vec![9];
    reader
        .read(&mut numbers)
        .unwrap()
        .read(&mut text)
        .unwrap()
        .read(&mut empty)
        .unwrap();
    assert_eq!(numbers, vec![1, 2, 3]);
    assert_eq!(text, "hi");
    assert!(empty.is_empty());
    assert!(reader.is_end().unwrap());
}

#[test]
fn test_empty_packed_run_is_stamped() {
    let mut writer = RecordWriter::with_clock(Vec::new(), 1, ManualClock::new()).unwrap();
    writer
        .write(&String::new())
        .unwrap()
        .write(&Vec::<Vec<u8>>::new())
        .unwrap();
    // Count and empty blob for the string, count only for the nested list.
    assert_eq!(writer.entry_count(), 3);

    let (_, mut reader) = open(writer.into_inner());
    let mut text = String::from("stale");
    let mut nested: Vec<Vec<u8>> = vec![vec![1]];
    reader.read(&mut text).unwrap().read(&mut nested).unwrap();
    assert!(text.is_empty());
    assert!(nested.is_empty());
    assert!(reader.is_end().unwrap());
}

#[test]
fn test_version_mismatch() {
    let err = RecordReader::new(Cursor::new(sample_record()), 4)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ArchiveError::VersionMismatch {
            expected: 4,
            found: 1
        }
    ));
}

#[test]
fn test_config_applies_speed_and_skip() {
    let config = RecordConfig {
        speed: 2.0,
        skip_to_first: true,
    };
    let reader = RecordReader::with_config(
        Cursor::new(sample_record()),
        1,
        ManualClock::new(),
        &config,
    )
    .unwrap();
    assert_eq!(reader.time(), 0.5);
    assert_eq!(reader.recorder().speed(), 2.0);
}

#[test]
fn test_empty_record_is_end() {
    let writer = RecordWriter::with_clock(Vec::new(), 1, ManualClock::new()).unwrap();
    let (_, mut reader) = open(writer.into_inner());
    assert!(reader.is_end().unwrap());
    assert!(matches!(
        reader.peek_timecode(),
        Err(ArchiveError::StreamExhausted)
    ));
}

//! Shared test fixtures
//!
//! Synthetic movie buffers and a stand-in metadata source.

#![allow(dead_code)]

use movdate::core::builder::{packed_record, text_field, PACKED_RECORD_LEN};
use movdate::{FileTimestamps, MetadataSource, MovieFamily, StampDateTime, StampResult};
use std::cell::Cell;
use std::path::Path;

/// Filler that cannot be mistaken for a record
pub const FILLER: &[u8] = &[0xAA, 0x55, 0x00, 0xFF, 0x13];

pub fn ts(s: &str) -> StampDateTime {
    StampDateTime::parse(s).unwrap()
}

/// Header, one framed text field, trailing filler
pub fn text_movie(field: &str) -> Vec<u8> {
    [
        b"ftypqt  ".to_vec(),
        FILLER.to_vec(),
        text_field(&ts(field)),
        FILLER.to_vec(),
    ]
    .concat()
}

/// `count` packed records one second apart, separated by filler
pub fn packed_movie(start: &str, count: usize, tz: u8) -> Vec<u8> {
    let mut data = FILLER.to_vec();
    let mut t = ts(start);
    for _ in 0..count {
        data.extend(packed_record(&t, tz));
        data.extend_from_slice(FILLER);
        t = t.next_second();
    }
    data
}

/// Offsets of the records in a buffer built by [`packed_movie`]
pub fn record_offsets(count: usize) -> Vec<usize> {
    (0..count)
        .map(|i| FILLER.len() + i * (PACKED_RECORD_LEN + FILLER.len()))
        .collect()
}

/// Metadata source returning fixed timestamps and counting calls
#[derive(Default)]
pub struct FixedSource {
    pub timestamps: FileTimestamps,
    pub calls: Cell<usize>,
}

impl FixedSource {
    pub fn new(timestamps: FileTimestamps) -> Self {
        Self {
            timestamps,
            calls: Cell::new(0),
        }
    }
}

impl MetadataSource for FixedSource {
    fn read_timestamps(&self, _path: &Path, _family: MovieFamily) -> StampResult<FileTimestamps> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.timestamps.clone())
    }
}

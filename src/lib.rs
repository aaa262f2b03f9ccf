//! This library decodes and writes FASTQ records line by line.
//!
//! The decoder reads one physical line at a time and assembles records with a
//! small state machine, which makes it tolerant to blank lines, stray
//! whitespace, `\r\n` line endings and lines of any length. Decoded records
//! own their data ([`Record`](Record)), so they can be kept, modified or sent
//! to other threads freely.
//!
//! # More detailed documentation
//!
//! * [`decoder` module](decoder) for the exact parsing behaviour
//! * [`scanner` module](scanner) for `advance()` style iteration
//! * [`transform` module](transform) for base conversion, truncation and
//!   region extraction
//! * [`parallel` module](parallel) for processing records in worker threads
//!
//! # Example
//!
//! This code converts `C` to `T` in every sequence and writes the records
//! back.
//!
//! ```no_run
//! use fqscan::{Decoder, Writer};
//! use fqscan::transform::c_to_t;
//! use std::io::stdout;
//!
//! let mut decoder = Decoder::from_path("seqs.fastq").unwrap();
//! let mut writer = Writer::new(stdout());
//!
//! while let Some(record) = decoder.next_record().unwrap() {
//!     writer.write_record(&c_to_t(&record)).unwrap();
//! }
//! ```
//!
//! # Buffer size
//!
//! The default line reader uses a buffer of 64 KiB. Longer lines are read in
//! several fragments and joined, which is slower but gives the same result.
//! The size can be set with [`Decoder::with_capacity()`](Decoder::with_capacity).
//!
//! # Logging
//!
//! Skipped lines and errors are reported through the [`log`](https://docs.rs/log)
//! facade at `trace` and `debug` level. No logger is installed by this crate.

pub mod decoder;
mod error;
pub mod lines;
pub mod parallel;
pub mod prelude;
mod record;
pub mod scanner;
pub mod transform;
mod write;

pub use crate::decoder::{Decoder, Mode, Position, RecordsIntoIter, RecordsIter};
pub use crate::error::*;
pub use crate::record::*;
pub use crate::scanner::{ReadRecord, Scanner};
pub use crate::write::*;

/// Remove a final '\r' from a byte slice
#[inline]
fn trim_cr(line: &[u8]) -> &[u8] {
    if let Some((&b'\r', remaining)) = line.split_last() {
        remaining
    } else {
        line
    }
}

/// ASCII whitespace, including vertical tab
#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Remove leading and trailing whitespace
#[inline]
fn trim_space(line: &[u8]) -> &[u8] {
    let start = line.iter().position(|&b| !is_space(b)).unwrap_or(line.len());
    let end = line.iter().rposition(|&b| !is_space(b)).map_or(start, |i| i + 1);
    &line[start..end]
}

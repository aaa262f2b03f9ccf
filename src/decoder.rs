//! FASTQ record decoding
//!
//! # Example
//!
//! ```
//! use fqscan::Decoder;
//!
//! let fastq = b"@id1 some description
//! ACGT
//! +
//! IIII
//!
//! @id2
//! TGCA
//! +id2
//! II II
//! ";
//!
//! let mut decoder = Decoder::new(&fastq[..]);
//!
//! let rec = decoder.next_record().unwrap().unwrap();
//! assert_eq!(rec.id(), Ok("id1"));
//! assert_eq!(&rec.letters, b"ACGT");
//!
//! // whitespace within the quality line is removed
//! let rec = decoder.next_record().unwrap().unwrap();
//! assert_eq!(&rec.secondary_id, b"+id2");
//! assert_eq!(&rec.quality, b"IIII");
//!
//! assert!(decoder.next_record().unwrap().is_none());
//! ```
//!
//! # Details on parsing
//!
//! * Lines are read with a [`LineReader`](crate::lines::LineReader) by
//!   default. Lines longer than its buffer are joined before they are
//!   inspected, so the buffer size never changes the result.
//! * Leading and trailing whitespace (including `\r`) is removed from every
//!   line.
//! * Lines found before a header line (`@...`) or between the sequence and
//!   the separator line (`+...`) are skipped, unless
//!   [`Mode::Strict`](Mode::Strict) is set.
//! * Empty lines before the sequence line are skipped, as well as empty
//!   lines before the quality line (only if the sequence is not empty).
//! * If the line following the header starts with `+` and is either exactly
//!   `+` or repeats the header text, it is taken as the separator of a record
//!   with an empty sequence. The separator is stored in `secondary_id`.
//! * Only one quality line is read. Any whitespace within it is removed.
//! * Sequence and quality lengths must be equal, otherwise an error of
//!   `ErrorKind::UnequalLengths` is returned.
//! * If the input ends after the separator line, the record is complete
//!   (with an empty quality line, which is only valid if the sequence is
//!   empty as well). If it ends earlier within a record, an error of
//!   `ErrorKind::UnexpectedEnd` is returned.

use std::fs::File;
use std::io;
use std::path::Path;

use log::{debug, trace};

use crate::error::{Error, ErrorKind, ErrorPosition, Result};
use crate::lines::{LineRead, LineReader, LineStatus};
use crate::record::{Record, RecordSet};
use crate::scanner::ReadRecord;
use crate::{is_space, trim_space};

/// Controls how lines that do not fit into the record structure are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Unexpected lines before the header or the separator are skipped.
    Lenient,
    /// Unexpected lines result in `ErrorKind::InvalidStart` /
    /// `ErrorKind::InvalidSep`.
    Strict,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Lenient
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    PrimaryId,
    Letters,
    SecondaryId,
    Quality,
}

/// Holds the line number and record index of the reader
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    line: u64,
    record: u64,
}

impl Position {
    pub fn new(line: u64, record: u64) -> Position {
        Position { line, record }
    }

    /// Number of the next line to be read (starting with 1)
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Number of records returned so far
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// FASTQ decoder
pub struct Decoder<L: LineRead> {
    lines: L,
    line: Vec<u8>,
    mode: Mode,
    line_num: u64,
    n_records: u64,
}

impl<R> Decoder<LineReader<R>>
where
    R: io::Read,
{
    /// Creates a new decoder with the default buffer size of 64 KiB
    pub fn new(reader: R) -> Self {
        Decoder::from_lines(LineReader::new(reader))
    }

    /// Creates a new decoder with a given line buffer capacity. Longer lines
    /// are still decoded correctly. The minimum allowed capacity is 3.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Decoder::from_lines(LineReader::with_capacity(reader, capacity))
    }
}

impl Decoder<LineReader<File>> {
    /// Creates a decoder from a file path.
    ///
    /// # Example:
    ///
    /// ```no_run
    /// use fqscan::Decoder;
    ///
    /// let mut decoder = Decoder::from_path("seqs.fastq").unwrap();
    ///
    /// // (... do something with the decoder)
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        LineReader::from_path(path).map(Decoder::from_lines)
    }
}

impl<L> Decoder<L>
where
    L: LineRead,
{
    /// Creates a decoder pulling lines from any [`LineRead`](LineRead) source
    pub fn from_lines(lines: L) -> Self {
        Decoder {
            lines,
            line: vec![],
            mode: Mode::default(),
            line_num: 0,
            n_records: 0,
        }
    }

    /// Returns the decoder with the given mode applied
    #[inline]
    pub fn set_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the current position
    ///
    /// ```
    /// use fqscan::{Decoder, Position};
    ///
    /// let mut decoder = Decoder::new(&b"@id1\nACGT\n+\nIIII\n\n@id2\nTGCA\n+\nIIII\n"[..]);
    /// decoder.next_record().unwrap();
    /// assert_eq!(decoder.position(), Position::new(5, 1));
    /// ```
    #[inline]
    pub fn position(&self) -> Position {
        Position::new(self.line_num + 1, self.n_records)
    }

    #[inline]
    pub fn get_ref(&self) -> &L {
        &self.lines
    }

    pub fn into_inner(self) -> L {
        self.lines
    }

    /// Decodes the next record. Returns `Ok(None)` if the input ended before
    /// a new record was started.
    ///
    /// The decoder does not stop after an error; the next call starts
    /// searching for a record after the line where the error occurred.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        let mut rec = Record::default();
        if self.read_into(&mut rec)? {
            Ok(Some(rec))
        } else {
            Ok(None)
        }
    }

    /// Clears `rset` and fills it with up to `n` records (at least one).
    /// Returns `Ok(false)` if no record was left in the input.
    ///
    /// If an error is returned, the records decoded before the error remain
    /// in the set.
    pub fn read_record_set(&mut self, rset: &mut RecordSet, n: usize) -> Result<bool> {
        rset.clear();
        while rset.len() < n.max(1) {
            let rec = rset.next_slot();
            if !self.read_into(rec)? {
                break;
            }
            rset.commit();
        }
        Ok(!rset.is_empty())
    }

    /// Returns a borrowed iterator over all records. The iterator stops after
    /// the first error.
    ///
    /// # Example
    ///
    /// ```
    /// use fqscan::{Decoder, Record};
    ///
    /// let fastq = b"@id1\nACGT\n+\nIIII\n@id2\nTGCA\n+\nIIII";
    ///
    /// let mut decoder = Decoder::new(&fastq[..]);
    /// let records: Result<Vec<_>, _> = decoder.records().collect();
    ///
    /// assert_eq!(records.unwrap(), vec![
    ///     Record::new("@id1", "ACGT", "+", "IIII"),
    ///     Record::new("@id2", "TGCA", "+", "IIII"),
    /// ]);
    /// ```
    pub fn records(&mut self) -> RecordsIter<L> {
        RecordsIter {
            dec: self,
            finished: false,
        }
    }

    /// Returns an iterator over all records like `Decoder::records()`,
    /// but with the difference that it owns the decoder.
    pub fn into_records(self) -> RecordsIntoIter<L> {
        RecordsIntoIter {
            dec: self,
            finished: false,
        }
    }

    // Fills an empty record, returns false at the end of input.
    fn read_into(&mut self, rec: &mut Record) -> Result<bool> {
        let mut state = State::PrimaryId;
        let mut start_line = self.line_num + 1;

        loop {
            if !self.next_line()? {
                match state {
                    State::PrimaryId => return Ok(false),
                    State::Quality => break,
                    _ => {
                        let pos = self.error_pos(start_line, rec);
                        debug!("Input ended within FASTQ record ({})", pos);
                        return Err(Error::new(ErrorKind::UnexpectedEnd { pos }));
                    }
                }
            }

            let line = trim_space(&self.line);

            match state {
                State::PrimaryId => {
                    if line.first() == Some(&b'@') {
                        rec.primary_id.extend_from_slice(line);
                        start_line = self.line_num;
                        state = State::Letters;
                    } else if !line.is_empty() {
                        if self.mode == Mode::Strict {
                            let pos = ErrorPosition::new(self.line_num, None);
                            debug!("Invalid FASTQ record start ({})", pos);
                            return Err(Error::new(ErrorKind::InvalidStart {
                                pos,
                                found: line[0],
                            }));
                        }
                        trace!("Skipping line {} before record header", self.line_num);
                    }
                }
                State::Letters => {
                    if line.is_empty() {
                        continue;
                    }
                    if is_early_separator(line, &rec.primary_id) {
                        rec.secondary_id.extend_from_slice(line);
                        state = State::Quality;
                    } else {
                        rec.letters.extend_from_slice(line);
                        state = State::SecondaryId;
                    }
                }
                State::SecondaryId => {
                    if line.first() == Some(&b'+') {
                        rec.secondary_id.extend_from_slice(line);
                        state = State::Quality;
                    } else if !line.is_empty() {
                        if self.mode == Mode::Strict {
                            let pos = self.error_pos(start_line, rec);
                            debug!("Invalid FASTQ separator line ({})", pos);
                            return Err(Error::new(ErrorKind::InvalidSep {
                                pos,
                                found: line[0],
                            }));
                        }
                        trace!("Skipping line {} before separator", self.line_num);
                    }
                }
                State::Quality => {
                    if line.is_empty() && !rec.letters.is_empty() {
                        continue;
                    }
                    rec.quality
                        .extend(line.iter().copied().filter(|b| !is_space(*b)));
                    break;
                }
            }
        }

        if rec.quality.len() != rec.letters.len() {
            let pos = self.error_pos(start_line, rec);
            debug!("Unequal sequence and quality lengths ({})", pos);
            return Err(Error::new(ErrorKind::UnequalLengths {
                pos: Some(pos),
                seq: rec.letters.len(),
                qual: rec.quality.len(),
            }));
        }

        self.n_records += 1;
        Ok(true)
    }

    // Reads the next complete line into self.line, joining fragments.
    // Returns false at the end of input.
    fn next_line(&mut self) -> Result<bool> {
        self.line.clear();
        loop {
            match self.lines.read_line(&mut self.line).map_err(Error::read)? {
                LineStatus::Complete => break,
                LineStatus::Partial => {}
                LineStatus::End => {
                    // other sources may end without completing a line
                    if self.line.is_empty() {
                        return Ok(false);
                    }
                    break;
                }
            }
        }
        self.line_num += 1;
        Ok(true)
    }

    #[inline(never)]
    fn error_pos(&self, line: u64, rec: &Record) -> ErrorPosition {
        let id = if rec.primary_id.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(rec.id_bytes()).into())
        };
        ErrorPosition::new(line, id)
    }
}

/// A `+` line directly after the header is taken as separator of an empty
/// sequence if it is bare or repeats the header text.
#[inline]
fn is_early_separator(line: &[u8], primary_id: &[u8]) -> bool {
    match line.split_first() {
        Some((b'+', rest)) => rest.is_empty() || rest == primary_id.get(1..).unwrap_or_default(),
        _ => false,
    }
}

impl<L> ReadRecord for Decoder<L>
where
    L: LineRead,
{
    #[inline]
    fn read_record(&mut self) -> Result<Option<Record>> {
        self.next_record()
    }
}

/// Borrowed iterator of `Record`
pub struct RecordsIter<'a, L>
where
    L: LineRead + 'a,
{
    dec: &'a mut Decoder<L>,
    finished: bool,
}

impl<'a, L> Iterator for RecordsIter<'a, L>
where
    L: LineRead + 'a,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(self.dec, &mut self.finished)
    }
}

/// Iterator of `Record` that owns the underlying decoder
pub struct RecordsIntoIter<L: LineRead> {
    dec: Decoder<L>,
    finished: bool,
}

impl<L> Iterator for RecordsIntoIter<L>
where
    L: LineRead,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        next_owned(&mut self.dec, &mut self.finished)
    }
}

fn next_owned<L: LineRead>(dec: &mut Decoder<L>, finished: &mut bool) -> Option<Result<Record>> {
    if *finished {
        return None;
    }
    match dec.next_record() {
        Ok(Some(rec)) => Some(Ok(rec)),
        Ok(None) => {
            *finished = true;
            None
        }
        Err(e) => {
            *finished = true;
            Some(Err(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_early_separator;

    #[test]
    fn early_separator() {
        assert!(is_early_separator(b"+", b"@id"));
        assert!(is_early_separator(b"+id", b"@id"));
        assert!(!is_early_separator(b"+id2", b"@id"));
        assert!(!is_early_separator(b"+I", b"@id"));
        assert!(!is_early_separator(b"ACGT", b"@id"));
        assert!(!is_early_separator(b"", b"@id"));
    }
}

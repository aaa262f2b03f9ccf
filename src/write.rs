use std::io;

use crate::error::{Error, Result};
use crate::record::Record;

/// Writes the four lines of a record, each followed by `\n`, and returns
/// the number of bytes written.
///
/// The data is written unchanged, there is no validation. The first failing
/// write is returned as `ErrorKind::Write`; since the number of bytes that
/// reached the sink is unknown in that case, callers retry whole records.
pub fn write_record<W>(writer: W, record: &Record) -> Result<usize>
where
    W: io::Write,
{
    write(
        writer,
        &record.primary_id,
        &record.letters,
        &record.secondary_id,
        &record.quality,
    )
}

/// Helper function for writing data (not necessarily stored in a `Record`
/// instance) in the FASTQ format. Header lines are expected to include their
/// leading `@` / `+`.
pub fn write<W>(
    mut writer: W,
    primary_id: &[u8],
    letters: &[u8],
    secondary_id: &[u8],
    quality: &[u8],
) -> Result<usize>
where
    W: io::Write,
{
    let mut n = 0;
    for line in &[primary_id, letters, secondary_id, quality] {
        writer.write_all(line).map_err(Error::write)?;
        writer.write_all(b"\n").map_err(Error::write)?;
        n += line.len() + 1;
    }
    Ok(n)
}

/// FASTQ writer, which keeps track of the amount of data written.
///
/// # Example
///
/// ```
/// use fqscan::{Record, Writer};
///
/// let mut writer = Writer::new(vec![]);
/// let rec = Record::new("@id", "ACGT", "+", "IIII");
/// assert_eq!(writer.write_record(&rec).unwrap(), 16);
/// assert_eq!(writer.records_written(), 1);
/// assert_eq!(writer.into_inner(), b"@id\nACGT\n+\nIIII\n");
/// ```
pub struct Writer<W: io::Write> {
    writer: W,
    records: u64,
    bytes: u64,
}

impl<W> Writer<W>
where
    W: io::Write,
{
    pub fn new(writer: W) -> Self {
        Writer {
            writer,
            records: 0,
            bytes: 0,
        }
    }

    /// Writes a record and returns the number of bytes written.
    /// Records whose writing failed are not counted.
    pub fn write_record(&mut self, record: &Record) -> Result<usize> {
        let n = write_record(&mut self.writer, record)?;
        self.records += 1;
        self.bytes += n as u64;
        Ok(n)
    }

    /// Number of records successfully written
    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Number of bytes written by successful `write_record` calls
    #[inline]
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().map_err(Error::write)
    }

    #[inline]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Unwraps the underlying writer. No flushing is done.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

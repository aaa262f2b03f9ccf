use std::io;
use std::slice;
use std::str::{self, Utf8Error};

use serde_derive::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::write::write_record;

/// A FASTQ record that owns its data.
///
/// Both header lines are stored as found in the input, including the
/// leading `@` and `+`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub primary_id: Vec<u8>,
    pub letters: Vec<u8>,
    pub secondary_id: Vec<u8>,
    pub quality: Vec<u8>,
}

impl Record {
    /// Creates a record from its four lines.
    pub fn new<I, L, S, Q>(primary_id: I, letters: L, secondary_id: S, quality: Q) -> Self
    where
        I: Into<Vec<u8>>,
        L: Into<Vec<u8>>,
        S: Into<Vec<u8>>,
        Q: Into<Vec<u8>>,
    {
        Record {
            primary_id: primary_id.into(),
            letters: letters.into(),
            secondary_id: secondary_id.into(),
            quality: quality.into(),
        }
    }

    #[inline]
    pub fn primary_id(&self) -> &[u8] {
        &self.primary_id
    }

    #[inline]
    pub fn letters(&self) -> &[u8] {
        &self.letters
    }

    #[inline]
    pub fn secondary_id(&self) -> &[u8] {
        &self.secondary_id
    }

    #[inline]
    pub fn quality(&self) -> &[u8] {
        &self.quality
    }

    /// Return the header line without the leading `@`
    #[inline]
    pub fn head(&self) -> &[u8] {
        match self.primary_id.split_first() {
            Some((b'@', rest)) => rest,
            _ => &self.primary_id,
        }
    }

    #[inline]
    pub fn id_bytes(&self) -> &[u8] {
        self.head().split(|b| *b == b' ').next().unwrap_or_default()
    }

    /// Return the ID of the record (everything before an optional space) as string slice
    #[inline]
    pub fn id(&self) -> std::result::Result<&str, Utf8Error> {
        str::from_utf8(self.id_bytes())
    }

    #[inline]
    pub fn desc_bytes(&self) -> Option<&[u8]> {
        self.head().splitn(2, |b| *b == b' ').nth(1)
    }

    /// Return the description of the record as string slice, if present.
    /// Otherwise, `None` is returned.
    #[inline]
    pub fn desc(&self) -> Option<std::result::Result<&str, Utf8Error>> {
        self.desc_bytes().map(str::from_utf8)
    }

    /// Returns an error of `ErrorKind::UnequalLengths` if sequence and
    /// quality lengths differ. Records returned by the decoder always pass
    /// this check, records built by hand may not.
    pub fn check_lengths(&self) -> Result<&Self> {
        if self.letters.len() == self.quality.len() {
            return Ok(self);
        }
        Err(Error::new(ErrorKind::UnequalLengths {
            pos: None,
            seq: self.letters.len(),
            qual: self.quality.len(),
        }))
    }

    /// Writes the record to the given `io::Write` instance and returns
    /// the number of bytes written.
    #[inline]
    pub fn write<W: io::Write>(&self, writer: W) -> Result<usize> {
        write_record(writer, self)
    }

    pub(crate) fn clear(&mut self) {
        self.primary_id.clear();
        self.letters.clear();
        self.secondary_id.clear();
        self.quality.clear();
    }
}

/// Batch of records, filled by
/// [`Decoder::read_record_set`](crate::Decoder::read_record_set).
///
/// The allocations of records are kept between calls.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RecordSet {
    records: Vec<Record>,
    len: usize,
}

impl RecordSet {
    /// Number of records in the set
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<Record> {
        self.records[..self.len].iter()
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.len = 0;
    }

    /// Returns the next free slot, cleared.
    pub(crate) fn next_slot(&mut self) -> &mut Record {
        if self.len == self.records.len() {
            self.records.push(Record::default());
        }
        let rec = &mut self.records[self.len];
        rec.clear();
        rec
    }

    #[inline]
    pub(crate) fn commit(&mut self) {
        self.len += 1;
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = slice::Iter<'a, Record>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_parts() {
        let rec = Record::new(&b"@id1 some description"[..], "ACGT", "+", "IIII");
        assert_eq!(rec.head(), b"id1 some description");
        assert_eq!(rec.id(), Ok("id1"));
        assert_eq!(rec.desc(), Some(Ok("some description")));

        let rec = Record::new("@id2", "", "+", "");
        assert_eq!(rec.id(), Ok("id2"));
        assert_eq!(rec.desc(), None);
    }

    #[test]
    fn check_lengths() {
        let rec = Record::new("@id", "ACGT", "+", "III");
        let err = rec.check_lengths().unwrap_err();
        match err.kind() {
            ErrorKind::UnequalLengths { pos, seq, qual } => {
                assert!(pos.is_none());
                assert_eq!((*seq, *qual), (4, 3));
            }
            _ => panic!("wrong error kind"),
        }
        assert!(Record::new("@id", "AC", "+", "II").check_lengths().is_ok());
    }
}

//! Per-record transformations
//!
//! All functions take a reference to a record and return a new one; the
//! header lines are always copied unchanged.
//!
//! ```
//! use fqscan::Record;
//! use fqscan::transform::{c_to_t, extract, truncate};
//!
//! let rec = Record::new("@id", "ACGTAC", "+", "ABCDEF");
//!
//! assert_eq!(&c_to_t(&rec).letters, b"ATGTAT");
//! assert_eq!(&truncate(&rec, 4).quality, b"ABCD");
//!
//! let sub = extract(&rec, "0:2,4:6").unwrap();
//! assert_eq!(&sub.letters, b"ACAC");
//! assert_eq!(&sub.quality, b"ABEF");
//! ```

use std::fmt;
use std::ops::Range;
use std::slice;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::record::Record;

/// Replaces every occurrence of `from` in the sequence with `to`.
pub fn substitute(record: &Record, from: u8, to: u8) -> Record {
    let letters = record
        .letters
        .iter()
        .map(|&b| if b == from { to } else { b })
        .collect();
    Record {
        primary_id: record.primary_id.clone(),
        letters,
        secondary_id: record.secondary_id.clone(),
        quality: record.quality.clone(),
    }
}

/// `C` -> `T` conversion of the sequence
#[inline]
pub fn c_to_t(record: &Record) -> Record {
    substitute(record, b'C', b'T')
}

/// `G` -> `A` conversion of the sequence
#[inline]
pub fn g_to_a(record: &Record) -> Record {
    substitute(record, b'G', b'A')
}

/// Cuts sequence and quality to at most `max_len` bytes.
pub fn truncate(record: &Record, max_len: usize) -> Record {
    let mut out = record.clone();
    if out.letters.len() > max_len {
        out.letters.truncate(max_len);
        out.quality.truncate(max_len);
    }
    out
}

/// Validated list of half-open `start:end` ranges
///
/// ```
/// use fqscan::transform::Regions;
///
/// let regions: Regions = "0:2,4:6".parse().unwrap();
/// assert_eq!(regions.iter().cloned().collect::<Vec<_>>(), vec![0..2, 4..6]);
///
/// assert!(Regions::parse("2:1").is_err());
/// assert!(Regions::parse("0-2").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regions {
    ranges: Vec<Range<usize>>,
}

impl Regions {
    /// Parses a comma-separated list of `start:end` pairs. The whole
    /// specification is rejected if any pair is invalid.
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::invalid_region(spec, "no region given"));
        }
        let ranges = spec
            .split(',')
            .map(parse_range)
            .collect::<Result<Vec<_>>>()?;
        Ok(Regions { ranges })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<Range<usize>> {
        self.ranges.iter()
    }

    /// Total number of bytes covered by the ranges
    pub fn total_len(&self) -> usize {
        self.ranges.iter().map(|r| r.end - r.start).sum()
    }
}

impl FromStr for Regions {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Regions::parse(s)
    }
}

impl fmt::Display for Regions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, r) in self.ranges.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}:{}", r.start, r.end)?;
        }
        Ok(())
    }
}

fn parse_range(item: &str) -> Result<Range<usize>> {
    let (start, end) = item
        .split_once(':')
        .ok_or_else(|| Error::invalid_region(item, "expected 'start:end'"))?;
    let start = parse_index(item, start)?;
    let end = parse_index(item, end)?;
    if end < start {
        return Err(Error::invalid_region(item, "end is smaller than start"));
    }
    Ok(start..end)
}

fn parse_index(item: &str, s: &str) -> Result<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_region(
            item,
            format!("'{}' is not a non-negative integer", s),
        ));
    }
    s.parse()
        .map_err(|_| Error::invalid_region(item, format!("'{}' is too large", s)))
}

/// Concatenates the given regions of sequence and quality. All ranges are
/// checked against both lengths before any data is copied.
pub fn extract_regions(record: &Record, regions: &Regions) -> Result<Record> {
    let max_end = record.letters.len().min(record.quality.len());
    for r in regions.iter() {
        if r.end > max_end {
            return Err(Error::invalid_region(
                format!("{}:{}", r.start, r.end),
                format!("range exceeds record length {}", max_end),
            ));
        }
    }

    let n = regions.total_len();
    let mut letters = Vec::with_capacity(n);
    let mut quality = Vec::with_capacity(n);
    for r in regions.iter() {
        letters.extend_from_slice(&record.letters[r.clone()]);
        quality.extend_from_slice(&record.quality[r.clone()]);
    }
    Ok(Record {
        primary_id: record.primary_id.clone(),
        letters,
        secondary_id: record.secondary_id.clone(),
        quality,
    })
}

/// Parses `spec` and extracts the regions in one step
#[inline]
pub fn extract(record: &Record, spec: &str) -> Result<Record> {
    extract_regions(record, &Regions::parse(spec)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn region_err(spec: &str) -> (String, String) {
        match Regions::parse(spec).unwrap_err().into_kind() {
            ErrorKind::InvalidRegion { spec, reason } => (spec, reason),
            k => panic!("unexpected error kind {:?}", k),
        }
    }

    #[test]
    fn parse_regions() {
        let r = Regions::parse("0:0,3:10,1:2").unwrap();
        assert_eq!(r.iter().cloned().collect::<Vec<_>>(), vec![0..0, 3..10, 1..2]);
        assert_eq!(r.total_len(), 8);
        assert_eq!(r.to_string(), "0:0,3:10,1:2");
    }

    #[test]
    fn parse_invalid() {
        assert_eq!(region_err("0:2,4").0, "4");
        assert_eq!(region_err("0:2,,4:5").0, "");
        assert_eq!(region_err("a:2").0, "a:2");
        assert_eq!(region_err("-1:2").0, "-1:2");
        assert_eq!(region_err("+1:2").0, "+1:2");
        assert_eq!(region_err("1: 2").0, "1: 2");
        assert_eq!(region_err("3:2").1, "end is smaller than start");
        assert_eq!(
            region_err("0:99999999999999999999999").1,
            "'99999999999999999999999' is too large"
        );
        assert_eq!(region_err("").1, "no region given");
    }
}

//! Pull-style iteration over records
//!
//! [`Scanner`](Scanner) wraps any [`ReadRecord`](ReadRecord) implementation
//! (usually a [`Decoder`](crate::Decoder)) and offers an `advance` / `current`
//! loop, keeping the first error for later inspection:
//!
//! ```
//! use fqscan::{Decoder, Scanner};
//!
//! let fastq = b"@id1\nACGT\n+\nIIII\n@id2\nTG\n+\nII\n";
//! let mut scanner = Scanner::new(Decoder::new(&fastq[..]));
//!
//! let mut ids = vec![];
//! while scanner.advance() {
//!     ids.push(scanner.current().id().unwrap().to_owned());
//! }
//! assert!(scanner.last_error().is_none());
//! assert_eq!(ids, vec!["id1", "id2"]);
//! ```

use crate::error::{Error, Result};
use crate::record::Record;

/// Source of records
pub trait ReadRecord {
    /// Reads the next record. `Ok(None)` signals the regular end of input.
    fn read_record(&mut self) -> Result<Option<Record>>;
}

impl<'a, D: ReadRecord + ?Sized> ReadRecord for &'a mut D {
    #[inline]
    fn read_record(&mut self) -> Result<Option<Record>> {
        (**self).read_record()
    }
}

/// Record scanner
pub struct Scanner<D> {
    inner: D,
    record: Record,
    err: Option<Error>,
    done: bool,
}

impl<D> Scanner<D>
where
    D: ReadRecord,
{
    pub fn new(inner: D) -> Self {
        Scanner {
            inner,
            record: Record::default(),
            err: None,
            done: false,
        }
    }

    /// Reads the next record, which is then available through
    /// [`current()`](Scanner::current). Returns `false` at the end of input or
    /// after an error; once `false` was returned, all further calls return
    /// `false` without reading.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        match self.inner.read_record() {
            Ok(Some(rec)) => {
                self.record = rec;
                true
            }
            Ok(None) => {
                self.done = true;
                false
            }
            Err(e) => {
                self.err = Some(e);
                self.done = true;
                false
            }
        }
    }

    /// Returns the most recent record read by `advance()`. Before the first
    /// successful call, this is an empty record.
    #[inline]
    pub fn current(&self) -> &Record {
        &self.record
    }

    /// Moves the most recent record out of the scanner, leaving an empty one
    #[inline]
    pub fn take_current(&mut self) -> Record {
        std::mem::take(&mut self.record)
    }

    /// Returns the error that stopped the scanner. The regular end of input
    /// is not an error.
    #[inline]
    pub fn last_error(&self) -> Option<&Error> {
        self.err.as_ref()
    }

    /// Returns the underlying record source
    pub fn into_inner(self) -> D {
        self.inner
    }
}

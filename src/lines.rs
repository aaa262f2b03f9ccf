//! Physical line reading
//!
//! The decoder does not read bytes directly, it pulls physical lines from a
//! [`LineRead`](LineRead) source. The default source is
//! [`LineReader`](LineReader), which keeps a buffer of fixed size. Lines that
//! do not fit into this buffer are handed out in several fragments, each but
//! the last one flagged as [`LineStatus::Partial`](LineStatus::Partial).
//!
//! ```
//! use fqscan::lines::{LineRead, LineReader, LineStatus};
//!
//! let mut reader = LineReader::with_capacity(&b"ACGTACGT\r\nII\n"[..], 4);
//! let mut line = vec![];
//!
//! assert_eq!(reader.read_line(&mut line).unwrap(), LineStatus::Partial);
//! assert_eq!(reader.read_line(&mut line).unwrap(), LineStatus::Partial);
//! assert_eq!(reader.read_line(&mut line).unwrap(), LineStatus::Complete);
//! assert_eq!(&line, b"ACGTACGT");
//! ```

use std::fs::File;
use std::io::{self, BufRead};
use std::path::Path;

use memchr::memchr;

use crate::trim_cr;

pub(crate) const BUFSIZE: usize = 64 * 1024;

/// Outcome of a single [`LineRead::read_line`](LineRead::read_line) call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    /// The appended bytes end the current line.
    Complete,
    /// The line is longer than the buffer; more fragments will follow.
    Partial,
    /// End of input, nothing was appended.
    End,
}

/// Source of physical lines
pub trait LineRead {
    /// Appends the next fragment of the current line to `out`, without the
    /// line terminator (`\n` or `\r\n`). A `Partial` fragment is always
    /// followed by more fragments ending with `Complete`, also at the end of
    /// input.
    fn read_line(&mut self, out: &mut Vec<u8>) -> io::Result<LineStatus>;
}

impl<'a, L: LineRead + ?Sized> LineRead for &'a mut L {
    #[inline]
    fn read_line(&mut self, out: &mut Vec<u8>) -> io::Result<LineStatus> {
        (**self).read_line(out)
    }
}

/// Buffered line reader with a fixed buffer size
pub struct LineReader<R: io::Read> {
    buf_reader: buffer_redux::BufReader<R>,
    // buffer bytes already known not to contain a newline
    searched: usize,
    // a Partial fragment was returned, the line is not finished yet
    pending: bool,
}

impl<R> LineReader<R>
where
    R: io::Read,
{
    /// Creates a new reader with the default buffer size of 64 KiB
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, BUFSIZE)
    }

    /// Creates a new reader with a given buffer capacity. Lines longer than
    /// the capacity are returned in fragments. The minimum allowed capacity
    /// is 3.
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        assert!(capacity >= 3);
        LineReader {
            buf_reader: buffer_redux::BufReader::with_capacity(capacity, reader),
            searched: 0,
            pending: false,
        }
    }

    /// Returns the buffer capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buf_reader.capacity()
    }

    /// Returns a reference to the underlying reader
    #[inline]
    pub fn get_ref(&self) -> &R {
        self.buf_reader.get_ref()
    }

    /// Unwraps the underlying reader. Buffered data is lost.
    pub fn into_inner(self) -> R {
        self.buf_reader.into_inner()
    }

    #[inline]
    fn take(&mut self, n: usize, out: &mut Vec<u8>, trim: bool) {
        let data = &self.buf_reader.buffer()[..n];
        out.extend_from_slice(if trim { trim_cr(data) } else { data });
    }

    #[inline]
    fn consume(&mut self, n: usize) {
        self.buf_reader.consume(n);
        self.searched = 0;
    }
}

impl LineReader<File> {
    /// Creates a line reader from a file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> io::Result<LineReader<File>> {
        File::open(path).map(LineReader::new)
    }
}

impl<R> LineRead for LineReader<R>
where
    R: io::Read,
{
    fn read_line(&mut self, out: &mut Vec<u8>) -> io::Result<LineStatus> {
        loop {
            let buf = self.buf_reader.buffer();
            if let Some(i) = memchr(b'\n', &buf[self.searched..]) {
                let end = self.searched + i;
                self.take(end, out, true);
                self.consume(end + 1);
                self.pending = false;
                return Ok(LineStatus::Complete);
            }
            self.searched = buf.len();

            if buf.len() >= self.buf_reader.capacity() {
                // a '\r' at the buffer end may belong to a '\r\n' terminator
                let n = if buf.len() > 1 && buf[buf.len() - 1] == b'\r' {
                    buf.len() - 1
                } else {
                    buf.len()
                };
                self.take(n, out, false);
                self.consume(n);
                self.pending = true;
                return Ok(LineStatus::Partial);
            }

            self.buf_reader.make_room();
            match self.buf_reader.read_into_buf() {
                Ok(0) => {
                    let n = self.buf_reader.buffer().len();
                    if n == 0 && !self.pending {
                        return Ok(LineStatus::End);
                    }
                    // the last line may end exactly at the buffer end
                    self.take(n, out, true);
                    self.consume(n);
                    self.pending = false;
                    return Ok(LineStatus::Complete);
                }
                Ok(_) => {}
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

use std::fmt;
use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Position of a decoding error within the input
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorPosition {
    line: u64,
    id: Option<String>,
}

impl ErrorPosition {
    pub fn new(line: u64, id: Option<String>) -> Self {
        ErrorPosition { line, id }
    }

    /// Line number (starting with 1) of the first line of the record
    /// in which the error occurred.
    #[inline]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// Returns the ID of the record where the error occurred,
    /// if the header had already been read. Invalid UTF-8 bytes are replaced
    /// (see `String::from_utf8_lossy`).
    #[inline]
    pub fn record_id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(id) = self.id.as_ref() {
            write!(f, "record '{}' at ", id)?;
        }
        write!(f, "line {}", self.line)
    }
}

#[derive(Debug)]
pub enum ErrorKind {
    /// The underlying source failed while reading.
    Read(io::Error),
    /// The underlying sink rejected a write.
    Write(io::Error),
    /// Input ended after a header was found, but before the quality
    /// line could begin.
    UnexpectedEnd {
        /// `ErrorPosition::line()` refers to the header line of the
        /// truncated record.
        pos: ErrorPosition,
    },
    /// Sequence and quality lengths found to be different.
    UnequalLengths {
        /// Position of the record. `None` if the error was returned by
        /// `Record::check_lengths()`.
        pos: Option<ErrorPosition>,
        /// Length of sequence
        seq: usize,
        /// Length of quality information
        qual: usize,
    },
    /// A region specification could not be parsed, or refers to bytes
    /// outside of the record.
    InvalidRegion {
        /// The offending specification (or the part of it that failed).
        spec: String,
        /// What was wrong with it.
        reason: String,
    },
    /// Invalid start byte encountered (expected `@`). Only returned in
    /// strict mode.
    InvalidStart {
        /// `ErrorPosition::line()` refers to the offending line.
        pos: ErrorPosition,
        /// Byte found instead.
        found: u8,
    },
    /// Invalid separator byte encountered (expected `+`). Only returned in
    /// strict mode.
    InvalidSep {
        /// `ErrorPosition::line()` refers to the header line of the record.
        pos: ErrorPosition,
        /// Byte found instead.
        found: u8,
    },
}

impl ErrorKind {
    /// Returns the position for this error, if one exists.
    pub fn position(&self) -> Option<&ErrorPosition> {
        match self {
            ErrorKind::UnexpectedEnd { pos } => Some(pos),
            ErrorKind::UnequalLengths { pos, .. } => pos.as_ref(),
            ErrorKind::InvalidStart { pos, .. } => Some(pos),
            ErrorKind::InvalidSep { pos, .. } => Some(pos),
            _ => None,
        }
    }
}

/// Decoding, encoding or transformation error
#[derive(Debug)]
pub struct Error {
    kind: Box<ErrorKind>,
}

impl Error {
    #[inline]
    pub fn new(kind: ErrorKind) -> Self {
        Error {
            kind: Box::new(kind),
        }
    }

    /// Returns a reference to the [`ErrorKind`](ErrorKind)
    /// associated with the error.
    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the [`ErrorKind`](ErrorKind) associated with
    /// the error, thereby consuming the error.
    #[inline]
    pub fn into_kind(self) -> ErrorKind {
        *self.kind
    }

    /// Returns the [`ErrorPosition`](ErrorPosition) of
    /// the error within the input.
    #[inline]
    pub fn position(&self) -> Option<&ErrorPosition> {
        self.kind().position()
    }

    #[inline]
    pub(crate) fn read(e: io::Error) -> Self {
        Error::new(ErrorKind::Read(e))
    }

    #[inline]
    pub(crate) fn write(e: io::Error) -> Self {
        Error::new(ErrorKind::Write(e))
    }

    pub(crate) fn invalid_region<S, R>(spec: S, reason: R) -> Self
    where
        S: Into<String>,
        R: Into<String>,
    {
        Error::new(ErrorKind::InvalidRegion {
            spec: spec.into(),
            reason: reason.into(),
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind() {
            ErrorKind::Read(e) => write!(f, "FASTQ read error: {}", e),
            ErrorKind::Write(e) => write!(f, "FASTQ write error: {}", e),
            ErrorKind::UnexpectedEnd { pos } => {
                write!(f, "FASTQ parse error: unexpected end of input ({})", pos)
            }
            ErrorKind::UnequalLengths { pos, seq, qual } => {
                write!(
                    f,
                    "FASTQ parse error: sequence length is {}, but quality length is {}",
                    seq, qual
                )?;
                if let Some(pos) = pos {
                    write!(f, " ({})", pos)?;
                }
                Ok(())
            }
            ErrorKind::InvalidRegion { spec, reason } => {
                write!(f, "invalid region specification '{}': {}", spec, reason)
            }
            ErrorKind::InvalidStart { pos, found } => write!(
                f,
                "FASTQ parse error: expected '@' at record start but found '{}' ({})",
                (*found as char).escape_default(),
                pos
            ),
            ErrorKind::InvalidSep { pos, found } => write!(
                f,
                "FASTQ parse error: expected '+' separator but found '{}' ({})",
                (*found as char).escape_default(),
                pos
            ),
        }
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        io::Error::new(io::ErrorKind::Other, err)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self.kind() {
            ErrorKind::Read(ref err) | ErrorKind::Write(ref err) => Some(err),
            _ => None,
        }
    }
}

#![allow(dead_code)]

use fqscan::Record;
use std::collections::VecDeque;
use std::io;

pub const FASTQ: &[u8] = b"
@id1 desc
ACGT
+
IIII


@id2
TGCATGCATGCATGCATGCATGCATGCA
+id2
IIIIIIIIIIIIIIIIIIIIIIIIIIII
@id3\r
\r
GGG\r
+\r
 I I I \r
@id4
+id4

@id5
AC
+
II";

lazy_static::lazy_static! {
    pub static ref EXPECTED: Vec<Record> = vec![
        Record::new("@id1 desc", "ACGT", "+", "IIII"),
        Record::new("@id2", "TGCA".repeat(7), "+id2", "I".repeat(28)),
        Record::new("@id3", "GGG", "+", "III"),
        Record::new("@id4", "", "+id4", ""),
        Record::new("@id5", "AC", "+", "II"),
    ];
}

/// Runs the block with decoders of many different buffer capacities, which
/// makes sure that long lines are joined correctly.
#[macro_export]
macro_rules! test_decoder {
    ($input:expr, $decoder:ident, $block:block) => {
        for cap in 3..80 {
            if let Err(_) = std::panic::catch_unwind(|| {
                #[allow(unused_mut)]
                let mut $decoder = fqscan::Decoder::with_capacity(&$input[..], cap);
                $block
            }) {
                panic!("Decoder failed at capacity {}", cap);
            }
        }
    };
}

/// Line source handing out predefined fragments
/// (`true`: more fragments of the same line follow).
pub struct Fragments(pub VecDeque<(&'static [u8], bool)>);

impl fqscan::lines::LineRead for Fragments {
    fn read_line(&mut self, out: &mut Vec<u8>) -> io::Result<fqscan::lines::LineStatus> {
        use fqscan::lines::LineStatus;
        Ok(match self.0.pop_front() {
            Some((data, partial)) => {
                out.extend_from_slice(data);
                if partial {
                    LineStatus::Partial
                } else {
                    LineStatus::Complete
                }
            }
            None => LineStatus::End,
        })
    }
}

/// Reader returning `data` and then failing (or being interrupted once
/// before returning data)
pub struct FlakyReader {
    pub data: &'static [u8],
    pub interrupt: bool,
}

impl io::Read for FlakyReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.interrupt {
            self.interrupt = false;
            return Err(io::Error::new(io::ErrorKind::Interrupted, "interrupted"));
        }
        if self.data.is_empty() {
            return Err(io::Error::new(io::ErrorKind::Other, "device gone"));
        }
        let n = self.data.len().min(buf.len());
        buf[..n].copy_from_slice(&self.data[..n]);
        self.data = &self.data[n..];
        Ok(n)
    }
}

/// Writer accepting `limit` bytes, then failing
pub struct LimitedWriter {
    pub data: Vec<u8>,
    pub limit: usize,
}

impl io::Write for LimitedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = buf.len().min(self.limit - self.data.len());
        if n == 0 && !buf.is_empty() {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.data.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Random but reproducible records. Sequences may be empty.
pub fn random_records(n: usize, seed: u64) -> Vec<Record> {
    use rand::{Rng, SeedableRng};
    let mut rng = rand_isaac::Isaac64Rng::seed_from_u64(seed);
    (0..n)
        .map(|i| {
            let len = rng.gen_range(0..200);
            let letters: Vec<u8> = (0..len).map(|_| b"ACGTN"[rng.gen_range(0..5)]).collect();
            let quality: Vec<u8> = (0..len).map(|_| rng.gen_range(b'!'..=b'J')).collect();
            let head = format!("r{} len={}", i, len);
            let secondary_id = if rng.gen_bool(0.5) {
                format!("+{}", head)
            } else {
                "+".to_string()
            };
            Record::new(format!("@{}", head), letters, secondary_id, quality)
        })
        .collect()
}

pub fn encode(records: &[Record]) -> Vec<u8> {
    let mut out = vec![];
    for rec in records {
        rec.write(&mut out).unwrap();
    }
    out
}

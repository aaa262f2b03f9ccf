//! Parallel processing of records
//!
//! Decoding itself is sequential: one background thread owns the decoder and
//! fills batches of records ([`RecordSet`](crate::RecordSet)). The batches are
//! handed to a pool of worker threads, and the results are passed back to the
//! calling thread together with the records. Record sets are recycled, so
//! their allocations are reused.
//!
//! Batches are not necessarily returned in the order of the input.
//!
//! # Per-record processing
//!
//! This example converts all sequences with [`c_to_t`](crate::transform::c_to_t)
//! in the worker threads and writes the results in the calling thread:
//!
//! ```
//! use fqscan::{Decoder, Record, Writer};
//! use fqscan::transform::c_to_t;
//!
//! let fastq = b"@id1\nACGT\n+\nIIII\n@id2\nCCGG\n+\nIIII\n";
//! let decoder = Decoder::new(&fastq[..]);
//! let mut writer = Writer::new(vec![]);
//!
//! fqscan::parallel::parallel_records(decoder, 2, 2,
//!     |record, converted: &mut Option<Record>| { // runs in worker
//!         *converted = Some(c_to_t(record));
//!     },
//!     |_, converted| { // runs in the calling thread
//!         writer.write_record(converted.as_ref().unwrap()).unwrap();
//!         // `false` would stop reading
//!         true
//! }).unwrap();
//!
//! assert_eq!(writer.records_written(), 2);
//! ```

use std::mem;
use std::panic;
use std::sync::mpsc;

use log::debug;

use crate::decoder::Decoder;
use crate::error::Result;
use crate::lines::LineRead;
use crate::record::{Record, RecordSet};

/// Number of records per batch used by [`parallel_records`](parallel_records)
pub const BATCH_SIZE: usize = 256;

type Done<O> = Option<Result<(RecordSet, O)>>;

/// Reads batches of `batch_size` records in a background thread and applies
/// `work` to them in `n_threads` worker threads. `func` runs in the calling
/// thread and receives the processed batches through
/// [`ParallelRecordSets::next`](ParallelRecordSets::next).
/// At most `queue_len` batches are in flight at the same time. Zero values
/// for `n_threads` and `queue_len` are raised to 1.
pub fn read_parallel<L, O, W, F, Out>(
    mut decoder: Decoder<L>,
    n_threads: u32,
    queue_len: usize,
    batch_size: usize,
    work: W,
    func: F,
) -> Out
where
    L: LineRead + Send,
    O: Send,
    W: Fn(&mut RecordSet) -> O + Send + Sync,
    F: FnOnce(&mut ParallelRecordSets<O>) -> Out,
{
    let queue_len = queue_len.max(1);
    let (done_send, done_recv) = mpsc::sync_channel::<Done<O>>(queue_len);
    let (empty_send, empty_recv) = mpsc::sync_channel::<Option<RecordSet>>(queue_len);

    let res = crossbeam_utils::thread::scope(|scope| {
        scope.spawn(move |_| {
            debug!("Starting reader thread with {} workers", n_threads);
            let mut pool = scoped_threadpool::Pool::new(n_threads.max(1));

            pool.scoped(|pool_scope| {
                let work = &work;

                loop {
                    // recycle a set sent back by ParallelRecordSets
                    let mut rset = match empty_recv.recv() {
                        Ok(Some(r)) => r,
                        // stopped
                        _ => return,
                    };

                    match decoder.read_record_set(&mut rset, batch_size) {
                        Ok(true) => {
                            let done_send = done_send.clone();
                            pool_scope.execute(move || {
                                let out = work(&mut rset);
                                done_send.send(Some(Ok((rset, out)))).ok();
                            });
                        }
                        Ok(false) => break,
                        Err(e) => {
                            done_send.send(Some(Err(e))).ok();
                            break;
                        }
                    }
                }

                // the 'done' signal must come after all results
                pool_scope.join_all();
                done_send.send(None).ok();
            });
            debug!("Reader thread finished");
        });

        for _ in 0..queue_len {
            // fails only if the reader thread already finished
            empty_send.send(Some(RecordSet::default())).ok();
        }

        let mut sets = ParallelRecordSets {
            empty_send,
            done_recv,
            current: RecordSet::default(),
        };

        let out = func(&mut sets);
        sets.stop();
        out
    });

    match res {
        Ok(out) => out,
        Err(e) => panic::resume_unwind(e),
    }
}

/// Streaming iterator over processed record sets, see
/// [`read_parallel`](read_parallel).
pub struct ParallelRecordSets<O> {
    empty_send: mpsc::SyncSender<Option<RecordSet>>,
    done_recv: mpsc::Receiver<Done<O>>,
    current: RecordSet,
}

impl<O> ParallelRecordSets<O>
where
    O: Send,
{
    /// Returns the next processed record set together with the output of
    /// the worker function, or `None` if all records were read.
    pub fn next(&mut self) -> Option<Result<(&RecordSet, O)>> {
        match self.done_recv.recv() {
            Ok(Some(Ok((rset, out)))) => {
                let prev = mem::replace(&mut self.current, rset);
                // error: reader thread already finished
                self.empty_send.send(Some(prev)).ok();
                Some(Ok((&self.current, out)))
            }
            Ok(Some(Err(e))) => Some(Err(e)),
            Ok(None) | Err(_) => None,
        }
    }

    fn stop(self) {
        self.empty_send.send(None).ok();
    }
}

/// Processes every record in worker threads with `work` and passes it with
/// the result to `func` in the calling thread. Stops early if `func` returns
/// `false`. Decoding errors are returned.
pub fn parallel_records<L, O, W, F>(
    decoder: Decoder<L>,
    n_threads: u32,
    queue_len: usize,
    work: W,
    mut func: F,
) -> Result<()>
where
    L: LineRead + Send,
    O: Default + Send,
    W: Fn(&Record, &mut O) + Send + Sync,
    F: FnMut(&Record, &O) -> bool,
{
    read_parallel(
        decoder,
        n_threads,
        queue_len,
        BATCH_SIZE,
        |rset| {
            rset.iter()
                .map(|rec| {
                    let mut out = O::default();
                    work(rec, &mut out);
                    out
                })
                .collect::<Vec<O>>()
        },
        |sets| -> Result<()> {
            while let Some(result) = sets.next() {
                let (rset, out) = result?;
                for (rec, o) in rset.iter().zip(&out) {
                    if !func(rec, o) {
                        return Ok(());
                    }
                }
            }
            Ok(())
        },
    )
}

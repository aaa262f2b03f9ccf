use criterion::{criterion_group, criterion_main, Criterion};
use fqscan::transform::{c_to_t, extract, truncate};
use fqscan::{Decoder, Scanner, Writer};
use rand::{Rng, SeedableRng};
use rand_distr::Normal;
use rand_isaac::isaac64::Isaac64Rng;
use std::iter::repeat;

/// number of records for all benchmarks
const N: usize = 10_000;
const SEQLEN_SD_FRAC: f64 = 0.2;

/// generates 'nrecords' FASTQ records with given properties
fn gen_fastq(
    nrecords: usize,
    id_len: usize,
    desc_len: usize,
    seq_len: usize,
    sep_ids: bool,
    cr: bool,
) -> Vec<u8> {
    let newline = if cr { b"\r\n".to_vec() } else { b"\n".to_vec() };
    let mut rec: Vec<u8> = vec![];
    rec.push(b'@');
    let id: Vec<_> = repeat(b'i').take(id_len).collect();
    rec.extend(&id);
    rec.push(b' ');
    let desc: Vec<_> = repeat(b'd').take(desc_len).collect();
    rec.extend(&desc);
    rec.extend(&newline);

    let norm = Normal::new(seq_len as f64, seq_len as f64 * SEQLEN_SD_FRAC).unwrap();
    let mut rng = Isaac64Rng::from_seed([5; 32]);

    (&mut rng)
        .sample_iter(&norm)
        .map(|slen: f64| {
            let slen = slen.round().max(0.) as usize;
            let mut r = rec.clone();
            r.extend(repeat(b'A').take(slen));
            r.extend(&newline);
            r.push(b'+');
            if sep_ids {
                r.extend(&id);
                r.push(b' ');
                r.extend(&desc);
            }
            r.extend(&newline);
            r.extend(repeat(66).take(slen));
            r.extend(&newline);
            r
        })
        .take(nrecords)
        .flatten()
        .collect()
}

/// generates 'nrecords' FASTQ records with fixed ID / description lengths
/// (20 and 50), but configurable otherwise
fn with_seqlen(nrecords: usize, seq_len: usize, sep_ids: bool, cr: bool) -> Vec<u8> {
    gen_fastq(nrecords, 20, 50, seq_len, sep_ids, cr)
}

macro_rules! bench {
    ($c:expr, $name:expr, $data:expr, $input:ident, $code:block) => {
        let data = $data;
        let name = format!("fastq {} {}", $name, data.len());
        $c.bench_function(&name, move |b| {
            b.iter(|| {
                let $input = data.as_slice();
                $code
            })
        });
    };
}

macro_rules! decode {
    ($c:expr, $name:expr, $data:expr, $rec:ident, $code:block) => {
        bench!($c, $name, $data, input, {
            let mut decoder = Decoder::new(input);
            while let Some($rec) = decoder.next_record().unwrap() {
                $code
            }
        });
    };
}

fn decoders(c: &mut Criterion) {
    decode!(c, "decode 200", with_seqlen(N, 200, false, false), r, {});
    decode!(c, "decode 500", with_seqlen(N, 500, false, false), r, {});
    decode!(c, "decode 500 sep_ids", with_seqlen(N, 500, true, false), r, {});
    decode!(c, "decode 500 crlf", with_seqlen(N, 500, false, true), r, {});
    decode!(c, "decode 1000", with_seqlen(N, 1000, false, false), r, {});

    bench!(c, "scanner 500", with_seqlen(N, 500, false, false), input, {
        let mut scanner = Scanner::new(Decoder::new(input));
        while scanner.advance() {}
        assert!(scanner.last_error().is_none());
    });

    decode!(c, "decode 500 c_to_t", with_seqlen(N, 500, false, false), r, {
        let _ = c_to_t(&r);
    });
    decode!(c, "decode 500 truncate", with_seqlen(N, 500, false, false), r, {
        let _ = truncate(&r, 100);
    });
    decode!(c, "decode 500 extract", with_seqlen(N, 500, false, false), r, {
        let _ = extract(&r, "0:50,100:150,200:250");
    });

    bench!(c, "decode,write 500", with_seqlen(N, 500, false, false), input, {
        let mut writer = Writer::new(Vec::with_capacity(input.len()));
        let mut decoder = Decoder::new(input);
        while let Some(r) = decoder.next_record().unwrap() {
            writer.write_record(&r).unwrap();
        }
    });

    bench!(c, "decode 500 records,parallel", with_seqlen(N, 500, false, false), input, {
        fqscan::parallel::parallel_records(
            Decoder::new(input),
            2,
            2,
            |r, out: &mut usize| *out = c_to_t(r).letters.len(),
            |_, _| true,
        )
        .unwrap();
    });
}

// compare different buffer capacities; lines longer than the buffer
// are read in several fragments

macro_rules! bench_cap {
    ($c:expr, $name:expr, $seqlen:expr, $cap:expr, $n:expr) => {
        bench!($c, $name, with_seqlen($n, $seqlen, false, false), input, {
            let mut decoder = Decoder::with_capacity(input, $cap);
            while let Some(r) = decoder.next_record().unwrap() {
                let _ = r;
            }
        });
    };
}

fn decoders_cap(c: &mut Criterion) {
    bench_cap!(c, "decode_cap 200 64", 200, 64, N);
    bench_cap!(c, "decode_cap 200 1ki", 200, 1 << 10, N);
    bench_cap!(c, "decode_cap 200 64ki", 200, 1 << 16, N);

    bench_cap!(c, "decode_cap 10000 1ki", 10000, 1 << 10, N / 10);
    bench_cap!(c, "decode_cap 10000 8ki", 10000, 1 << 13, N / 10);
    bench_cap!(c, "decode_cap 10000 64ki", 10000, 1 << 16, N / 10);
}

criterion_group!(benches, decoders, decoders_cap);
criterion_main!(benches);

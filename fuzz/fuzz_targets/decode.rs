#![no_main]
use libfuzzer_sys::fuzz_target;

use fqscan::transform::{extract, truncate};
use fqscan::{Decoder, Writer};

fuzz_target!(|data: &[u8]| {
    // small buffer, so that most lines arrive in fragments
    let mut decoder = Decoder::with_capacity(data, 3);
    let mut reference = Decoder::new(data);
    let mut writer = Writer::new(vec![]);

    loop {
        let res = decoder.next_record();
        let exp = reference.next_record();
        match (res, exp) {
            (Ok(Some(rec)), Ok(Some(exp))) => {
                assert_eq!(rec, exp);
                assert_eq!(rec.letters.len(), rec.quality.len());
                let _ = extract(&rec, "0:1,1:2");
                let t = truncate(&rec, 1);
                assert!(t.letters.len() <= 1);
                let n = writer.write_record(&rec).unwrap();
                let expected = rec.primary_id.len()
                    + rec.letters.len()
                    + rec.secondary_id.len()
                    + rec.quality.len()
                    + 4;
                assert_eq!(n, expected);
            }
            (Ok(None), Ok(None)) => break,
            // decoding goes on after errors
            (Err(_), Err(_)) => {}
            (res, exp) => panic!("buffer size changed the result: {:?} vs. {:?}", res, exp),
        }
    }
});

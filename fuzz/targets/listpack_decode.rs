#![no_main]

use libfuzzer_sys::fuzz_target;
use packedcore::ListPack;

fuzz_target!(|data: &[u8]| {
    // Decoding arbitrary bytes must never panic, whether or not they
    // happen to be a valid encoded ListPack.
    let result = std::panic::catch_unwind(|| ListPack::from_bytes(data));

    match result {
        Ok(Some(lp)) => {
            // A successfully decoded ListPack must itself round-trip and
            // tolerate iteration/get over its full length without panicking.
            let _ = std::panic::catch_unwind(|| {
                let reencoded = lp.to_bytes();
                let _ = ListPack::from_bytes(&reencoded);
                for i in 0..lp.len() {
                    let _ = lp.get(i);
                }
                for item in lp.iter() {
                    let _ = item.len();
                }
            });
        }
        Ok(None) => {}
        Err(_panic) => {
            panic!("ListPack::from_bytes panicked on {data:?}");
        }
    }
});

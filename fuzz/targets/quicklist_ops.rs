#![no_main]

use std::collections::VecDeque;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use packedcore::{CompressDepth, Direction, FillPolicy, QuickList};

#[derive(Debug, Arbitrary)]
enum Op {
    PushTail(Vec<u8>),
    PushHead(Vec<u8>),
    PopTail,
    PopHead,
    Get(i64),
    Rotate,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    fill: u8,
    compress: u8,
    ops: Vec<Op>,
}

/// Drives a `QuickList` through an arbitrary operation sequence against a
/// `VecDeque<Vec<u8>>` model, asserting no panic and that the two never
/// disagree on pop/get results or the live element count.
fuzz_target!(|input: FuzzInput| {
    let fill = FillPolicy::Count((input.fill as u16).max(1));
    let compress = CompressDepth((input.compress % 4) as u16);
    let mut ql = QuickList::new(fill, compress);
    let mut model: VecDeque<Vec<u8>> = VecDeque::new();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        for op in &input.ops {
            match op {
                Op::PushTail(v) => {
                    ql.push_tail(v);
                    model.push_back(v.clone());
                }
                Op::PushHead(v) => {
                    ql.push_head(v);
                    model.push_front(v.clone());
                }
                Op::PopTail => {
                    let got = ql.pop(Direction::Reverse);
                    let expected = model.pop_back();
                    assert_eq!(got, expected, "pop(Reverse) diverged from model");
                }
                Op::PopHead => {
                    let got = ql.pop(Direction::Forward);
                    let expected = model.pop_front();
                    assert_eq!(got, expected, "pop(Forward) diverged from model");
                }
                Op::Get(idx) => {
                    let got = ql.get(*idx);
                    let expected = if *idx >= 0 {
                        model.get(*idx as usize).cloned()
                    } else {
                        let from_tail = (-*idx - 1) as usize;
                        model.len().checked_sub(from_tail + 1).and_then(|i| model.get(i).cloned())
                    };
                    assert_eq!(got, expected, "get({idx}) diverged from model");
                }
                Op::Rotate => {
                    if let Some(v) = model.pop_back() {
                        model.push_front(v);
                    }
                    ql.rotate();
                }
            }
            assert_eq!(ql.count(), model.len(), "count diverged from model");
        }
    }));

    if result.is_err() {
        panic!("QuickList panicked on op sequence: {:?}", input.ops);
    }
});

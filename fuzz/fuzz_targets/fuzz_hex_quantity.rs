#![no_main]

use libfuzzer_sys::fuzz_target;
use walletlink_provider::{parse_chain_id, parse_quantity};

fuzz_target!(|data: &str| {
    if let Ok(value) = parse_quantity(data) {
        // Whatever parses must re-parse from its canonical form
        assert_eq!(parse_quantity(&format!("{value:#x}")).ok(), Some(value));
    }
    if let Ok(chain_id) = parse_chain_id(data) {
        assert_eq!(parse_quantity(data).ok(), Some(u128::from(chain_id)));
    }
});

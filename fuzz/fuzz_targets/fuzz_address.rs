#![no_main]

use libfuzzer_sys::fuzz_target;
use walletlink_ethereum::{checksum_address, format_address, is_valid_address, EthereumFormat};

fuzz_target!(|data: &str| {
    match checksum_address(data) {
        Ok(checksummed) => {
            assert!(is_valid_address(data));
            assert_eq!(checksummed.len(), 42);
            // Checksumming is idempotent and case-insensitive
            assert_eq!(checksum_address(&checksummed).ok(), Some(checksummed.clone()));
            let lower = format_address(data, EthereumFormat::NonChecksummed).ok();
            assert_eq!(lower, Some(checksummed.to_lowercase()));
        }
        Err(_) => assert!(!is_valid_address(data)),
    }
});

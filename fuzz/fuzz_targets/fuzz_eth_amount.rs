#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use walletlink_ethereum::alloy::primitives::U256;
use walletlink_ethereum::EthereumAmount;
use walletlink_traits::Amount;

#[derive(Debug, Arbitrary)]
struct AmountInput {
    // Use 4 u64s to construct a U256
    wei_parts: [u64; 4],
    wei: u128,
    decimals: u8,
}

fuzz_target!(|input: AmountInput| {
    let wide = EthereumAmount::from_wei(U256::from_limbs(input.wei_parts));

    // 256-bit and 128-bit formatting agree on the shared range
    match (wide.to_decimal_string(), Amount::try_from(wide)) {
        (Ok(text), Ok(narrow)) => {
            let (_, fraction) = text.split_once('.').unwrap_or_default();
            assert!(fraction == "0" || !fraction.ends_with('0'));
            assert_eq!(narrow.to_decimal_string(), text);
        }
        (Err(_), Err(_)) => assert!(wide.wei() > U256::from(u128::MAX)),
        _ => panic!("formatting and conversion disagree for {}", wide.wei()),
    }

    // Any decimals value formats without panicking and keeps every digit
    let amount = Amount::from_smallest_unit(input.wei, input.decimals);
    let digits: String = amount
        .to_decimal_string()
        .chars()
        .filter(|c| *c != '.')
        .collect();
    let original = input.wei.to_string();
    assert_eq!(
        digits.trim_start_matches('0').trim_end_matches('0'),
        original.trim_end_matches('0').trim_start_matches('0')
    );
});

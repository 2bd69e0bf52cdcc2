//! Cross-crate properties of the codec, selector and fee model.

use proptest::prelude::*;
use zslp_core::slp::{
    decode_genesis_metadata, decode_output, encode_genesis_payload, encode_send_payload,
    GenesisParams,
};
use zslp_core::types::Hash256;
use zslp_tests::helpers::*;
use zslp_wallet::fee::estimate_bytes;
use zslp_wallet::{CoinSelector, FeeEstimator, WalletConfig};

proptest! {
    #[test]
    fn genesis_metadata_round_trips(
        symbol in "[A-Z]{1,8}",
        name in "[A-Za-z ]{0,40}",
        decimals in 0u8..=9,
        quantity in any::<u64>(),
    ) {
        let script = encode_genesis_payload(&GenesisParams {
            symbol: symbol.clone(),
            name: name.clone(),
            document_url: String::new(),
            document_hash: None,
            decimals,
            baton_vout: None,
            initial_quantity: quantity,
        });
        let meta = decode_genesis_metadata(&TOKEN_ID, &script).unwrap();
        prop_assert_eq!(meta.symbol, symbol);
        prop_assert_eq!(meta.name, name);
        prop_assert_eq!(meta.decimals, decimals);
    }

    #[test]
    fn send_quantities_decode_by_output(quantities in prop::collection::vec(any::<u64>(), 1..=19)) {
        let script = encode_send_payload(&TOKEN_ID, &quantities).unwrap();
        let txid = Hash256([1; 32]);
        for (i, qty) in quantities.iter().enumerate() {
            let out = decode_output(&txid, &script, i as u32 + 1).unwrap();
            prop_assert_eq!(out.quantity, *qty);
            prop_assert_eq!(out.token_id, TOKEN_ID);
        }
        prop_assert!(decode_output(&txid, &script, quantities.len() as u32 + 1).is_err());
    }

    #[test]
    fn selection_always_covers_target_and_fee(
        values in prop::collection::vec(1u64..10_000, 0..12),
        target in 0u64..60_000,
    ) {
        let candidates: Vec<_> = values
            .iter()
            .enumerate()
            .map(|(i, v)| native(i as u8 + 1, *v))
            .collect();
        let fees = FeeEstimator::new(&WalletConfig::default());
        if let Ok(sel) = CoinSelector::select(&candidates, target, |n| fees.native_send_fee(n, None)) {
            prop_assert!(sel.total >= target + fees.native_send_fee(sel.selected.len(), None));
            prop_assert_eq!(&sel.selected[..], &candidates[..sel.selected.len()]);
        }
    }

    #[test]
    fn byte_estimate_is_monotonic(inputs in 0usize..100, outputs in 0usize..100) {
        prop_assert!(estimate_bytes(inputs + 1, outputs, None) >= estimate_bytes(inputs, outputs, None));
        prop_assert!(estimate_bytes(inputs, outputs + 1, None) >= estimate_bytes(inputs, outputs, None));
    }
}

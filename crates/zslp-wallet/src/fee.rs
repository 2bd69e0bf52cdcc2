//! Transaction byte-cost and fee estimation.
//!
//! Pure functions of input/output counts. Inputs are compressed-key P2PKH
//! (148 bytes signed), outputs P2PKH (34 bytes), plus 10 bytes of framing.

use zslp_core::constants::{
    OP_RETURN_OVERHEAD_BYTES, P2PKH_INPUT_BYTES, P2PKH_OUTPUT_BYTES, TX_OVERHEAD_BYTES,
};

use crate::config::WalletConfig;

/// Serialized size of a transaction with `input_count` P2PKH inputs,
/// `output_count` P2PKH outputs and an optional `OP_RETURN` script.
pub fn estimate_bytes(input_count: usize, output_count: usize, op_return_len: Option<usize>) -> u64 {
    let mut bytes = TX_OVERHEAD_BYTES
        .saturating_add(P2PKH_INPUT_BYTES.saturating_mul(input_count as u64))
        .saturating_add(P2PKH_OUTPUT_BYTES.saturating_mul(output_count as u64));
    if let Some(len) = op_return_len {
        bytes = bytes
            .saturating_add(len as u64)
            .saturating_add(OP_RETURN_OVERHEAD_BYTES);
    }
    bytes
}

/// Fee calculator bound to a configuration.
#[derive(Debug, Clone, Copy)]
pub struct FeeEstimator {
    fee_per_byte: u64,
    dust_limit: u64,
    sweep_margin_percent: u64,
}

impl FeeEstimator {
    pub fn new(config: &WalletConfig) -> Self {
        Self {
            fee_per_byte: config.fee_per_byte,
            dust_limit: config.dust_limit,
            sweep_margin_percent: config.sweep_fee_margin_percent,
        }
    }

    /// Fee for a plain send: `input_count` inputs, two outputs (destination
    /// and change), plus an optional `OP_RETURN` payload.
    pub fn native_send_fee(&self, input_count: usize, op_return_len: Option<usize>) -> u64 {
        estimate_bytes(input_count, 2, op_return_len).saturating_mul(self.fee_per_byte)
    }

    /// Satoshi cost of a token send.
    ///
    /// `output_count` is the number of token receivers plus one for native
    /// change. One more P2PKH output is charged for the change address, and
    /// `output_count` dust outputs are counted as spent value. Callers add one
    /// dust amount back to the native change output.
    pub fn token_send_cost(&self, payload_len: usize, input_count: usize, output_count: usize) -> u64 {
        let bytes = estimate_bytes(input_count, output_count + 1, Some(payload_len));
        let dust = self.dust_limit.saturating_mul(output_count as u64);
        bytes.saturating_mul(self.fee_per_byte).saturating_add(dust)
    }

    /// Fee for sweeping `input_count` inputs into one output, with the
    /// configured safety margin, rounded up.
    pub fn sweep_fee(&self, input_count: usize) -> u64 {
        let base = estimate_bytes(input_count, 1, None).saturating_mul(self.fee_per_byte);
        let scaled = base.saturating_mul(100 + self.sweep_margin_percent);
        scaled.div_ceil(100)
    }
}

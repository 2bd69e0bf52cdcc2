//! Native-coin send builder.
//!
//! 1. Select candidates first-fit until amount plus fee is covered
//! 2. Emit destination, optional `OP_RETURN`, and change above dust
//! 3. Every input is signed by its own UTXO key

use tracing::debug;
use zslp_core::amount::native_satoshis;
use zslp_core::script::encode_op_return;
use zslp_core::types::{SendRequest, Utxo};

use crate::coin_selection::CoinSelector;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::fee::FeeEstimator;
use crate::plan::{BuildPlan, PlannedInput, PlannedOutput};

/// Builds plain payments, optionally carrying an `OP_RETURN` payload.
pub struct NativeSendBuilder<'a> {
    config: &'a WalletConfig,
}

impl<'a> NativeSendBuilder<'a> {
    pub fn new(config: &'a WalletConfig) -> Self {
        Self { config }
    }

    /// Plan a payment of `request.amount` satoshis from `candidates`.
    ///
    /// Candidates may belong to any address the wallet controls; each must
    /// carry its signing key. Change goes back to `request.from`.
    pub fn build(&self, request: &SendRequest, candidates: &[Utxo]) -> Result<BuildPlan, WalletError> {
        let amount = native_satoshis(request.amount)?;
        if candidates.is_empty() {
            return Err(WalletError::InsufficientFunds {
                have: 0,
                need: amount,
            });
        }

        let payload = request.op_return.as_deref().map(encode_op_return);
        let payload_len = payload.as_ref().map(Vec::len);
        let fees = FeeEstimator::new(self.config);

        let selection = CoinSelector::select(candidates, amount, |n| {
            fees.native_send_fee(n, payload_len)
        })
        .map_err(|e| match e {
            WalletError::InsufficientFunds { have, need } if have >= amount => {
                WalletError::FeeShortfall { have, need }
            }
            other => other,
        })?;

        let remaining = selection.excess(amount);

        let mut outputs = Vec::with_capacity(3);
        outputs.push(PlannedOutput::to_address(request.to.clone(), amount));
        if let Some(script) = payload {
            outputs.push(PlannedOutput::op_return(script));
        }
        let change = if remaining >= self.config.dust_limit {
            outputs.push(PlannedOutput::to_address(request.from.clone(), remaining));
            remaining
        } else {
            0
        };

        let inputs = selection
            .selected
            .iter()
            .map(PlannedInput::from_utxo)
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            inputs = inputs.len(),
            amount,
            fee = selection.fee,
            change,
            "planned native send"
        );

        Ok(BuildPlan {
            inputs,
            outputs,
            fee: selection.fee,
            change,
        })
    }
}

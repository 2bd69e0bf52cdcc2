//! Token-layer send builder.
//!
//! Output layout:
//!
//! | vout | value                 | purpose                       |
//! |------|-----------------------|-------------------------------|
//! | 0    | 0                     | `SEND` payload                |
//! | 1    | dust                  | token destination             |
//! | 2    | dust                  | token change (if any)         |
//! | last | remainder + dust      | native change to the sender   |
//!
//! The token-aware cost counts one dust output more than the outputs that
//! actually carry dust, so the native change adds exactly one dust amount back.

use tracing::debug;
use zslp_core::amount::{scale_token_amount, to_display_amount};
use zslp_core::slp::encode_send_payload;
use zslp_core::types::{SendRequest, TokenMetadata, Utxo};

use crate::coin_selection::CoinSelector;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::fee::FeeEstimator;
use crate::plan::{BuildPlan, PlannedInput, PlannedOutput};

/// Builds token sends with token change and native change.
pub struct TokenSendBuilder<'a> {
    config: &'a WalletConfig,
}

impl<'a> TokenSendBuilder<'a> {
    pub fn new(config: &'a WalletConfig) -> Self {
        Self { config }
    }

    /// Plan a send of `request.amount` display units of `metadata`'s token.
    ///
    /// `token_candidates` are spent first, in order, until the amount is
    /// covered; `fee_candidates` then pay the network cost. Token change goes
    /// to `token_change_address`, native change to `request.from`.
    pub fn build(
        &self,
        request: &SendRequest,
        metadata: &TokenMetadata,
        token_candidates: &[Utxo],
        fee_candidates: &[Utxo],
        token_change_address: &str,
    ) -> Result<BuildPlan, WalletError> {
        let context = request.token.ok_or(WalletError::MissingTokenContext)?;
        if context.token_id != metadata.token_id {
            return Err(WalletError::TokenMismatch {
                expected: metadata.token_id,
                got: context.token_id,
            });
        }

        let send_amount = scale_token_amount(request.amount, metadata.decimals)?;
        if send_amount < 1 {
            return Err(WalletError::BelowTokenMinimum);
        }

        let tokens = CoinSelector::select_tokens(token_candidates, &metadata.token_id, send_amount)?;
        let token_change = u64::try_from(tokens.total_quantity - u128::from(send_amount))
            .map_err(|_| WalletError::InvalidAmount("token change exceeds 64 bits".into()))?;

        let (quantities, receivers) = if token_change > 0 {
            (vec![send_amount, token_change], 2usize)
        } else {
            (vec![send_amount], 1usize)
        };
        let payload = encode_send_payload(&metadata.token_id, &quantities)?;

        let fees = FeeEstimator::new(self.config);
        let token_inputs = tokens.selected.len();
        let natives = CoinSelector::select(fee_candidates, 0, |n| {
            fees.token_send_cost(payload.len(), token_inputs + n, receivers + 1)
        })?;

        let input_count = token_inputs + natives.selected.len();
        if input_count > self.config.max_inputs {
            return Err(WalletError::TooManyInputs {
                count: input_count,
                max: self.config.max_inputs,
            });
        }

        let cost = natives.fee;
        let total = tokens.total_satoshis.saturating_add(natives.total);
        if total < cost {
            return Err(WalletError::FeeShortfall { have: total, need: cost });
        }
        let remaining = total - cost;
        let dust = self.config.dust_limit;

        let mut outputs = Vec::with_capacity(4);
        outputs.push(PlannedOutput::op_return(payload));
        outputs.push(PlannedOutput::to_address(request.to.clone(), dust));
        if token_change > 0 {
            outputs.push(PlannedOutput::to_address(token_change_address, dust));
        }
        let native_change = remaining + dust;
        outputs.push(PlannedOutput::to_address(request.from.clone(), native_change));

        let inputs = tokens
            .selected
            .iter()
            .chain(natives.selected.iter())
            .map(PlannedInput::from_utxo)
            .collect::<Result<Vec<_>, _>>()?;

        let miner_fee = cost - dust * (receivers as u64 + 1);
        debug!(
            token_id = %metadata.token_id,
            amount = %to_display_amount(send_amount, metadata.decimals).unwrap_or_default(),
            token_change,
            inputs = inputs.len(),
            fee = miner_fee,
            "planned token send"
        );

        Ok(BuildPlan {
            inputs,
            outputs,
            fee: miner_fee,
            change: native_change,
        })
    }
}

//! First-fit UTXO selection.
//!
//! Candidates are taken in the order the caller gives them; selection stops
//! at the first prefix whose total covers the target plus a fee that is
//! recomputed after every addition. No attempt is made to minimise change.

use tracing::debug;
use zslp_core::types::{Hash256, Utxo};

use crate::error::WalletError;

/// Result of native coin selection.
#[derive(Debug, Clone)]
pub struct CoinSelection {
    /// Chosen UTXOs, a prefix of the candidate list.
    pub selected: Vec<Utxo>,
    /// Total satoshis of `selected`.
    pub total: u64,
    /// Fee estimate for `selected.len()` inputs.
    pub fee: u64,
}

impl CoinSelection {
    /// Satoshis left after paying `target` and the fee.
    pub fn excess(&self, target: u64) -> u64 {
        self.total.saturating_sub(target).saturating_sub(self.fee)
    }
}

/// Result of token selection.
#[derive(Debug, Clone)]
pub struct TokenSelection {
    pub selected: Vec<Utxo>,
    /// Total base units of `selected`.
    pub total_quantity: u128,
    /// Total satoshis riding on `selected`.
    pub total_satoshis: u64,
}

/// First-fit greedy selector.
pub struct CoinSelector;

impl CoinSelector {
    /// Select native UTXOs until `total >= target + fee_for(selected.len())`.
    ///
    /// Every examined candidate must be spendable; an unspendable one is a
    /// caller bug and fails with [`WalletError::UnspendableInput`].
    pub fn select<F>(candidates: &[Utxo], target: u64, fee_for: F) -> Result<CoinSelection, WalletError>
    where
        F: Fn(usize) -> u64,
    {
        let mut selected = Vec::new();
        let mut total: u64 = 0;

        for utxo in candidates {
            if !utxo.spendable {
                return Err(WalletError::UnspendableInput(utxo.outpoint));
            }
            selected.push(utxo.clone());
            total = total.saturating_add(utxo.satoshis);

            let fee = fee_for(selected.len());
            if total >= target.saturating_add(fee) {
                debug!(inputs = selected.len(), total, fee, target, "coin selection satisfied");
                return Ok(CoinSelection { selected, total, fee });
            }
        }

        let fee = fee_for(selected.len());
        Err(WalletError::InsufficientFunds {
            have: total,
            need: target.saturating_add(fee),
        })
    }

    /// Select token UTXOs of `token_id` until their quantity reaches `target`.
    ///
    /// Candidates must carry a non-baton association with `token_id`; the
    /// `spendable` flag is not consulted since token outputs are normally
    /// fenced off from native sends.
    pub fn select_tokens(
        candidates: &[Utxo],
        token_id: &Hash256,
        target: u64,
    ) -> Result<TokenSelection, WalletError> {
        let mut selected = Vec::new();
        let mut total_quantity: u128 = 0;
        let mut total_satoshis: u64 = 0;

        for utxo in candidates {
            match &utxo.token {
                Some(t) if t.token_id == *token_id && !t.is_minting_baton => {
                    total_quantity += u128::from(t.quantity);
                }
                _ => return Err(WalletError::UnspendableInput(utxo.outpoint)),
            }
            total_satoshis = total_satoshis.saturating_add(utxo.satoshis);
            selected.push(utxo.clone());

            if total_quantity >= u128::from(target) {
                debug!(inputs = selected.len(), total_quantity, target, "token selection satisfied");
                return Ok(TokenSelection {
                    selected,
                    total_quantity,
                    total_satoshis,
                });
            }
        }

        Err(WalletError::InsufficientTokens {
            have: total_quantity,
            need: u128::from(target),
        })
    }
}

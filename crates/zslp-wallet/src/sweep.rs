//! Paper-wallet sweep engine.
//!
//! Drains a one-off key into the wallet. Which transaction is built depends
//! on what the paper key holds:
//!
//! - [`SweepState::NativeOnly`]: spend every native UTXO into one output
//! - [`SweepState::TokenWithNative`]: send the whole token balance and all
//!   native coin together, the paper wallet paying its own fee
//! - [`SweepState::TokenWalletFunded`]: the paper wallet has tokens but no
//!   coin, so the caller's own UTXOs pay the fee

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use zslp_core::amount::to_display_amount;
use zslp_core::keys::SigningKey;
use zslp_core::slp::encode_send_payload;
use zslp_core::traits::{AddressFormat, UtxoSource};
use zslp_core::types::{Hash256, Utxo};

use crate::coin_selection::CoinSelector;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::fee::FeeEstimator;
use crate::plan::{BuildPlan, PlannedInput, PlannedOutput};

/// A paper wallet's UTXOs, split into native coin and per-token groups.
#[derive(Debug, Clone, Default)]
pub struct PaperUtxos {
    pub native: Vec<Utxo>,
    pub tokens: BTreeMap<Hash256, Vec<Utxo>>,
}

impl PaperUtxos {
    /// Group a flat UTXO list. Minting batons are left out so a sweep can
    /// never burn one.
    pub fn group(utxos: Vec<Utxo>) -> Self {
        let mut grouped = Self::default();
        for utxo in utxos {
            match &utxo.token {
                None => grouped.native.push(utxo),
                Some(t) if t.is_minting_baton => {
                    warn!(outpoint = %utxo.outpoint, "skipping minting baton in paper wallet");
                }
                Some(t) => grouped.tokens.entry(t.token_id).or_default().push(utxo),
            }
        }
        grouped
    }

    /// Fetch and group the UTXOs of `address`.
    pub async fn fetch<S>(source: &S, address: &str) -> Result<Self, WalletError>
    where
        S: UtxoSource + ?Sized,
    {
        let utxos = source
            .utxos(address)
            .await
            .map_err(|e| WalletError::Source(e.to_string()))?;
        Ok(Self::group(utxos))
    }

    pub fn has_native(&self) -> bool {
        !self.native.is_empty()
    }

    /// Native satoshis and per-token base-unit totals.
    pub fn balances(&self) -> PaperBalances {
        let native_satoshis = self
            .native
            .iter()
            .map(|u| u.satoshis)
            .fold(0u64, u64::saturating_add);
        let tokens = self
            .tokens
            .iter()
            .map(|(id, utxos)| {
                let total: u128 = utxos.iter().map(|u| u128::from(u.token_quantity())).sum();
                (*id, total)
            })
            .collect();
        PaperBalances {
            native_satoshis,
            tokens,
        }
    }
}

/// Balances held by a paper wallet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PaperBalances {
    pub native_satoshis: u64,
    /// Base units per token id.
    pub tokens: BTreeMap<Hash256, u128>,
}

impl PaperBalances {
    /// Token balance in display units.
    pub fn token_display(&self, token_id: &Hash256, decimals: u8) -> Result<Decimal, WalletError> {
        let base = self.tokens.get(token_id).copied().unwrap_or(0);
        let base = u64::try_from(base)
            .map_err(|_| WalletError::InvalidAmount("token balance exceeds 64 bits".into()))?;
        Ok(to_display_amount(base, decimals)?)
    }
}

/// Which sweep transaction applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    NativeOnly,
    TokenWithNative,
    TokenWalletFunded,
}

/// Everything needed to sweep a paper wallet.
#[derive(Debug, Clone)]
pub struct SweepRequest {
    /// Paper wallet private key (compressed WIF).
    pub wif: String,
    pub paper: PaperUtxos,
    /// Caller's address receiving coin and native change.
    pub native_destination: String,
    /// Caller's address receiving tokens.
    pub token_destination: String,
    pub token_id: Option<Hash256>,
    pub token_decimals: Option<u8>,
    /// Caller's own UTXOs, each with its signing key; fee source for
    /// [`SweepState::TokenWalletFunded`].
    pub own_utxos: Vec<Utxo>,
}

impl SweepRequest {
    /// Validate inputs and pick the branch. Fails before any selection work.
    pub fn state(&self) -> Result<SweepState, WalletError> {
        if self.wif.trim().is_empty() {
            return Err(WalletError::InvalidSweepParams("a WIF must be specified".into()));
        }
        if self.native_destination.is_empty() {
            return Err(WalletError::InvalidSweepParams(
                "address to receive swept coin must be included".into(),
            ));
        }
        if self.token_destination.is_empty() {
            return Err(WalletError::InvalidSweepParams(
                "address to receive swept tokens must be included".into(),
            ));
        }
        if self.token_id.is_some() && self.token_decimals.is_none() {
            return Err(WalletError::MissingDecimals);
        }

        match (self.paper.has_native(), self.token_id.is_some()) {
            (true, false) => Ok(SweepState::NativeOnly),
            (true, true) => Ok(SweepState::TokenWithNative),
            (false, true) => Ok(SweepState::TokenWalletFunded),
            (false, false) => Err(WalletError::InvalidSweepParams(
                "paper wallet holds nothing to sweep".into(),
            )),
        }
    }
}

/// Plans paper-wallet sweeps.
pub struct Sweeper<'a> {
    config: &'a WalletConfig,
    addresses: &'a dyn AddressFormat,
}

impl<'a> Sweeper<'a> {
    pub fn new(config: &'a WalletConfig, addresses: &'a dyn AddressFormat) -> Self {
        Self { config, addresses }
    }

    pub fn build(&self, request: &SweepRequest) -> Result<BuildPlan, WalletError> {
        let state = request.state()?;
        let paper_key = SigningKey::from_wif(&request.wif)?;
        info!(?state, paper_key = %paper_key.fingerprint(), "sweeping paper wallet");

        match state {
            SweepState::NativeOnly => self.native_only(request, paper_key),
            SweepState::TokenWithNative => self.token_with_native(request, paper_key),
            SweepState::TokenWalletFunded => self.token_wallet_funded(request, paper_key),
        }
    }

    fn native_only(&self, request: &SweepRequest, key: SigningKey) -> Result<BuildPlan, WalletError> {
        let utxos = &request.paper.native;
        let total = request.paper.balances().native_satoshis;
        let fee = FeeEstimator::new(self.config).sweep_fee(utxos.len());

        let need = fee.saturating_add(self.config.dust_limit);
        if total < need {
            return Err(WalletError::FeeShortfall { have: total, need });
        }
        let destination = self.addresses.to_legacy(&request.native_destination)?;

        let plan = BuildPlan {
            inputs: utxos
                .iter()
                .map(|u| PlannedInput::with_key(u, key.clone()))
                .collect(),
            outputs: vec![PlannedOutput::to_address(destination, total - fee)],
            fee,
            change: 0,
        };
        debug!(inputs = plan.inputs.len(), fee, swept = total - fee, "planned native sweep");
        Ok(plan)
    }

    fn token_with_native(&self, request: &SweepRequest, key: SigningKey) -> Result<BuildPlan, WalletError> {
        let (token_id, token_utxos, quantity) = self.token_group(request)?;
        let payload = encode_send_payload(&token_id, &[quantity])?;

        let inputs: Vec<PlannedInput> = token_utxos
            .iter()
            .chain(request.paper.native.iter())
            .map(|u| PlannedInput::with_key(u, key.clone()))
            .collect();

        let cost = FeeEstimator::new(self.config).token_send_cost(payload.len(), inputs.len(), 2);
        let total = inputs.iter().map(|i| i.satoshis).fold(0u64, u64::saturating_add);
        self.finish_token_sweep(request, payload, inputs, total, cost)
    }

    fn token_wallet_funded(&self, request: &SweepRequest, key: SigningKey) -> Result<BuildPlan, WalletError> {
        let (token_id, token_utxos, quantity) = self.token_group(request)?;
        let payload = encode_send_payload(&token_id, &[quantity])?;

        let fee_candidates: Vec<Utxo> = request
            .own_utxos
            .iter()
            .filter(|u| u.spendable)
            .cloned()
            .collect();

        let fees = FeeEstimator::new(self.config);
        let paper_inputs = token_utxos.len();
        let own = CoinSelector::select(&fee_candidates, 0, |n| {
            fees.token_send_cost(payload.len(), paper_inputs + n, 2)
        })?;

        // Paper inputs first: signature indices follow input order.
        let mut inputs: Vec<PlannedInput> = token_utxos
            .iter()
            .map(|u| PlannedInput::with_key(u, key.clone()))
            .collect();
        for utxo in &own.selected {
            inputs.push(PlannedInput::from_utxo(utxo)?);
        }

        let total = inputs.iter().map(|i| i.satoshis).fold(0u64, u64::saturating_add);
        self.finish_token_sweep(request, payload, inputs, total, own.fee)
    }

    fn token_group<'r>(&self, request: &'r SweepRequest) -> Result<(Hash256, &'r [Utxo], u64), WalletError> {
        let token_id = request
            .token_id
            .ok_or_else(|| WalletError::InvalidSweepParams("token id required".into()))?;
        let decimals = request.token_decimals.ok_or(WalletError::MissingDecimals)?;

        let utxos = request
            .paper
            .tokens
            .get(&token_id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let balances = request.paper.balances();
        let total = balances.tokens.get(&token_id).copied().unwrap_or(0);
        if utxos.is_empty() || total == 0 {
            return Err(WalletError::InsufficientTokens { have: 0, need: 1 });
        }
        let quantity = u64::try_from(total)
            .map_err(|_| WalletError::InvalidAmount("token balance exceeds 64 bits".into()))?;

        debug!(
            %token_id,
            amount = %balances.token_display(&token_id, decimals)?,
            utxos = utxos.len(),
            "sweeping token balance"
        );
        Ok((token_id, utxos, quantity))
    }

    fn finish_token_sweep(
        &self,
        request: &SweepRequest,
        payload: Vec<u8>,
        inputs: Vec<PlannedInput>,
        total: u64,
        cost: u64,
    ) -> Result<BuildPlan, WalletError> {
        if total < cost {
            return Err(WalletError::FeeShortfall { have: total, need: cost });
        }
        let dust = self.config.dust_limit;
        let remaining = total - cost;
        let native_change = remaining + dust;

        let outputs = vec![
            PlannedOutput::op_return(payload),
            PlannedOutput::to_address(self.addresses.to_token(&request.token_destination)?, dust),
            PlannedOutput::to_address(self.addresses.to_legacy(&request.native_destination)?, native_change),
        ];
        let fee = cost - 2 * dust;
        debug!(inputs = inputs.len(), fee, native_change, "planned token sweep");

        Ok(BuildPlan {
            inputs,
            outputs,
            fee,
            change: native_change,
        })
    }
}

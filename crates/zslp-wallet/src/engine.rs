//! Wallet engine facade.
//!
//! Wires the builders to the assembly and broadcast ports. Every operation
//! runs under the per-address [`BuildGate`], so UTXO selection, signing and
//! publishing for one address never interleave.

use tracing::{info, instrument, warn};
use zslp_core::traits::{AddressFormat, Broadcaster, TransactionAssembler};
use zslp_core::types::{Hash256, SendRequest, TokenMetadata, Utxo};

use crate::broadcast::publish;
use crate::builder::NativeSendBuilder;
use crate::cache::MetadataCache;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::gate::BuildGate;
use crate::plan::BuildPlan;
use crate::sweep::{SweepRequest, Sweeper};
use crate::token::TokenSendBuilder;

/// Outcome of a published transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sent {
    pub txid: Hash256,
    /// Miner fee paid, in satoshis.
    pub fee: u64,
    /// Native change returned to the wallet, in satoshis.
    pub change: u64,
}

pub struct Engine<B, F> {
    config: WalletConfig,
    broadcaster: B,
    addresses: F,
    gate: BuildGate,
    metadata: MetadataCache,
}

impl<B, F> Engine<B, F>
where
    B: Broadcaster,
    F: AddressFormat,
{
    pub fn new(config: WalletConfig, broadcaster: B, addresses: F) -> Result<Self, WalletError> {
        config.validate()?;
        Ok(Self {
            config,
            broadcaster,
            addresses,
            gate: BuildGate::new(),
            metadata: MetadataCache::new(),
        })
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn metadata(&self) -> &MetadataCache {
        &self.metadata
    }

    pub fn gate(&self) -> &BuildGate {
        &self.gate
    }

    /// Send native coin, optionally with an `OP_RETURN` payload.
    ///
    /// `new_assembler` is called once, after the plan is built; a failed
    /// attempt leaves nothing behind for a retry to inherit.
    #[instrument(skip_all, fields(from = %request.from, to = %request.to))]
    pub async fn send_native<A, M>(
        &self,
        request: &SendRequest,
        candidates: &[Utxo],
        new_assembler: M,
    ) -> Result<Sent, WalletError>
    where
        A: TransactionAssembler,
        M: FnOnce() -> A,
    {
        self.gated(&request.from, new_assembler, || {
            NativeSendBuilder::new(&self.config).build(request, candidates)
        })
        .await
    }

    /// Send tokens. Token change goes to `token_change_address`.
    #[instrument(skip_all, fields(from = %request.from, to = %request.to, token = %metadata.token_id))]
    pub async fn send_token<A, M>(
        &self,
        request: &SendRequest,
        metadata: &TokenMetadata,
        token_candidates: &[Utxo],
        fee_candidates: &[Utxo],
        token_change_address: &str,
        new_assembler: M,
    ) -> Result<Sent, WalletError>
    where
        A: TransactionAssembler,
        M: FnOnce() -> A,
    {
        self.gated(&request.from, new_assembler, || {
            TokenSendBuilder::new(&self.config).build(
                request,
                metadata,
                token_candidates,
                fee_candidates,
                token_change_address,
            )
        })
        .await
    }

    /// Sweep a paper wallet into the caller's addresses.
    #[instrument(skip_all, fields(to = %request.native_destination))]
    pub async fn sweep<A, M>(&self, request: &SweepRequest, new_assembler: M) -> Result<Sent, WalletError>
    where
        A: TransactionAssembler,
        M: FnOnce() -> A,
    {
        self.gated(&request.native_destination, new_assembler, || {
            Sweeper::new(&self.config, &self.addresses).build(request)
        })
        .await
    }

    /// Plan, sign and publish while holding the permit for `address`.
    /// Idle gate entries are pruned once the permit is released.
    async fn gated<A, M, P>(&self, address: &str, new_assembler: M, plan: P) -> Result<Sent, WalletError>
    where
        A: TransactionAssembler,
        M: FnOnce() -> A,
        P: FnOnce() -> Result<BuildPlan, WalletError>,
    {
        let permit = self.gate.acquire(address).await;
        let result = match plan() {
            Ok(plan) => self.sign_and_publish(plan, new_assembler).await,
            Err(e) => Err(e),
        };
        drop(permit);
        self.gate.prune();
        result
    }

    async fn sign_and_publish<A, M>(&self, plan: BuildPlan, new_assembler: M) -> Result<Sent, WalletError>
    where
        A: TransactionAssembler,
        M: FnOnce() -> A,
    {
        let raw = {
            let mut assembler = new_assembler();
            plan.sign(&mut assembler)?
        };
        match publish(&self.broadcaster, &raw).await {
            Ok(txid) => {
                info!(%txid, fee = plan.fee, change = plan.change, "transaction published");
                Ok(Sent {
                    txid,
                    fee: plan.fee,
                    change: plan.change,
                })
            }
            Err(e) => {
                warn!(error = %e, "transaction not published");
                Err(e)
            }
        }
    }
}

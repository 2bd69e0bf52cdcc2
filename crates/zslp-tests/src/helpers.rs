//! Shared fixtures for scenario tests.

use std::sync::{Arc, Once};

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use zslp_core::error::PortError;
use zslp_core::keys::SigningKey;
use zslp_core::slp::{encode_genesis_payload, GenesisParams};
use zslp_core::traits::{Broadcaster, SigHashType, TransactionAssembler};
use zslp_core::types::{Hash256, OutPoint, OutputTarget, TokenAssociation, Utxo};

/// Compressed WIF used as the paper wallet in sweep scenarios.
pub const PAPER_WIF: &str = "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617";

pub const TOKEN_ID: Hash256 = Hash256([0x5a; 32]);

static TRACING: Once = Once::new();

/// Route engine logs to the test harness. Filter with `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Key owned by the wallet under test, distinct from the paper key.
pub fn wallet_key(seed: u8) -> SigningKey {
    SigningKey::from_secret_bytes([seed.max(1); 32])
}

pub fn paper_key() -> SigningKey {
    SigningKey::from_wif(PAPER_WIF).unwrap()
}

/// Spendable native UTXO at `zs1wallet`, signed by `wallet_key(seed)`.
pub fn native(seed: u8, satoshis: u64) -> Utxo {
    Utxo {
        outpoint: OutPoint {
            txid: Hash256([seed; 32]),
            index: 0,
        },
        satoshis,
        address: "zs1wallet".into(),
        spendable: true,
        signing_key: Some(wallet_key(seed)),
        token: None,
    }
}

/// Dust-valued token UTXO at `zs1wallet`.
pub fn token(seed: u8, token_id: Hash256, quantity: u64) -> Utxo {
    Utxo {
        outpoint: OutPoint {
            txid: Hash256([seed; 32]),
            index: 1,
        },
        satoshis: 546,
        address: "zs1wallet".into(),
        spendable: false,
        signing_key: Some(wallet_key(seed)),
        token: Some(TokenAssociation {
            token_id,
            quantity,
            is_minting_baton: false,
        }),
    }
}

/// Token UTXO held by the paper wallet; carries no key of its own.
pub fn paper_token(seed: u8, token_id: Hash256, quantity: u64) -> Utxo {
    let mut utxo = token(seed, token_id, quantity);
    utxo.address = "zs1paper".into();
    utxo.signing_key = None;
    utxo
}

/// Native UTXO held by the paper wallet.
pub fn paper_native(seed: u8, satoshis: u64) -> Utxo {
    let mut utxo = native(seed, satoshis);
    utxo.address = "zs1paper".into();
    utxo.signing_key = None;
    utxo
}

pub fn genesis_script(symbol: &str, decimals: u8) -> Vec<u8> {
    encode_genesis_payload(&GenesisParams {
        symbol: symbol.into(),
        name: format!("{symbol} Token"),
        document_url: "https://example.org".into(),
        document_hash: None,
        decimals,
        baton_vout: Some(2),
        initial_quantity: 1_000_000,
    })
}

/// One call into a port, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    AddInput(OutPoint),
    AddOutput(OutputTarget, u64),
    Sign {
        index: usize,
        key: SigningKey,
        sighash: SigHashType,
        satoshis: u64,
    },
    Build,
    Publish(String),
}

/// Shared, ordered record of port calls.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<PortCall>>>);

impl CallLog {
    pub fn push(&self, call: PortCall) {
        self.0.lock().push(call);
    }

    pub fn calls(&self) -> Vec<PortCall> {
        self.0.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }

    pub fn signatures(&self) -> Vec<(usize, SigningKey)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PortCall::Sign { index, key, .. } => Some((index, key)),
                _ => None,
            })
            .collect()
    }

    pub fn outputs(&self) -> Vec<(OutputTarget, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                PortCall::AddOutput(target, sats) => Some((target, sats)),
                _ => None,
            })
            .collect()
    }

    pub fn publish_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, PortCall::Publish(_)))
            .count()
    }
}

/// Assembler that logs each call and serializes to a digest of the log.
pub struct RecordingAssembler {
    log: CallLog,
    inputs: usize,
}

impl RecordingAssembler {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            inputs: 0,
        }
    }
}

impl TransactionAssembler for RecordingAssembler {
    fn add_input(&mut self, outpoint: &OutPoint) {
        self.inputs += 1;
        self.log.push(PortCall::AddInput(*outpoint));
    }

    fn add_output(&mut self, target: &OutputTarget, satoshis: u64) -> Result<(), PortError> {
        self.log.push(PortCall::AddOutput(target.clone(), satoshis));
        Ok(())
    }

    fn sign(
        &mut self,
        input_index: usize,
        key: &SigningKey,
        sighash: SigHashType,
        input_satoshis: u64,
    ) -> Result<(), PortError> {
        if input_index >= self.inputs {
            return Err(PortError::Assembly(format!("input {input_index} out of range")));
        }
        self.log.push(PortCall::Sign {
            index: input_index,
            key: key.clone(),
            sighash,
            satoshis: input_satoshis,
        });
        Ok(())
    }

    fn build(&mut self) -> Result<Vec<u8>, PortError> {
        self.log.push(PortCall::Build);
        let digest = Sha256::digest(format!("{:?}", self.log.calls()).as_bytes());
        Ok(digest.to_vec())
    }
}

/// Broadcaster that logs each publish and answers with the double-SHA256
/// txid, or with a fixed rejection.
pub struct RecordingBroadcaster {
    log: CallLog,
    rejection: Option<String>,
}

impl RecordingBroadcaster {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            rejection: None,
        }
    }

    pub fn rejecting(log: &CallLog, response: &str) -> Self {
        Self {
            log: log.clone(),
            rejection: Some(response.to_string()),
        }
    }
}

pub fn txid_of(raw: &[u8]) -> Hash256 {
    let digest = Sha256::digest(Sha256::digest(raw));
    Hash256::from_slice(&digest).unwrap()
}

#[async_trait]
impl Broadcaster for RecordingBroadcaster {
    async fn publish(&self, raw_hex: &str) -> Result<String, PortError> {
        self.log.push(PortCall::Publish(raw_hex.to_string()));
        if let Some(response) = &self.rejection {
            return Ok(response.clone());
        }
        let raw = hex::decode(raw_hex).map_err(|e| PortError::Transport(e.to_string()))?;
        Ok(txid_of(&raw).to_hex())
    }
}

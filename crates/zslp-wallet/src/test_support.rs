//! In-memory fixtures shared by unit tests.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use zslp_core::error::PortError;
use zslp_core::keys::SigningKey;
use zslp_core::traits::{Broadcaster, SigHashType, TransactionAssembler, UtxoSource};
use zslp_core::types::{Hash256, OutPoint, OutputTarget, TokenAssociation, Utxo};

/// Compressed WIF of a well-known test key.
pub const PAPER_WIF: &str = "KwdMAjGmerYanjeui5SHS7JkmpZvVipYvB2LJGU1ZxJwYvP98617";

pub fn paper_wif() -> String {
    PAPER_WIF.to_string()
}

/// Spendable native UTXO owned by the wallet, keyed by `seed`.
pub fn native_utxo(seed: u8, satoshis: u64) -> Utxo {
    Utxo {
        outpoint: OutPoint {
            txid: Hash256([seed; 32]),
            index: 0,
        },
        satoshis,
        address: "zs1from".into(),
        spendable: true,
        signing_key: Some(SigningKey::from_secret_bytes([seed.max(1); 32])),
        token: None,
    }
}

/// Dust-valued token UTXO owned by the wallet.
pub fn token_utxo(seed: u8, token_id: Hash256, quantity: u64) -> Utxo {
    Utxo {
        outpoint: OutPoint {
            txid: Hash256([seed; 32]),
            index: 1,
        },
        satoshis: 546,
        address: "zs1from".into(),
        spendable: false,
        signing_key: Some(SigningKey::from_secret_bytes([seed.max(1); 32])),
        token: Some(TokenAssociation {
            token_id,
            quantity,
            is_minting_baton: false,
        }),
    }
}

/// Native UTXO of a paper wallet: no key attached.
pub fn paper_utxo(seed: u8, satoshis: u64) -> Utxo {
    Utxo {
        outpoint: OutPoint {
            txid: Hash256([seed; 32]),
            index: 2,
        },
        satoshis,
        address: "zs1paper".into(),
        spendable: true,
        signing_key: None,
        token: None,
    }
}

/// Records every call; `build` returns the double-SHA256 of the call log.
#[derive(Default)]
pub struct FakeAssembler {
    pub inputs: Vec<OutPoint>,
    pub outputs: Vec<(OutputTarget, u64)>,
    pub signatures: Vec<(usize, SigningKey, SigHashType, u64)>,
    pub reject_outputs: bool,
}

impl TransactionAssembler for FakeAssembler {
    fn add_input(&mut self, outpoint: &OutPoint) {
        self.inputs.push(*outpoint);
    }

    fn add_output(&mut self, target: &OutputTarget, satoshis: u64) -> Result<(), PortError> {
        if self.reject_outputs {
            return Err(PortError::Assembly("output rejected".into()));
        }
        self.outputs.push((target.clone(), satoshis));
        Ok(())
    }

    fn sign(
        &mut self,
        input_index: usize,
        key: &SigningKey,
        sighash: SigHashType,
        input_satoshis: u64,
    ) -> Result<(), PortError> {
        if input_index >= self.inputs.len() {
            return Err(PortError::Assembly(format!("no input {input_index}")));
        }
        self.signatures
            .push((input_index, key.clone(), sighash, input_satoshis));
        Ok(())
    }

    fn build(&mut self) -> Result<Vec<u8>, PortError> {
        let mut hasher = Sha256::new();
        for input in &self.inputs {
            hasher.update(input.txid.as_bytes());
            hasher.update(input.index.to_le_bytes());
        }
        for (_, satoshis) in &self.outputs {
            hasher.update(satoshis.to_le_bytes());
        }
        Ok(hasher.finalize().to_vec())
    }
}

/// Clonable handle to a [`FakeAssembler`], readable after the engine
/// has consumed the assembler it was given.
#[derive(Clone, Default)]
pub struct SharedAssembler(Arc<Mutex<FakeAssembler>>);

impl SharedAssembler {
    /// New handle recorded in `made`, one per build attempt.
    pub fn tracked(made: &Mutex<Vec<SharedAssembler>>) -> Self {
        let assembler = Self::default();
        made.lock().push(assembler.clone());
        assembler
    }

    pub fn inputs(&self) -> Vec<OutPoint> {
        self.0.lock().inputs.clone()
    }

    pub fn outputs(&self) -> Vec<(OutputTarget, u64)> {
        self.0.lock().outputs.clone()
    }

    pub fn signatures(&self) -> Vec<(usize, SigningKey, SigHashType, u64)> {
        self.0.lock().signatures.clone()
    }

    pub fn signed_indices(&self) -> Vec<usize> {
        self.0.lock().signatures.iter().map(|s| s.0).collect()
    }
}

impl TransactionAssembler for SharedAssembler {
    fn add_input(&mut self, outpoint: &OutPoint) {
        self.0.lock().add_input(outpoint);
    }

    fn add_output(&mut self, target: &OutputTarget, satoshis: u64) -> Result<(), PortError> {
        self.0.lock().add_output(target, satoshis)
    }

    fn sign(
        &mut self,
        input_index: usize,
        key: &SigningKey,
        sighash: SigHashType,
        input_satoshis: u64,
    ) -> Result<(), PortError> {
        self.0.lock().sign(input_index, key, sighash, input_satoshis)
    }

    fn build(&mut self) -> Result<Vec<u8>, PortError> {
        self.0.lock().build()
    }
}

enum Reply {
    Txid,
    Text(String),
    Fail(String),
}

/// Broadcaster that records published hex and answers from a script.
pub struct FakeBroadcaster {
    reply: Reply,
    published: Mutex<Vec<String>>,
}

impl Default for FakeBroadcaster {
    fn default() -> Self {
        Self {
            reply: Reply::Txid,
            published: Mutex::new(Vec::new()),
        }
    }
}

impl FakeBroadcaster {
    pub fn responding(text: &str) -> Self {
        Self {
            reply: Reply::Text(text.to_string()),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Reply::Fail(message.to_string()),
            ..Self::default()
        }
    }

    pub fn published(&self) -> Vec<String> {
        self.published.lock().clone()
    }

    pub fn txid_of(raw: &[u8]) -> Hash256 {
        let digest = Sha256::digest(Sha256::digest(raw));
        Hash256::from_slice(&digest).unwrap()
    }
}

#[async_trait]
impl Broadcaster for FakeBroadcaster {
    async fn publish(&self, raw_hex: &str) -> Result<String, PortError> {
        self.published.lock().push(raw_hex.to_string());
        match &self.reply {
            Reply::Txid => {
                let raw = hex::decode(raw_hex).map_err(|e| PortError::Transport(e.to_string()))?;
                Ok(Self::txid_of(&raw).to_hex())
            }
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(message) => Err(PortError::Transport(message.clone())),
        }
    }
}

/// Returns the same UTXO list for every address.
pub struct FakeUtxoSource(Vec<Utxo>);

impl FakeUtxoSource {
    pub fn with(utxos: Vec<Utxo>) -> Self {
        Self(utxos)
    }
}

#[async_trait]
impl UtxoSource for FakeUtxoSource {
    async fn utxos(&self, _address: &str) -> Result<Vec<Utxo>, PortError> {
        Ok(self.0.clone())
    }
}

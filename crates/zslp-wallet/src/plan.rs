//! Build plans and the signing pass.
//!
//! A [`BuildPlan`] is the fully decided transaction: ordered inputs with the
//! key that signs each one, ordered outputs, and the fee. Builders produce
//! plans; [`BuildPlan::sign`] replays a plan into a [`TransactionAssembler`].

use tracing::debug;
use zslp_core::keys::SigningKey;
use zslp_core::traits::{TransactionAssembler, SIGHASH_ALL};
use zslp_core::types::{OutPoint, OutputTarget, Utxo};

use crate::error::WalletError;

/// An input and the key that signs it.
#[derive(Debug, Clone)]
pub struct PlannedInput {
    pub outpoint: OutPoint,
    /// Satoshis spent; committed to by the signature.
    pub satoshis: u64,
    pub key: SigningKey,
}

impl PlannedInput {
    /// Use the UTXO's own signing key.
    pub fn from_utxo(utxo: &Utxo) -> Result<Self, WalletError> {
        let key = utxo
            .signing_key
            .clone()
            .ok_or(WalletError::KeyNotFound(utxo.outpoint))?;
        Ok(Self::with_key(utxo, key))
    }

    /// Sign the UTXO with an explicitly supplied key.
    pub fn with_key(utxo: &Utxo, key: SigningKey) -> Self {
        Self {
            outpoint: utxo.outpoint,
            satoshis: utxo.satoshis,
            key,
        }
    }
}

/// A transaction output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOutput {
    pub target: OutputTarget,
    pub satoshis: u64,
}

impl PlannedOutput {
    pub fn to_address(address: impl Into<String>, satoshis: u64) -> Self {
        Self {
            target: OutputTarget::Address(address.into()),
            satoshis,
        }
    }

    /// Zero-value data output.
    pub fn op_return(script: Vec<u8>) -> Self {
        Self {
            target: OutputTarget::Script(script),
            satoshis: 0,
        }
    }
}

/// A decided, unsigned transaction.
#[derive(Debug, Clone)]
pub struct BuildPlan {
    pub inputs: Vec<PlannedInput>,
    pub outputs: Vec<PlannedOutput>,
    /// Fee the plan was costed with, in satoshis.
    pub fee: u64,
    /// Native change returned to the sender (zero if none was emitted).
    pub change: u64,
}

impl BuildPlan {
    pub fn input_total(&self) -> u64 {
        self.inputs.iter().map(|i| i.satoshis).fold(0u64, u64::saturating_add)
    }

    pub fn output_total(&self) -> u64 {
        self.outputs.iter().map(|o| o.satoshis).fold(0u64, u64::saturating_add)
    }

    /// Check that outputs plus fee never exceed inputs.
    pub fn check_balance(&self) -> Result<(), WalletError> {
        let need = self.output_total().saturating_add(self.fee);
        let have = self.input_total();
        if need > have {
            return Err(WalletError::FeeShortfall { have, need });
        }
        Ok(())
    }

    /// Feed the plan into `assembler`, sign every input with `SIGHASH_ALL`
    /// in input order, and return the serialized transaction.
    pub fn sign<A>(&self, assembler: &mut A) -> Result<Vec<u8>, WalletError>
    where
        A: TransactionAssembler + ?Sized,
    {
        self.check_balance()?;

        for input in &self.inputs {
            assembler.add_input(&input.outpoint);
        }
        for output in &self.outputs {
            assembler
                .add_output(&output.target, output.satoshis)
                .map_err(|e| WalletError::Assembly(e.to_string()))?;
        }
        for (index, input) in self.inputs.iter().enumerate() {
            assembler
                .sign(index, &input.key, SIGHASH_ALL, input.satoshis)
                .map_err(|e| WalletError::Assembly(e.to_string()))?;
        }

        let raw = assembler
            .build()
            .map_err(|e| WalletError::Assembly(e.to_string()))?;
        debug!(
            inputs = self.inputs.len(),
            outputs = self.outputs.len(),
            fee = self.fee,
            bytes = raw.len(),
            "signed transaction"
        );
        Ok(raw)
    }
}

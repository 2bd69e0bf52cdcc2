//! Port traits for the wallet engine's external collaborators.
//!
//! - [`TransactionAssembler`]: serialization and ECDSA signing library
//! - [`Broadcaster`]: publishes raw transactions to the network
//! - [`AddressFormat`]: converts between legacy and token-layer address encodings
//! - [`UtxoSource`]: supplies fresh UTXO snapshots
//!
//! The engine only ever talks to these traits, so tests run against
//! in-memory fakes.

use async_trait::async_trait;

use crate::error::{AddressError, PortError};
use crate::keys::SigningKey;
use crate::types::{OutPoint, OutputTarget, Utxo};

/// Signature hash mode committed to by an input signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigHashType {
    /// Commit to all inputs and outputs (with the fork-id bit set).
    All,
}

impl SigHashType {
    /// Byte appended to the DER signature.
    pub fn as_byte(self) -> u8 {
        match self {
            Self::All => 0x41,
        }
    }
}

/// Shorthand for [`SigHashType::All`].
pub const SIGHASH_ALL: SigHashType = SigHashType::All;

/// Incremental transaction assembly and signing.
///
/// One assembler instance builds exactly one transaction. Inputs and outputs
/// are appended in call order; `sign` must be called once per input after all
/// outputs are in place.
pub trait TransactionAssembler: Send {
    /// Append an input spending `outpoint`.
    fn add_input(&mut self, outpoint: &OutPoint);

    /// Append an output paying `satoshis` to `target`.
    fn add_output(&mut self, target: &OutputTarget, satoshis: u64) -> Result<(), PortError>;

    /// Sign input `input_index`, which spends `input_satoshis`.
    fn sign(
        &mut self,
        input_index: usize,
        key: &SigningKey,
        sighash: SigHashType,
        input_satoshis: u64,
    ) -> Result<(), PortError>;

    /// Serialize the signed transaction.
    fn build(&mut self) -> Result<Vec<u8>, PortError>;
}

/// Publishes a raw transaction.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    /// Submit hex-encoded transaction bytes; returns the node's raw response,
    /// which is the transaction id on success.
    async fn publish(&self, raw_hex: &str) -> Result<String, PortError>;
}

/// Conversion between the wallet's two address encodings.
pub trait AddressFormat: Send + Sync {
    /// Legacy / cash-style encoding.
    fn to_legacy(&self, address: &str) -> Result<String, AddressError>;

    /// Token-layer encoding.
    fn to_token(&self, address: &str) -> Result<String, AddressError>;

    /// True if both strings name the same address in any encoding.
    fn same_address(&self, a: &str, b: &str) -> bool {
        match (self.to_legacy(a), self.to_legacy(b)) {
            (Ok(x), Ok(y)) => x == y,
            _ => false,
        }
    }
}

/// Address format that treats every non-empty string as already canonical.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughAddresses;

impl AddressFormat for PassthroughAddresses {
    fn to_legacy(&self, address: &str) -> Result<String, AddressError> {
        if address.is_empty() {
            return Err(AddressError::Empty);
        }
        Ok(address.to_string())
    }

    fn to_token(&self, address: &str) -> Result<String, AddressError> {
        self.to_legacy(address)
    }
}

/// Source of current UTXO snapshots.
#[async_trait]
pub trait UtxoSource: Send + Sync {
    /// All unspent outputs of `address`, with token associations resolved.
    async fn utxos(&self, address: &str) -> Result<Vec<Utxo>, PortError>;
}

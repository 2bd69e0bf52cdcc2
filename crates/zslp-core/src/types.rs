//! Core wallet types: hashes, outpoints, UTXOs, token metadata, requests.
//!
//! Native values are in satoshis. Token quantities are base units, i.e. the
//! display amount scaled by `10^decimals`; conversion happens in [`crate::amount`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::keys::SigningKey;

/// A 32-byte hash in display (big-endian hex) byte order.
///
/// Used for transaction ids and token ids. A token id is the id of the
/// token's genesis transaction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Return the underlying bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        if s.len() != 64 {
            return None;
        }
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Build from a slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// Lowercase hex encoding.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Hash256 {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("not a 64-character hex hash: {s}"))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Reference to a specific output of a previous transaction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutPoint {
    /// Transaction containing the referenced output.
    pub txid: Hash256,
    /// Output index (`vout`).
    pub index: u32,
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// Token-layer data attached to a UTXO.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenAssociation {
    pub token_id: Hash256,
    /// Quantity in base units.
    pub quantity: u64,
    pub is_minting_baton: bool,
}

/// An unspent output as supplied by the UTXO source.
///
/// Immutable once fetched. Callers must take a fresh snapshot before every
/// build so that outputs spent by an earlier broadcast are never reused.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Utxo {
    pub outpoint: OutPoint,
    /// Native value in satoshis.
    pub satoshis: u64,
    /// Address that owns this output.
    pub address: String,
    /// False for outputs that must not fund native payments (token-bearing or locked).
    pub spendable: bool,
    /// Key able to sign for `address`. Paper-wallet UTXOs arrive without one.
    #[serde(skip)]
    pub signing_key: Option<SigningKey>,
    pub token: Option<TokenAssociation>,
}

impl Utxo {
    /// Attach the key that signs for this output.
    pub fn with_key(mut self, key: SigningKey) -> Self {
        self.signing_key = Some(key);
        self
    }

    /// True if this output carries a token quantity or baton.
    pub fn is_token(&self) -> bool {
        self.token.is_some()
    }

    /// Token quantity in base units, zero for native-only outputs.
    pub fn token_quantity(&self) -> u64 {
        self.token.as_ref().map_or(0, |t| t.quantity)
    }
}

/// Token protocol tag recorded with metadata.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenProtocol {
    #[default]
    Slp,
}

/// Metadata decoded once from a token's genesis transaction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    /// Id of the genesis transaction.
    pub token_id: Hash256,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub protocol: TokenProtocol,
}

/// Token parameters of a token-denominated [`SendRequest`].
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenContext {
    pub token_id: Hash256,
    pub decimals: u8,
}

/// A payment request from the UI layer.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SendRequest {
    /// Address receiving native change.
    pub from: String,
    pub to: String,
    /// Satoshis for native sends, display units for token sends.
    pub amount: Decimal,
    /// Data chunks for an extra `OP_RETURN` output (native sends only).
    pub op_return: Option<Vec<Vec<u8>>>,
    pub token: Option<TokenContext>,
}

impl SendRequest {
    /// A native-coin payment of `satoshis`.
    pub fn native(from: impl Into<String>, to: impl Into<String>, satoshis: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount: Decimal::from(satoshis),
            op_return: None,
            token: None,
        }
    }

    /// A token payment of `amount` display units.
    pub fn token(
        from: impl Into<String>,
        to: impl Into<String>,
        amount: Decimal,
        context: TokenContext,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            amount,
            op_return: None,
            token: Some(context),
        }
    }

    /// Attach `OP_RETURN` data chunks.
    pub fn with_op_return(mut self, chunks: Vec<Vec<u8>>) -> Self {
        self.op_return = Some(chunks);
        self
    }
}

/// Destination of a transaction output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum OutputTarget {
    /// Pay-to-address output.
    Address(String),
    /// Raw locking script, used for `OP_RETURN` payloads.
    Script(Vec<u8>),
}

impl OutputTarget {
    pub fn is_script(&self) -> bool {
        matches!(self, Self::Script(_))
    }
}

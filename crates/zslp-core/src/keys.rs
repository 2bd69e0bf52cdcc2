//! Private signing keys and WIF decoding.
//!
//! The engine never performs ECDSA itself; a [`SigningKey`] is handed to the
//! assembly port, which owns the curve arithmetic. Secret bytes are wiped on drop.

use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{WIF_COMPRESSED_FLAG, WIF_VERSION};
use crate::error::KeyError;

/// A secp256k1 private key bound to the address(es) it controls.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey {
    secret: [u8; 32],
    compressed: bool,
}

impl SigningKey {
    /// Wrap raw secret bytes of a compressed key.
    pub fn from_secret_bytes(secret: [u8; 32]) -> Self {
        Self {
            secret,
            compressed: true,
        }
    }

    /// Decode a compressed-key WIF string (Base58Check, version `0x80`).
    pub fn from_wif(wif: &str) -> Result<Self, KeyError> {
        let wif = wif.trim();
        if wif.is_empty() {
            return Err(KeyError::Empty);
        }
        let mut raw = bs58::decode(wif)
            .into_vec()
            .map_err(|e| KeyError::InvalidBase58(e.to_string()))?;
        if raw.len() < 5 {
            raw.zeroize();
            return Err(KeyError::InvalidBase58("too short".into()));
        }

        let (payload, checksum) = raw.split_at(raw.len() - 4);
        if checksum != &double_sha256(payload)[..4] {
            raw.zeroize();
            return Err(KeyError::BadChecksum);
        }
        if payload[0] != WIF_VERSION {
            let version = payload[0];
            raw.zeroize();
            return Err(KeyError::InvalidVersion(version));
        }

        let result = match payload.len() {
            34 if payload[33] == WIF_COMPRESSED_FLAG => {
                let mut secret = [0u8; 32];
                secret.copy_from_slice(&payload[1..33]);
                Ok(Self::from_secret_bytes(secret))
            }
            33 => Err(KeyError::NotCompressed),
            n => Err(KeyError::InvalidBase58(format!("unexpected payload length {n}"))),
        };
        raw.zeroize();
        result
    }

    /// Encode as a compressed-key WIF string.
    pub fn to_wif(&self) -> String {
        let mut payload = Vec::with_capacity(38);
        payload.push(WIF_VERSION);
        payload.extend_from_slice(&self.secret);
        if self.compressed {
            payload.push(WIF_COMPRESSED_FLAG);
        }
        let checksum = double_sha256(&payload);
        payload.extend_from_slice(&checksum[..4]);
        let wif = bs58::encode(&payload).into_string();
        payload.zeroize();
        wif
    }

    /// Raw secret bytes, for the signing port only.
    pub fn secret_bytes(&self) -> &[u8; 32] {
        &self.secret
    }

    pub fn is_compressed(&self) -> bool {
        self.compressed
    }

    /// Short non-secret identifier for logs: first four bytes of `SHA256(secret)`.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.secret);
        hex::encode(&digest[..4])
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("fingerprint", &self.fingerprint())
            .finish_non_exhaustive()
    }
}

fn double_sha256(data: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

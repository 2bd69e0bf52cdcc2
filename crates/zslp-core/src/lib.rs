//! # zslp-core
//! Foundation types, codecs and port traits for the dual-asset wallet engine.
//!
//! # Modules
//!
//! - [`amount`]: decimal scaling between display and base units
//! - [`constants`]: dust limit, byte weights, protocol identifiers
//! - [`error`]: script, amount, key, address and port errors
//! - [`keys`]: `SigningKey` and WIF decoding
//! - [`script`]: script chunk parser and push encoder
//! - [`slp`]: token-layer `OP_RETURN` codec
//! - [`traits`]: assembler, broadcaster, address and UTXO ports
//! - [`types`]: hashes, outpoints, UTXOs, token metadata, requests

pub mod amount;
pub mod constants;
pub mod error;
pub mod keys;
pub mod script;
pub mod slp;
pub mod traits;
pub mod types;

//! Error types for script decoding, amounts, keys and addresses.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("not an OP_RETURN script")] NotOpReturn,
    #[error("not a token-layer OP_RETURN")] NotTokenProtocol,
    #[error("unknown token type")] UnknownTokenVersion,
    #[error("output {0} is not a token output")] NotTokenOutput(u32),
    #[error("invalid token transaction type: {0}")] InvalidTxType(String),
    #[error("malformed script: {0}")] Malformed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("amount must be positive")] NotPositive,
    #[error("amount out of range: {0}")] OutOfRange(String),
    #[error("unsupported decimals: {0}")] UnsupportedDecimals(u8),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("empty WIF")] Empty,
    #[error("invalid base58: {0}")] InvalidBase58(String),
    #[error("bad checksum")] BadChecksum,
    #[error("unexpected version byte: {0:#04x}")] InvalidVersion(u8),
    #[error("WIF must encode a compressed key")] NotCompressed,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty address")] Empty,
    #[error("unrecognised address format: {0}")] UnknownFormat(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("assembly: {0}")] Assembly(String),
    #[error("transport: {0}")] Transport(String),
    #[error("utxo source: {0}")] Source(String),
}

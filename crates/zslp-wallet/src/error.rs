//! Wallet engine error types.

use thiserror::Error;
use zslp_core::error::{AddressError, AmountError, KeyError, ScriptError};
use zslp_core::types::{Hash256, OutPoint};

/// Errors produced by a single build attempt.
///
/// Every variant is terminal for that attempt: no partial plan survives it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Candidates exhausted before the amount plus fee was covered.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Satoshis available in the examined candidates.
        have: u64,
        /// Satoshis required including fee.
        need: u64,
    },

    /// Token candidates exhausted before the send amount was covered.
    #[error("insufficient tokens: have {have}, need {need}")]
    InsufficientTokens {
        /// Base units available.
        have: u128,
        /// Base units required.
        need: u128,
    },

    /// Inputs cover the payment but not the network fee.
    #[error("not enough funds for the transaction fee: have {have}, need {need}. Deposit a small amount and try again")]
    FeeShortfall {
        /// Satoshis available.
        have: u64,
        /// Satoshis required including fee.
        need: u64,
    },

    /// Scaled token amount is below one base unit.
    #[error("amount below minimum for this token. Increase the send amount and try again")]
    BelowTokenMinimum,

    /// A candidate that may not be spent this way was handed to the selector.
    #[error("cannot spend unspendable output {0}")]
    UnspendableInput(OutPoint),

    /// Too many inputs for a single transaction.
    #[error("too many inputs ({count} > {max}), send this transaction in multiple smaller transactions")]
    TooManyInputs {
        /// Inputs the build would need.
        count: usize,
        /// Configured ceiling.
        max: usize,
    },

    /// A token id was given without its decimals.
    #[error("token decimals required")]
    MissingDecimals,

    /// Sweep parameters are missing or empty.
    #[error("invalid sweep parameters: {0}")]
    InvalidSweepParams(String),

    /// A token send was requested without token context.
    #[error("token send requires a token context")]
    MissingTokenContext,

    /// Request and metadata name different tokens.
    #[error("token mismatch: expected {expected}, got {got}")]
    TokenMismatch {
        /// Token id of the supplied metadata.
        expected: Hash256,
        /// Token id of the request.
        got: Hash256,
    },

    /// An input has no signing key.
    #[error("no signing key for input {0}")]
    KeyNotFound(OutPoint),

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// The broadcaster failed or returned something other than a txid.
    #[error("transaction failed: {0}")]
    BroadcastFailed(String),

    /// The assembly port rejected an input, output or signature.
    #[error("assembly: {0}")]
    Assembly(String),

    /// The UTXO source could not be queried.
    #[error("utxo lookup: {0}")]
    Source(String),

    /// Configuration could not be loaded.
    #[error("config: {0}")]
    Config(String),

    /// Token script decoding error.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// Amount scaling error.
    #[error(transparent)]
    Amount(#[from] AmountError),

    /// Private key decoding error.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// Address conversion error.
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Coarse classification of [`WalletError`] for callers that map errors to UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotOpReturn,
    NotTokenProtocol,
    UnknownTokenVersion,
    NotTokenOutput,
    InvalidTxType,
    MalformedScript,
    InsufficientFunds,
    InsufficientTokens,
    FeeShortfall,
    BelowTokenMinimum,
    UnspendableInput,
    TooManyInputs,
    MissingDecimals,
    InvalidSweepParams,
    InvalidSendParams,
    InvalidAddress,
    InvalidAmount,
    InvalidKey,
    KeyNotFound,
    AssemblyFailed,
    BroadcastFailed,
    SourceFailed,
    Config,
}

impl WalletError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::InsufficientTokens { .. } => ErrorKind::InsufficientTokens,
            Self::FeeShortfall { .. } => ErrorKind::FeeShortfall,
            Self::BelowTokenMinimum => ErrorKind::BelowTokenMinimum,
            Self::UnspendableInput(_) => ErrorKind::UnspendableInput,
            Self::TooManyInputs { .. } => ErrorKind::TooManyInputs,
            Self::MissingDecimals => ErrorKind::MissingDecimals,
            Self::InvalidSweepParams(_) => ErrorKind::InvalidSweepParams,
            Self::MissingTokenContext | Self::TokenMismatch { .. } => ErrorKind::InvalidSendParams,
            Self::KeyNotFound(_) => ErrorKind::KeyNotFound,
            Self::InvalidAmount(_) | Self::Amount(_) => ErrorKind::InvalidAmount,
            Self::BroadcastFailed(_) => ErrorKind::BroadcastFailed,
            Self::Assembly(_) => ErrorKind::AssemblyFailed,
            Self::Source(_) => ErrorKind::SourceFailed,
            Self::Config(_) => ErrorKind::Config,
            Self::Key(_) => ErrorKind::InvalidKey,
            Self::Address(_) => ErrorKind::InvalidAddress,
            Self::Script(e) => match e {
                ScriptError::NotOpReturn => ErrorKind::NotOpReturn,
                ScriptError::NotTokenProtocol => ErrorKind::NotTokenProtocol,
                ScriptError::UnknownTokenVersion => ErrorKind::UnknownTokenVersion,
                ScriptError::NotTokenOutput(_) => ErrorKind::NotTokenOutput,
                ScriptError::InvalidTxType(_) => ErrorKind::InvalidTxType,
                ScriptError::Malformed(_) => ErrorKind::MalformedScript,
            },
        }
    }

    /// True for selection-time failures whose message is shown to the user
    /// as is: the fix is a different amount, more funding or other inputs.
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::InsufficientFunds
                | ErrorKind::InsufficientTokens
                | ErrorKind::FeeShortfall
                | ErrorKind::BelowTokenMinimum
                | ErrorKind::UnspendableInput
                | ErrorKind::TooManyInputs
        )
    }
}

//! # zslp-wallet: transaction construction for native coin and SLP tokens.
//!
//! Selects UTXOs, estimates fees, lays out outputs and drives the assembly
//! and broadcast ports for three operations: native sends, token sends and
//! paper-wallet sweeps.
//!
//! # Modules
//!
//! - [`error`]: `WalletError` and `ErrorKind`
//! - [`config`]: fee rate, dust limit and input ceiling
//! - [`fee`]: P2PKH byte-cost model
//! - [`coin_selection`]: first-fit native and token selection
//! - [`plan`]: ordered inputs and outputs, replayed into an assembler
//! - [`builder`]: native sends
//! - [`token`]: token sends with token and native change
//! - [`sweep`]: paper-wallet sweeps
//! - [`broadcast`]: publish and txid validation
//! - [`gate`]: one in-flight build per address
//! - [`cache`]: append-only token metadata cache
//! - [`engine`]: facade tying the above to the ports

pub mod broadcast;
pub mod builder;
pub mod cache;
pub mod coin_selection;
pub mod config;
pub mod engine;
pub mod error;
pub mod fee;
pub mod gate;
pub mod plan;
pub mod sweep;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::NativeSendBuilder;
pub use cache::MetadataCache;
pub use coin_selection::{CoinSelection, CoinSelector, TokenSelection};
pub use config::WalletConfig;
pub use engine::{Engine, Sent};
pub use error::{ErrorKind, WalletError};
pub use fee::FeeEstimator;
pub use gate::BuildGate;
pub use plan::{BuildPlan, PlannedInput, PlannedOutput};
pub use sweep::{PaperBalances, PaperUtxos, SweepRequest, SweepState, Sweeper};
pub use token::TokenSendBuilder;

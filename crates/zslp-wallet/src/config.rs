//! Engine configuration.

use serde::{Deserialize, Serialize};
use zslp_core::constants::{DUST_LIMIT, MAX_TOKEN_INPUTS};

use crate::error::WalletError;

/// Fee and policy parameters for every builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Smallest output value worth creating, in satoshis.
    pub dust_limit: u64,
    /// Ceiling on inputs per token transaction.
    pub max_inputs: usize,
    /// Fee rate in satoshis per byte.
    pub fee_per_byte: u64,
    /// Extra fee percentage applied to native-only sweeps.
    pub sweep_fee_margin_percent: u64,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            dust_limit: DUST_LIMIT,
            max_inputs: MAX_TOKEN_INPUTS,
            fee_per_byte: 1,
            sweep_fee_margin_percent: 10,
        }
    }
}

impl WalletConfig {
    /// Preset for mainnet: 1 sat/byte.
    pub fn mainnet() -> Self {
        Self::default()
    }

    /// Preset for local regtest nodes that enforce a higher relay fee.
    pub fn regtest() -> Self {
        Self {
            fee_per_byte: 2,
            ..Self::default()
        }
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, WalletError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WalletError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings no builder can work with.
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.fee_per_byte == 0 {
            return Err(WalletError::Config("fee_per_byte must be non-zero".into()));
        }
        if self.max_inputs == 0 {
            return Err(WalletError::Config("max_inputs must be non-zero".into()));
        }
        Ok(())
    }
}

//! Token metadata cache.
//!
//! Genesis metadata never changes once confirmed, so entries are inserted
//! once and never replaced or evicted.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;
use zslp_core::slp::decode_genesis_metadata;
use zslp_core::types::{Hash256, TokenMetadata};

use crate::error::WalletError;

#[derive(Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<Hash256, Arc<TokenMetadata>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, token_id: &Hash256) -> Option<Arc<TokenMetadata>> {
        self.entries.read().get(token_id).cloned()
    }

    /// Insert `metadata` unless its token is already cached; returns the
    /// entry that ends up in the cache.
    pub fn insert(&self, metadata: TokenMetadata) -> Arc<TokenMetadata> {
        let mut entries = self.entries.write();
        Arc::clone(
            entries
                .entry(metadata.token_id)
                .or_insert_with(|| Arc::new(metadata)),
        )
    }

    /// Cached metadata for `token_id`, decoding `genesis_script` on a miss.
    pub fn get_or_decode(
        &self,
        token_id: &Hash256,
        genesis_script: &[u8],
    ) -> Result<Arc<TokenMetadata>, WalletError> {
        if let Some(hit) = self.get(token_id) {
            return Ok(hit);
        }
        let metadata = decode_genesis_metadata(token_id, genesis_script)?;
        debug!(%token_id, symbol = %metadata.symbol, decimals = metadata.decimals, "cached token metadata");
        Ok(self.insert(metadata))
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

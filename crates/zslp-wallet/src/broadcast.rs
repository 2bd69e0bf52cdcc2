//! Publishing signed transactions.

use tracing::{debug, warn};
use zslp_core::traits::Broadcaster;
use zslp_core::types::Hash256;

use crate::error::WalletError;

/// Hex-encode `raw` and hand it to `broadcaster`.
///
/// The response must be a 64-character transaction id; anything else is
/// returned verbatim inside [`WalletError::BroadcastFailed`]. No retries.
pub async fn publish<B>(broadcaster: &B, raw: &[u8]) -> Result<Hash256, WalletError>
where
    B: Broadcaster + ?Sized,
{
    let raw_hex = hex::encode(raw);
    let response = broadcaster.publish(&raw_hex).await.map_err(|e| {
        warn!(error = %e, "broadcast transport failed");
        WalletError::BroadcastFailed(e.to_string())
    })?;

    match Hash256::from_hex(response.trim()) {
        Some(txid) => {
            debug!(%txid, bytes = raw.len(), "broadcaster accepted transaction");
            Ok(txid)
        }
        None => {
            warn!(%response, "broadcaster returned a non-txid response");
            Err(WalletError::BroadcastFailed(response))
        }
    }
}

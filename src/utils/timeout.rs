//! Async timeout wrappers used at protocol edges (connects, handshakes).

use std::future::Future;
use std::time::Duration;

use crate::error::{ProtocolError, Result};

/// Default bound for protocol-edge operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Run `future` with a time limit, mapping expiry to
/// [`ProtocolError::Timeout`].
pub async fn with_timeout_error<F, T>(future: F, limit: Duration) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(ProtocolError::Timeout),
    }
}

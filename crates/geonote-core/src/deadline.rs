//! Per-call deadline for store operations.
//!
//! Every store call runs under [`with_deadline`]. When the deadline passes the
//! in-flight future is dropped and the caller gets [`Error::Timeout`]. Dropping
//! only stops the client waiting; stores backed by a server also bound the
//! statement there.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::defaults::SLOW_QUERY_MS;
use crate::error::{Error, Result};
use crate::logging::{COMPONENT_DEADLINE, SUBSYSTEM_DATABASE};

/// Run `fut` with an upper bound of `timeout` on its latency.
pub async fn with_deadline<T, F>(op: &'static str, timeout: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let start = Instant::now();
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            if duration_ms >= SLOW_QUERY_MS {
                warn!(
                    subsystem = SUBSYSTEM_DATABASE,
                    component = COMPONENT_DEADLINE,
                    op,
                    duration_ms,
                    slow = true,
                    "Store call was slow"
                );
            } else {
                debug!(
                    subsystem = SUBSYSTEM_DATABASE,
                    component = COMPONENT_DEADLINE,
                    op,
                    duration_ms,
                    success = result.is_ok(),
                    "Store call finished"
                );
            }
            result
        }
        Err(_) => {
            warn!(
                subsystem = SUBSYSTEM_DATABASE,
                component = COMPONENT_DEADLINE,
                op,
                timeout_ms = timeout.as_millis() as u64,
                "Store call exceeded deadline"
            );
            Err(Error::Timeout(timeout))
        }
    }
}

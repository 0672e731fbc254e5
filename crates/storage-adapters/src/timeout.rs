use std::future::Future;
use std::time::Duration;

use domains::{DomainError, DomainResult};

/// Bounds a store call. An elapsed timer surfaces as `Unavailable`.
pub async fn with_timeout<T, F>(limit: Duration, operation: &'static str, call: F) -> DomainResult<T>
where
    F: Future<Output = DomainResult<T>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, timeout_ms = limit.as_millis() as u64, "store call timed out");
            Err(DomainError::unavailable(format!(
                "{} timed out after {}ms",
                operation,
                limit.as_millis()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_call_is_unavailable() {
        let result: DomainResult<()> = with_timeout(Duration::from_millis(10), "count", async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(DomainError::Unavailable(_))));
    }

    #[tokio::test]
    async fn fast_call_passes_through() {
        let ok = with_timeout(Duration::from_secs(1), "find", async { Ok(7) }).await;
        assert_eq!(ok, Ok(7));

        let err: DomainResult<u8> = with_timeout(Duration::from_secs(1), "find", async {
            Err(DomainError::not_found("gone"))
        })
        .await;
        assert_eq!(err, Err(DomainError::not_found("gone")));
    }
}

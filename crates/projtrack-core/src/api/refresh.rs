//! Refresh interceptor.
//!
//! `ApiClient` wraps a [`SessionClient`]. When a request fails with 401 it
//! performs one silent `POST /auth/refresh/` and replays the original request
//! once through the raw transport. A failed refresh tears the session down
//! (both cookies cleared, navigator sent to `/login`) and surfaces
//! [`ApiError::RefreshFailed`].
//!
//! Refreshes are single-flight across every clone of an `ApiClient`:
//! requests that fail while a refresh is already running wait for it and
//! share its outcome instead of issuing their own.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::navigator::Navigator;
use crate::routes;

use super::client::{PendingRequest, SessionClient};
use super::error::{ApiError, RefreshFailure};

// ============================================================================
// Constants
// ============================================================================

/// Endpoint that rotates the session cookies
pub const REFRESH_PATH: &str = "/auth/refresh/";

// ============================================================================
// Single-flight refresh
// ============================================================================

/// Serializes refreshes and lets late 401s reuse the refresh that already
/// ran on their behalf.
///
/// `epoch` counts completed refreshes. A request samples it before it is
/// sent; if the epoch has moved by the time its 401 gets the lock, a refresh
/// happened after the request left and its outcome applies.
#[derive(Debug, Default)]
struct SingleFlight {
    epoch: AtomicU64,
    last: Mutex<Option<Result<(), RefreshFailure>>>,
}

impl SingleFlight {
    fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    async fn run<F, Fut>(&self, observed: u64, refresh: F) -> Result<(), RefreshFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), RefreshFailure>>,
    {
        let mut last = self.last.lock().await;

        if self.epoch() != observed {
            if let Some(outcome) = last.clone() {
                debug!("Reusing outcome of concurrent refresh");
                return outcome;
            }
        }

        let outcome = refresh().await;
        *last = Some(outcome.clone());
        self.epoch.fetch_add(1, Ordering::Release);
        outcome
    }
}

// ============================================================================
// ApiClient
// ============================================================================

/// Session client plus the 401 refresh-and-replay policy.
/// Clone is cheap and clones share one single-flight guard.
#[derive(Clone)]
pub struct ApiClient {
    session: SessionClient,
    navigator: Arc<dyn Navigator>,
    flight: Arc<SingleFlight>,
}

impl ApiClient {
    pub fn new(session: SessionClient, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            flight: Arc::new(SingleFlight::default()),
        }
    }

    /// The raw transport. Requests sent through it are never intercepted.
    pub fn session(&self) -> &SessionClient {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Send a request, refreshing the session and replaying once on 401.
    pub async fn execute(&self, request: PendingRequest) -> Result<Value, ApiError> {
        let observed = self.flight.epoch();

        let err = match self.session.send(&request).await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        if !err.is_unauthorized() {
            return Err(err);
        }
        let current = self.navigator.current_path();
        if routes::is_route(&current, routes::LOGIN) {
            debug!(path = %request.path, "401 on login screen, not refreshing");
            return Err(err);
        }

        info!(method = %request.method, path = %request.path, "Access token rejected, refreshing session");
        self.flight
            .run(observed, || self.refresh_or_teardown())
            .await
            .map_err(ApiError::RefreshFailed)?;

        let replay = err.as_http().map(|http| &http.request).unwrap_or(&request);
        debug!(method = %replay.method, path = %replay.path, "Replaying request after refresh");
        self.session.send(replay).await
    }

    /// One refresh attempt. On failure the session is torn down here, inside
    /// the flight, so concurrent waiters never repeat it.
    async fn refresh_or_teardown(&self) -> Result<(), RefreshFailure> {
        match self.session.send(&PendingRequest::post(REFRESH_PATH)).await {
            Ok(_) => {
                info!("Session refreshed");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Session refresh failed, signing out");
                self.session.credentials().clear();
                self.navigator.redirect(routes::LOGIN);
                Err(RefreshFailure::from(&err))
            }
        }
    }

    // ===== Typed verbs =====

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.execute(PendingRequest::get(path)).await?;
        decode(path, value)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = self.execute(PendingRequest::post(path).json(body)?).await?;
        decode(path, value)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let value = self.execute(PendingRequest::put(path).json(body)?).await?;
        decode(path, value)
    }

    /// DELETE, ignoring whatever body (usually none) comes back
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(PendingRequest::delete(path)).await?;
        Ok(())
    }
}

fn decode<T: DeserializeOwned>(path: &str, value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value)
        .map_err(|e| ApiError::InvalidResponse(format!("unexpected body from {}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use std::sync::atomic::AtomicUsize;

    fn failure() -> RefreshFailure {
        RefreshFailure {
            status: Some(StatusCode::UNAUTHORIZED),
            message: "expired".into(),
        }
    }

    #[tokio::test]
    async fn test_sequential_refreshes_each_run() {
        let flight = SingleFlight::default();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let observed = flight.epoch();
            let outcome = flight
                .run(observed, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .await;
            assert!(outcome.is_ok());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(flight.epoch(), 3);
    }

    #[tokio::test]
    async fn test_stale_epoch_reuses_last_outcome() {
        let flight = SingleFlight::default();
        let calls = AtomicUsize::new(0);
        let observed = flight.epoch();

        let refresh = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(failure())
        };
        let first = flight.run(observed, refresh).await;
        assert_eq!(first, Err(failure()));

        // Observed before the first refresh finished: must not refresh again
        let second = flight.run(observed, refresh).await;
        assert_eq!(second, Err(failure()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(flight.epoch(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_waiters_share_one_refresh() {
        let flight = Arc::new(SingleFlight::default());
        let calls = Arc::new(AtomicUsize::new(0));
        let observed = flight.epoch();

        let run = |flight: Arc<SingleFlight>, calls: Arc<AtomicUsize>| async move {
            flight
                .run(observed, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    tokio::task::yield_now().await;
                    Ok(())
                })
                .await
        };

        let (a, b, c) = tokio::join!(
            run(flight.clone(), calls.clone()),
            run(flight.clone(), calls.clone()),
            run(flight.clone(), calls.clone()),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

//! Remote save/load client.
//!
//! Wire contract: `POST {base}/api/testgame/save` with
//! `{identity, ...lean snapshot fields}`, `POST {base}/api/testgame/load`
//! with `{identity}`. Saves are keyed by the self-reported identity string —
//! the server performs no ownership proof (a known limitation of the
//! protocol, see DESIGN.md), only tamper detection on the stored blob.
//!
//! Each operation carries an in-flight flag: a duplicate submission while
//! one is pending is ignored rather than queued. Failures surface as typed
//! [`RemoteError`]s; nothing here ever touches the accrual loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use forge_core::LeanSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("identity is required")]
    MissingIdentity,
    #[error("no save data found for this identity")]
    NotFound,
    #[error("save data integrity check failed")]
    Tampered,
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server error: {0}")]
    Server(String),
    #[error("unexpected response: {0}")]
    Protocol(String),
}

/// Result of a submission attempt. `Skipped` means an identical operation
/// was already in flight and this one was ignored.
#[derive(Debug, PartialEq, Eq)]
pub enum RequestOutcome<T> {
    Completed(T),
    Skipped,
}

#[derive(Serialize)]
struct SaveRequest<'a> {
    identity: &'a str,
    #[serde(flatten)]
    snapshot: &'a LeanSnapshot,
}

#[derive(Serialize)]
struct LoadRequest<'a> {
    identity: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Clone)]
pub struct RemoteClient {
    base_url: String,
    http: reqwest::Client,
    save_in_flight: Arc<AtomicBool>,
    load_in_flight: Arc<AtomicBool>,
}

/// Clears the flag when the request finishes, error paths included.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn acquire(flag: &AtomicBool) -> Option<InFlightGuard<'_>> {
    flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
        .then_some(InFlightGuard(flag))
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        RemoteClient {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
            save_in_flight: Arc::new(AtomicBool::new(false)),
            load_in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a save or load is currently pending; the UI shows this as its
    /// loading indicator.
    pub fn is_busy(&self) -> bool {
        self.save_in_flight.load(Ordering::SeqCst) || self.load_in_flight.load(Ordering::SeqCst)
    }

    pub async fn save(
        &self,
        identity: &str,
        snapshot: &LeanSnapshot,
    ) -> Result<RequestOutcome<()>, RemoteError> {
        if identity.trim().is_empty() {
            return Err(RemoteError::MissingIdentity);
        }
        let Some(_guard) = acquire(&self.save_in_flight) else {
            return Ok(RequestOutcome::Skipped);
        };

        let response = self
            .http
            .post(format!("{}/api/testgame/save", self.base_url))
            .json(&SaveRequest { identity, snapshot })
            .send()
            .await?;
        match response.status().as_u16() {
            200 => Ok(RequestOutcome::Completed(())),
            status => Err(error_from_response(status, response).await),
        }
    }

    pub async fn load(
        &self,
        identity: &str,
    ) -> Result<RequestOutcome<LeanSnapshot>, RemoteError> {
        if identity.trim().is_empty() {
            return Err(RemoteError::MissingIdentity);
        }
        let Some(_guard) = acquire(&self.load_in_flight) else {
            return Ok(RequestOutcome::Skipped);
        };

        let response = self
            .http
            .post(format!("{}/api/testgame/load", self.base_url))
            .json(&LoadRequest { identity })
            .send()
            .await?;
        match response.status().as_u16() {
            200 => {
                let snapshot = response
                    .json::<LeanSnapshot>()
                    .await
                    .map_err(|e| RemoteError::Protocol(e.to_string()))?;
                Ok(RequestOutcome::Completed(snapshot))
            }
            status => Err(error_from_response(status, response).await),
        }
    }
}

async fn error_from_response(status: u16, response: reqwest::Response) -> RemoteError {
    let message = response
        .json::<ErrorBody>()
        .await
        .map_or_else(|e| e.to_string(), |body| body.error);
    match status {
        404 => RemoteError::NotFound,
        400 if message.contains("integrity") => RemoteError::Tampered,
        400 => RemoteError::Protocol(message),
        _ => RemoteError::Server(message),
    }
}

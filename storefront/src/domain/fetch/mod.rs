//! Remote record fetch lifecycle.
//!
//! A view owns one [`FetchLifecycle`] and drives it through
//! `Idle → Loading → {Loaded, Failed}`. Each transition into `Loading`
//! issues a [`FetchTicket`] carrying a generation number; a completion is
//! applied only while its ticket is still current, so a slow response for a
//! superseded key can never overwrite the state of a newer request.
//!
//! Failures collapse into a fixed user-facing message. The underlying error is
//! logged when the failure is applied and kept on [`FetchFailure`] for
//! diagnostics only.

use std::fmt;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use thiserror::Error;
use tracing::{debug, warn};


/// Error surfaced by a remote fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The service returned no matching record.
    #[error("record not found")]
    NotFound,
    /// Any other failure: transport, timeout, rejection or undecodable data.
    #[error("remote failure: {message}")]
    RemoteFailure {
        /// Diagnostic description; never shown to users.
        message: String,
    },
}

impl FetchError {
    /// Helper for remote failures.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteFailure {
            message: message.into(),
        }
    }
}

/// Failure state presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    message: &'static str,
    cause: FetchError,
}

impl FetchFailure {
    /// Generic message to show in the error panel.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Underlying error, for diagnostics.
    #[must_use]
    pub const fn cause(&self) -> &FetchError {
        &self.cause
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Observable state of a fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// No request has been issued for the current view.
    Idle,
    /// A request is in flight.
    Loading,
    /// The most recent request returned a record.
    Loaded(T),
    /// The most recent request failed.
    Failed(FetchFailure),
}

impl<T> FetchState<T> {
    /// Whether a request is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Loaded record, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    /// Failure, if any.
    #[must_use]
    pub const fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Self::Failed(failure) => Some(failure),
            _ => None,
        }
    }
}

/// Token identifying one transition into `Loading`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket<K> {
    generation: u64,
    key: K,
}

impl<K> FetchTicket<K> {
    /// Key the request was issued for.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Issuance order within the owning lifecycle.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// Result of one request, ready to be applied to its lifecycle.
#[derive(Debug)]
pub struct FetchCompletion<K, T> {
    ticket: FetchTicket<K>,
    result: Result<T, FetchError>,
}

impl<K, T> FetchCompletion<K, T> {
    /// Pair a ticket with the outcome of its request.
    pub const fn new(ticket: FetchTicket<K>, result: Result<T, FetchError>) -> Self {
        Self { ticket, result }
    }

    /// Ticket of the request.
    #[must_use]
    pub const fn ticket(&self) -> &FetchTicket<K> {
        &self.ticket
    }
}

/// A request issued by a lifecycle whose remote read has not finished.
///
/// The future is detached from the lifecycle, so several pending fetches may
/// exist at once; whichever resolves, only the current ticket is applied.
pub struct PendingFetch<K, T> {
    ticket: FetchTicket<K>,
    request: BoxFuture<'static, Result<T, FetchError>>,
}

impl<K, T> PendingFetch<K, T> {
    /// Wrap the remote read issued for `ticket`.
    pub fn new<F>(ticket: FetchTicket<K>, request: F) -> Self
    where
        F: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        Self {
            ticket,
            request: request.boxed(),
        }
    }

    /// Ticket of the request.
    #[must_use]
    pub const fn ticket(&self) -> &FetchTicket<K> {
        &self.ticket
    }

    /// Await the remote read.
    pub async fn resolve(self) -> FetchCompletion<K, T> {
        let result = self.request.await;
        FetchCompletion::new(self.ticket, result)
    }
}

impl<K: fmt::Debug, T> fmt::Debug for PendingFetch<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingFetch")
            .field("ticket", &self.ticket)
            .finish_non_exhaustive()
    }
}

/// Whether a completion changed the lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The completion belonged to the current request and was applied.
    Applied,
    /// A newer request (or a reset) superseded the completion; it was dropped.
    Stale,
}

/// Per-view fetch state machine keyed by `K`.
#[derive(Debug, Clone)]
pub struct FetchLifecycle<K, T> {
    state: FetchState<T>,
    key: Option<K>,
    generation: u64,
    failure_message: &'static str,
}

impl<K, T> FetchLifecycle<K, T>
where
    K: Clone + PartialEq + fmt::Display,
{
    /// Create an idle lifecycle that reports failures with `failure_message`.
    #[must_use]
    pub const fn new(failure_message: &'static str) -> Self {
        Self {
            state: FetchState::Idle,
            key: None,
            generation: 0,
            failure_message,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Key of the most recent request, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Move to `Loading` for `key` and issue a ticket.
    ///
    /// Any ticket issued earlier becomes stale.
    pub fn begin(&mut self, key: K) -> FetchTicket<K> {
        self.generation = self.generation.wrapping_add(1);
        self.key = Some(key.clone());
        self.state = FetchState::Loading;
        debug!(key = %key, generation = self.generation, "fetch started");
        FetchTicket {
            generation: self.generation,
            key,
        }
    }

    /// Begin a request only when `key` differs from the current key or the
    /// lifecycle is idle.
    pub fn begin_if_changed(&mut self, key: K) -> Option<FetchTicket<K>> {
        let unchanged = self.key.as_ref() == Some(&key) && !matches!(self.state, FetchState::Idle);
        if unchanged {
            return None;
        }
        Some(self.begin(key))
    }

    /// Apply a completion if its ticket is still current.
    pub fn apply(&mut self, completion: FetchCompletion<K, T>) -> ApplyOutcome {
        let FetchCompletion { ticket, result } = completion;
        if ticket.generation != self.generation || !self.state.is_loading() {
            debug!(
                key = %ticket.key,
                generation = ticket.generation,
                current = self.generation,
                "discarding stale fetch completion"
            );
            return ApplyOutcome::Stale;
        }

        self.state = match result {
            Ok(value) => FetchState::Loaded(value),
            Err(cause) => {
                warn!(key = %ticket.key, error = %cause, "fetch failed");
                FetchState::Failed(FetchFailure {
                    message: self.failure_message,
                    cause,
                })
            }
        };
        ApplyOutcome::Applied
    }

    /// Return to `Idle`, invalidating any in-flight ticket.
    pub fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.state = FetchState::Idle;
    }

    /// Restart the cycle for the current key.
    ///
    /// Returns `None` when no key has been requested yet.
    pub fn retry(&mut self) -> Option<FetchTicket<K>> {
        let key = self.key.clone()?;
        self.reset();
        Some(self.begin(key))
    }
}

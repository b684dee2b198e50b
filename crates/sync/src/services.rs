//! External-service seams.
//!
//! The app owns nothing the backend does: identity, persistence and device
//! location are all behind these traits and injected into the view layer.
//! Methods return boxed futures for dyn-compatibility, so the viewer can
//! hold `Box<dyn SessionProvider>` and swap remote for in-memory freely.

use std::future::Future;
use std::pin::Pin;
use std::time::{SystemTime, UNIX_EPOCH};

use feed::draft::NewRecord;
use feed::record::Record;
use foundation::geo::GeoPoint;
use foundation::time::Timestamp;
use tokio::sync::{mpsc, watch};

use crate::session::Session;

/// Type alias for a boxed future that can be sent between tasks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Push channel for full record-set snapshots.
pub type SnapshotReceiver = mpsc::Receiver<Vec<Record>>;

/// Identity-service failure.
///
/// `code` carries the provider's machine-readable error when one exists
/// (e.g. an unauthorized-domain rejection on federated sign-in); `message`
/// is what gets surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthError {
    pub code: Option<String>,
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({code})", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for AuthError {}

/// Document-store failure.
#[derive(Debug)]
pub struct StoreError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

/// Device location failure. Both outcomes are expected and non-fatal; the
/// submission flow falls back to a randomized placement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LocationError {
    Denied,
    Unavailable,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocationError::Denied => write!(f, "location permission denied"),
            LocationError::Unavailable => write!(f, "location unavailable"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Hosted identity service.
pub trait SessionProvider: Send + Sync {
    fn sign_in_anonymous(&self) -> BoxFuture<'_, Result<Session, AuthError>>;

    fn sign_in_custom_token(&self, token: String) -> BoxFuture<'_, Result<Session, AuthError>>;

    /// Federated sign-in (the provider runs the popup/redirect dance).
    fn sign_in_federated(&self) -> BoxFuture<'_, Result<Session, AuthError>>;

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>>;

    /// Observe session transitions. The receiver holds the latest session
    /// (`None` between sign-out and the follow-up anonymous sign-in).
    fn watch_session(&self) -> watch::Receiver<Option<Session>>;
}

/// Hosted document collection. Append-only; the server assigns ids and
/// timestamps, and every change pushes a complete snapshot to every
/// subscriber.
pub trait RecordStore: Send + Sync {
    fn append(&self, record: NewRecord) -> BoxFuture<'_, Result<(), StoreError>>;

    /// Open the long-lived snapshot subscription. The current snapshot is
    /// delivered first, then one per change.
    fn subscribe(&self) -> BoxFuture<'_, Result<SnapshotReceiver, StoreError>>;
}

/// One-shot best-effort device location.
pub trait DeviceLocator: Send + Sync {
    fn locate(&self) -> BoxFuture<'_, Result<GeoPoint, LocationError>>;
}

/// Wall-clock now, as a store-style timestamp.
pub fn system_now() -> Timestamp {
    let ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0);
    Timestamp::new(ms)
}

#[cfg(test)]
mod tests {
    use super::{AuthError, LocationError, StoreError};

    #[test]
    fn auth_error_display_includes_the_code() {
        let plain = AuthError::new("sign-in failed");
        assert_eq!(plain.to_string(), "sign-in failed");
        let coded = AuthError::with_code("auth/unauthorized-domain", "domain not allowed");
        assert_eq!(coded.to_string(), "domain not allowed (auth/unauthorized-domain)");
    }

    #[test]
    fn store_error_chains_its_source() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = StoreError::with_source("append failed", source);
        assert_eq!(err.to_string(), "append failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn location_errors_are_distinct() {
        assert_ne!(LocationError::Denied, LocationError::Unavailable);
    }
}

//! In-memory service implementations.
//!
//! These back the viewer's offline mode and the test suites. They keep the
//! remote contracts exactly: the store assigns ids and timestamps, and every
//! change pushes a complete snapshot to every live subscriber.

use std::sync::atomic::{AtomicU64, Ordering};

use feed::draft::NewRecord;
use feed::record::Record;
use foundation::geo::GeoPoint;
use tokio::sync::{mpsc, watch, Mutex};

use crate::services::{
    system_now, AuthError, BoxFuture, DeviceLocator, LocationError, RecordStore, SessionProvider,
    SnapshotReceiver, StoreError,
};
use crate::session::Session;

const SNAPSHOT_BUFFER: usize = 16;

/// Identity provider that mints sessions locally.
pub struct MemorySessionProvider {
    next_id: AtomicU64,
    profile_name: String,
    federated_error: Option<AuthError>,
    sessions: watch::Sender<Option<Session>>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        Self::with_profile("Demo User")
    }

    /// Use a specific display name for federated sign-ins.
    pub fn with_profile(name: &str) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            next_id: AtomicU64::new(1),
            profile_name: name.to_string(),
            federated_error: None,
            sessions,
        }
    }

    /// Make every federated sign-in fail with `error` (anonymous sign-in
    /// keeps working), to exercise the popup-failure path.
    pub fn with_federated_error(error: AuthError) -> Self {
        Self {
            federated_error: Some(error),
            ..Self::new()
        }
    }

    fn issue(&self, prefix: &str, is_anonymous: bool, display_name: Option<String>) -> Session {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session {
            id: format!("{prefix}-{n}"),
            is_anonymous,
            display_name,
            avatar_url: None,
        };
        self.sessions.send_replace(Some(session.clone()));
        session
    }
}

impl Default for MemorySessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for MemorySessionProvider {
    fn sign_in_anonymous(&self) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(async move { Ok(self.issue("guest", true, None)) })
    }

    fn sign_in_custom_token(&self, token: String) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(async move {
            if token.trim().is_empty() {
                return Err(AuthError::with_code("auth/invalid-token", "empty token"));
            }
            let session = Session {
                id: format!("token-{token}"),
                is_anonymous: false,
                display_name: None,
                avatar_url: None,
            };
            self.sessions.send_replace(Some(session.clone()));
            Ok(session)
        })
    }

    fn sign_in_federated(&self) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(async move {
            if let Some(error) = &self.federated_error {
                return Err(error.clone());
            }
            Ok(self.issue("member", false, Some(self.profile_name.clone())))
        })
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            self.sessions.send_replace(None);
            Ok(())
        })
    }

    fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}

struct StoreInner {
    records: Vec<Record>,
    subscribers: Vec<mpsc::Sender<Vec<Record>>>,
}

/// Document store that lives on the heap.
pub struct MemoryRecordStore {
    inner: Mutex<StoreInner>,
    next_id: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                records: Vec::new(),
                subscribers: Vec::new(),
            }),
            next_id: AtomicU64::new(1),
        }
    }

    /// Preload records (demo mode), notifying subscribers.
    pub async fn seed(&self, records: Vec<Record>) {
        let mut inner = self.inner.lock().await;
        inner.records = records;
        Self::broadcast(&mut inner).await;
    }

    async fn broadcast(inner: &mut StoreInner) {
        let snapshot = inner.records.clone();
        let mut alive = Vec::with_capacity(inner.subscribers.len());
        for tx in inner.subscribers.drain(..) {
            if tx.send(snapshot.clone()).await.is_ok() {
                alive.push(tx);
            }
        }
        inner.subscribers = alive;
    }
}

impl Default for MemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryRecordStore {
    fn append(&self, record: NewRecord) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            let n = self.next_id.fetch_add(1, Ordering::Relaxed);
            inner.records.push(Record {
                id: format!("mem-{n}"),
                text: record.text,
                lat: record.lat,
                lng: record.lng,
                created_at: Some(system_now()),
                author_id: record.author_id,
                is_anonymous: record.is_anonymous,
                author_name: record.author_name,
            });
            Self::broadcast(&mut inner).await;
            Ok(())
        })
    }

    fn subscribe(&self) -> BoxFuture<'_, Result<SnapshotReceiver, StoreError>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().await;
            let (tx, rx) = mpsc::channel(SNAPSHOT_BUFFER);
            // The live query answers with the current contents right away.
            let _ = tx.send(inner.records.clone()).await;
            inner.subscribers.push(tx);
            Ok(rx)
        })
    }
}

/// Locator with a known position (deployment override, tests).
pub struct FixedLocator(pub GeoPoint);

impl DeviceLocator for FixedLocator {
    fn locate(&self) -> BoxFuture<'_, Result<GeoPoint, LocationError>> {
        Box::pin(async move { Ok(self.0) })
    }
}

/// Locator that simulates a denied permission prompt.
pub struct DeniedLocator;

impl DeviceLocator for DeniedLocator {
    fn locate(&self) -> BoxFuture<'_, Result<GeoPoint, LocationError>> {
        Box::pin(async { Err(LocationError::Denied) })
    }
}

#[cfg(test)]
mod tests {
    use super::{DeniedLocator, FixedLocator, MemoryRecordStore, MemorySessionProvider};
    use crate::services::{DeviceLocator, LocationError, RecordStore, SessionProvider};
    use feed::draft::NewRecord;
    use foundation::geo::GeoPoint;

    fn new_record(text: &str) -> NewRecord {
        NewRecord {
            text: text.into(),
            lat: 1.0,
            lng: 2.0,
            author_id: "u1".into(),
            is_anonymous: true,
            author_name: None,
        }
    }

    #[tokio::test]
    async fn subscribe_delivers_the_current_snapshot_first() {
        let store = MemoryRecordStore::new();
        store.append(new_record("before")).await.unwrap();

        let mut rx = store.subscribe().await.unwrap();
        let initial = rx.recv().await.unwrap();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].text, "before");
    }

    #[tokio::test]
    async fn every_append_pushes_a_full_snapshot() {
        let store = MemoryRecordStore::new();
        let mut rx = store.subscribe().await.unwrap();
        assert!(rx.recv().await.unwrap().is_empty());

        store.append(new_record("one")).await.unwrap();
        store.append(new_record("two")).await.unwrap();

        assert_eq!(rx.recv().await.unwrap().len(), 1);
        let snapshot = rx.recv().await.unwrap();
        assert_eq!(snapshot.len(), 2);
        // Server-side fields are assigned on append.
        assert!(snapshot.iter().all(|r| r.created_at.is_some()));
        assert!(snapshot.iter().all(|r| r.id.starts_with("mem-")));
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned() {
        let store = MemoryRecordStore::new();
        let rx = store.subscribe().await.unwrap();
        drop(rx);
        // Must not error or wedge with a dead subscriber in the list.
        store.append(new_record("after")).await.unwrap();

        let mut rx2 = store.subscribe().await.unwrap();
        assert_eq!(rx2.recv().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn session_lifecycle_is_observable() {
        let provider = MemorySessionProvider::with_profile("Sam");
        let mut watch = provider.watch_session();
        assert!(watch.borrow().is_none());

        let guest = provider.sign_in_anonymous().await.unwrap();
        assert!(guest.is_anonymous);
        assert_eq!(watch.borrow_and_update().as_ref(), Some(&guest));

        let member = provider.sign_in_federated().await.unwrap();
        assert!(!member.is_anonymous);
        assert_eq!(member.display_name.as_deref(), Some("Sam"));
        assert_ne!(member.id, guest.id);

        provider.sign_out().await.unwrap();
        assert!(watch.borrow_and_update().is_none());
    }

    #[tokio::test]
    async fn federated_failure_leaves_the_current_session_alone() {
        let provider = MemorySessionProvider::with_federated_error(
            crate::services::AuthError::with_code("auth/unauthorized-domain", "domain not allowed"),
        );
        let guest = provider.sign_in_anonymous().await.unwrap();

        let err = provider.sign_in_federated().await.unwrap_err();
        assert_eq!(err.code.as_deref(), Some("auth/unauthorized-domain"));
        assert_eq!(
            provider.watch_session().borrow().as_ref(),
            Some(&guest),
            "a failed sign-in must not replace the session"
        );
    }

    #[tokio::test]
    async fn locators_resolve_and_deny() {
        let fixed = FixedLocator(GeoPoint::new(48.0, 11.0));
        assert_eq!(fixed.locate().await.unwrap(), GeoPoint::new(48.0, 11.0));
        assert_eq!(DeniedLocator.locate().await, Err(LocationError::Denied));
    }
}

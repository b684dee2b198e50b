//! Remote implementations of the service seams.
//!
//! REST for one-shot calls (sign-in, sign-out, record append) and a
//! WebSocket for the long-lived snapshot subscription. There is no retry
//! or backoff here on purpose: the hosted backend owns delivery semantics,
//! and a failed call is reported once and dropped.

use feed::draft::NewRecord;
use feed::record::Record;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::protocol::{ClientMessage, ServerMessage, WireAuthError, WireNewRecord, WireSession};
use crate::services::{
    AuthError, BoxFuture, DeviceLocator, LocationError, RecordStore, SessionProvider,
    SnapshotReceiver, StoreError,
};
use crate::session::Session;
use foundation::geo::GeoPoint;

/// Where the hosted backend lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// REST base, e.g. `https://backend.example`.
    pub base_url: String,
    /// Subscription endpoint, e.g. `wss://backend.example/v1/stream`.
    pub ws_url: String,
    pub app_id: String,
    pub collection: String,
}

impl RemoteConfig {
    fn auth_url(&self, action: &str) -> String {
        format!(
            "{}/v1/apps/{}/auth/{action}",
            self.base_url.trim_end_matches('/'),
            self.app_id
        )
    }

    fn records_url(&self) -> String {
        format!(
            "{}/v1/apps/{}/collections/{}/records",
            self.base_url.trim_end_matches('/'),
            self.app_id,
            self.collection
        )
    }
}

/// Identity service client.
pub struct RemoteSessionProvider {
    http: reqwest::Client,
    config: RemoteConfig,
    sessions: watch::Sender<Option<Session>>,
}

impl RemoteSessionProvider {
    pub fn new(config: RemoteConfig) -> Self {
        let (sessions, _) = watch::channel(None);
        Self {
            http: reqwest::Client::new(),
            config,
            sessions,
        }
    }

    async fn exchange(&self, url: String, body: serde_json::Value) -> Result<Session, AuthError> {
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AuthError::new(format!("identity service unreachable: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the provider's structured error when it sends one.
            return Err(match response.json::<WireAuthError>().await {
                Ok(wire) => AuthError {
                    code: wire.code,
                    message: wire.message,
                },
                Err(_) => AuthError::new(format!("sign-in failed with status {status}")),
            });
        }

        let wire: WireSession = response
            .json()
            .await
            .map_err(|err| AuthError::new(format!("malformed session document: {err}")))?;
        let session: Session = wire.into();
        self.sessions.send_replace(Some(session.clone()));
        Ok(session)
    }
}

impl SessionProvider for RemoteSessionProvider {
    fn sign_in_anonymous(&self) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(self.exchange(self.config.auth_url("anonymous"), serde_json::json!({})))
    }

    fn sign_in_custom_token(&self, token: String) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(self.exchange(
            self.config.auth_url("token"),
            serde_json::json!({ "token": token }),
        ))
    }

    fn sign_in_federated(&self) -> BoxFuture<'_, Result<Session, AuthError>> {
        Box::pin(self.exchange(self.config.auth_url("federated"), serde_json::json!({})))
    }

    fn sign_out(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async move {
            let response = self
                .http
                .post(self.config.auth_url("signout"))
                .send()
                .await
                .map_err(|err| AuthError::new(format!("identity service unreachable: {err}")))?;
            response
                .error_for_status()
                .map_err(|err| AuthError::new(format!("sign-out rejected: {err}")))?;
            self.sessions.send_replace(None);
            Ok(())
        })
    }

    fn watch_session(&self) -> watch::Receiver<Option<Session>> {
        self.sessions.subscribe()
    }
}

/// Document store client.
pub struct RemoteRecordStore {
    http: reqwest::Client,
    config: RemoteConfig,
}

impl RemoteRecordStore {
    pub fn new(config: RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl RecordStore for RemoteRecordStore {
    fn append(&self, record: NewRecord) -> BoxFuture<'_, Result<(), StoreError>> {
        Box::pin(async move {
            let response = self
                .http
                .post(self.config.records_url())
                .json(&WireNewRecord::from(record))
                .send()
                .await
                .map_err(|err| StoreError::with_source("record append failed", err))?;
            response
                .error_for_status()
                .map_err(|err| StoreError::with_source("record append rejected", err))?;
            Ok(())
        })
    }

    fn subscribe(&self) -> BoxFuture<'_, Result<SnapshotReceiver, StoreError>> {
        let ws_url = self.config.ws_url.clone();
        let collection = self.config.collection.clone();
        Box::pin(async move {
            let subscription_id = uuid::Uuid::new_v4().to_string();
            let (ws, _) = connect_async(ws_url.as_str())
                .await
                .map_err(|err| StoreError::with_source("subscription connect failed", err))?;
            let (mut write, mut read) = ws.split();

            let subscribe = serde_json::to_string(&ClientMessage::Subscribe {
                collection: collection.clone(),
            })
            .map_err(|err| StoreError::with_source("subscribe encode failed", err))?;
            write
                .send(Message::Text(subscribe))
                .await
                .map_err(|err| StoreError::with_source("subscribe send failed", err))?;

            let (tx, rx) = mpsc::channel(8);
            tokio::spawn(async move {
                while let Some(frame) = read.next().await {
                    let text = match frame {
                        Ok(Message::Text(text)) => text,
                        Ok(Message::Close(_)) => break,
                        Ok(_) => continue,
                        Err(err) => {
                            warn!(%subscription_id, %err, "subscription stream error");
                            break;
                        }
                    };

                    match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(ServerMessage::Snapshot {
                            collection: c,
                            records,
                        }) if c == collection => {
                            let records: Vec<Record> =
                                records.into_iter().map(Record::from).collect();
                            // Receiver dropped means the view is gone;
                            // stop pushing instead of buffering forever.
                            if tx.send(records).await.is_err() {
                                break;
                            }
                        }
                        Ok(ServerMessage::Snapshot { .. }) => {}
                        Ok(ServerMessage::Hello { session_id, .. }) => {
                            debug!(%subscription_id, %session_id, "subscription established");
                        }
                        Ok(ServerMessage::Pong { .. }) => {}
                        Ok(ServerMessage::Error { code, message }) => {
                            warn!(%code, %message, "server error on subscription");
                        }
                        Err(err) => warn!(%err, "undecodable server message"),
                    }
                }
                info!(%subscription_id, "subscription closed");
            });

            Ok(rx)
        })
    }
}

/// Locator that always reports the device as unable to resolve a position.
///
/// The desktop build has no geolocation hardware interface; deployments
/// can inject a fixed position instead (see `memory::FixedLocator`).
pub struct UnavailableLocator;

impl DeviceLocator for UnavailableLocator {
    fn locate(&self) -> BoxFuture<'_, Result<GeoPoint, LocationError>> {
        Box::pin(async { Err(LocationError::Unavailable) })
    }
}

//! Wire protocol for the hosted backend.
//!
//! Documents travel camelCase, matching the store's JSON. The subscription
//! channel speaks tagged snake_case messages:
//! - client -> server: subscribe to a collection, keepalive pings
//! - server -> client: hello, full snapshots on every change, pongs, errors
//!
//! There is no delta encoding; a snapshot always replaces everything.

use feed::draft::NewRecord;
use feed::record::Record;
use foundation::time::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored record as the backend serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecord {
    pub id: String,
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    pub author_id: String,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl From<WireRecord> for Record {
    fn from(wire: WireRecord) -> Self {
        Record {
            id: wire.id,
            text: wire.text,
            lat: wire.lat,
            lng: wire.lng,
            created_at: wire.created_at.map(Timestamp::new),
            author_id: wire.author_id,
            is_anonymous: wire.is_anonymous,
            author_name: wire.author_name,
        }
    }
}

impl From<Record> for WireRecord {
    fn from(record: Record) -> Self {
        WireRecord {
            id: record.id,
            text: record.text,
            lat: record.lat,
            lng: record.lng,
            created_at: record.created_at.map(Timestamp::millis),
            author_id: record.author_id,
            is_anonymous: record.is_anonymous,
            author_name: record.author_name,
        }
    }
}

/// An append request; the server fills in id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNewRecord {
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub author_id: String,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
}

impl From<NewRecord> for WireNewRecord {
    fn from(record: NewRecord) -> Self {
        WireNewRecord {
            text: record.text,
            lat: record.lat,
            lng: record.lng,
            author_id: record.author_id,
            is_anonymous: record.is_anonymous,
            author_name: record.author_name,
        }
    }
}

/// The session document as the identity service serializes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSession {
    pub id: String,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<WireSession> for crate::session::Session {
    fn from(wire: WireSession) -> Self {
        crate::session::Session {
            id: wire.id,
            is_anonymous: wire.is_anonymous,
            display_name: wire.display_name,
            avatar_url: wire.avatar_url,
        }
    }
}

/// Identity-service error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireAuthError {
    #[serde(default)]
    pub code: Option<String>,
    pub message: String,
}

/// Message from client to server on the subscription channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Open the live query for a collection.
    Subscribe { collection: String },

    /// Keepalive.
    Ping { seq: u64 },
}

/// Message from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Subscription established.
    Hello {
        session_id: String,
        server_version: String,
    },

    /// The complete, unordered collection contents.
    Snapshot {
        collection: String,
        records: Vec<WireRecord>,
    },

    /// Keepalive response.
    Pong { seq: u64 },

    /// Non-fatal server-side error.
    Error { code: String, message: String },
}

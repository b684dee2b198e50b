mod admin;
mod app;
mod config;
mod hud;

use std::time::Duration;

use feed::record::Record;
use foundation::time::{DAY_MS, Timestamp};
use sync::memory::{DeniedLocator, FixedLocator, MemoryRecordStore, MemorySessionProvider};
use sync::remote::{RemoteRecordStore, RemoteSessionProvider, UnavailableLocator};
use sync::services::{system_now, DeviceLocator, RecordStore, SessionProvider};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app::{App, FRAME_DT_S};
use crate::config::Config;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    info!(
        offline = config.offline(),
        collection = %config.collection,
        "starting viewer"
    );

    let (sessions, store, locator) = build_services(&config).await;
    let mut app = App::new(sessions, store, locator);
    let mut session_watch = app.watch_session();

    let mut snapshots = match app.start(config.auth_token.clone()).await {
        Ok(rx) => rx,
        Err(err) => {
            error!(%err, "record subscription failed");
            return;
        }
    };

    let mut ticker = tokio::time::interval(Duration::from_secs_f64(FRAME_DT_S));
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let output = app.tick();
                if let Some(focus) = output.transitioned {
                    info!(lat = focus.lat_deg, lng = focus.lng_deg, "zoomed to surface");
                }
                for event in app.drain_events() {
                    debug!(frame = event.frame_index, kind = event.kind, "{}", event.message);
                }
            }
            snapshot = snapshots.recv() => {
                match snapshot {
                    Some(records) => app.apply_snapshot(records),
                    None => {
                        warn!("record subscription ended");
                        break;
                    }
                }
            }
            changed = session_watch.changed() => {
                if changed.is_ok() {
                    let session = session_watch.borrow_and_update().clone();
                    app.on_session(session);
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                break;
            }
        }
    }

    // Teardown order matters: close the subscription before the scene goes
    // away so no in-flight snapshot lands on a detached surface.
    drop(snapshots);
    for event in app.drain_events() {
        debug!(frame = event.frame_index, kind = event.kind, "{}", event.message);
    }
}

async fn build_services(
    config: &Config,
) -> (
    Box<dyn SessionProvider>,
    Box<dyn RecordStore>,
    Box<dyn DeviceLocator>,
) {
    let locator: Box<dyn DeviceLocator> = match config.fixed_location {
        Some(position) => Box::new(FixedLocator(position)),
        None if config.offline() => Box::new(DeniedLocator),
        None => Box::new(UnavailableLocator),
    };

    match config.remote() {
        Some(remote) => {
            info!(base = %remote.base_url, "using hosted backend");
            (
                Box::new(RemoteSessionProvider::new(remote.clone())),
                Box::new(RemoteRecordStore::new(remote)),
                locator,
            )
        }
        None => {
            info!("no backend configured; running on in-memory services");
            let store = MemoryRecordStore::new();
            store.seed(demo_records()).await;
            (
                Box::new(MemorySessionProvider::new()),
                Box::new(store),
                locator,
            )
        }
    }
}

/// A few confessions so the offline globe is not empty.
fn demo_records() -> Vec<Record> {
    let now = system_now().millis();
    let record = |id: &str, text: &str, lat: f64, lng: f64, age_ms: i64| Record {
        id: id.to_string(),
        text: text.to_string(),
        lat,
        lng,
        created_at: Some(Timestamp::new(now - age_ms)),
        author_id: "seed".to_string(),
        is_anonymous: true,
        author_name: None,
    };
    vec![
        record(
            "seed-1",
            "we met on the night train to Lisbon",
            38.72,
            -9.14,
            2 * 60 * 60 * 1000,
        ),
        record(
            "seed-2",
            "still think about the cherry blossoms",
            35.01,
            135.77,
            8 * 60 * 60 * 1000,
        ),
        record(
            "seed-3",
            "married on this beach twenty years ago",
            -8.71,
            115.17,
            20 * 60 * 60 * 1000,
        ),
        // Older than the live window; only visible in a member's history.
        record("seed-4", "the one that got away", 40.71, -74.0, 3 * DAY_MS),
    ]
}

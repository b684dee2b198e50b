use std::env;

use foundation::geo::GeoPoint;
use sync::remote::RemoteConfig;

/// Viewer configuration, all from environment variables.
///
/// With no backend URL the viewer runs on the in-memory services: same
/// composition, no network.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend_url: Option<String>,
    pub ws_url: Option<String>,
    pub app_id: String,
    pub collection: String,
    pub auth_token: Option<String>,
    pub fixed_location: Option<GeoPoint>,
}

impl Config {
    pub fn from_env() -> Self {
        let backend_url = env::var("LOVENET_BACKEND_URL").ok();
        let ws_url = env::var("LOVENET_WS_URL").ok();
        let fixed_location = match (
            env_var_f64("LOVENET_DEVICE_LAT"),
            env_var_f64("LOVENET_DEVICE_LNG"),
        ) {
            (Some(lat), Some(lng)) => Some(GeoPoint::new(lat, lng)),
            _ => None,
        };

        Self {
            backend_url,
            ws_url,
            app_id: env::var("LOVENET_APP_ID").unwrap_or_else(|_| "default-app".to_string()),
            collection: env::var("LOVENET_COLLECTION")
                .unwrap_or_else(|_| "global-confessions".to_string()),
            auth_token: env::var("LOVENET_AUTH_TOKEN").ok(),
            fixed_location,
        }
    }

    pub fn offline(&self) -> bool {
        self.backend_url.is_none()
    }

    /// Remote endpoints, when a backend is configured. The WS URL defaults
    /// to the REST host with the stream path when not set explicitly.
    pub fn remote(&self) -> Option<RemoteConfig> {
        let base_url = self.backend_url.clone()?;
        let ws_url = self.ws_url.clone().unwrap_or_else(|| {
            let stripped = base_url
                .trim_end_matches('/')
                .replacen("https://", "wss://", 1)
                .replacen("http://", "ws://", 1);
            format!("{stripped}/v1/stream")
        });
        Some(RemoteConfig {
            base_url,
            ws_url,
            app_id: self.app_id.clone(),
            collection: self.collection.clone(),
        })
    }
}

fn env_var_f64(name: &str) -> Option<f64> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::Config;

    fn base_config() -> Config {
        Config {
            backend_url: None,
            ws_url: None,
            app_id: "default-app".into(),
            collection: "global-confessions".into(),
            auth_token: None,
            fixed_location: None,
        }
    }

    #[test]
    fn no_backend_means_offline() {
        let config = base_config();
        assert!(config.offline());
        assert!(config.remote().is_none());
    }

    #[test]
    fn ws_url_is_derived_from_the_backend_url() {
        let config = Config {
            backend_url: Some("https://backend.example/".into()),
            ..base_config()
        };
        let remote = config.remote().unwrap();
        assert_eq!(remote.ws_url, "wss://backend.example/v1/stream");
    }

    #[test]
    fn explicit_ws_url_wins() {
        let config = Config {
            backend_url: Some("https://backend.example".into()),
            ws_url: Some("wss://stream.example/feed".into()),
            ..base_config()
        };
        assert_eq!(config.remote().unwrap().ws_url, "wss://stream.example/feed");
    }
}

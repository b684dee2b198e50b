use feed::counters::StatCounts;
use feed::filter::FilterMode;
use sync::session::Session;

/// Everything the HUD overlay needs for one paint.
#[derive(Debug, Clone, PartialEq)]
pub struct HudModel {
    pub title: &'static str,
    pub mode_label: &'static str,
    pub badge: String,
    pub signed_in: bool,
    pub counts: StatCounts,
    pub loading: bool,
    pub alert: Option<String>,
}

impl HudModel {
    pub fn compose(
        session: Option<&Session>,
        filter: FilterMode,
        counts: StatCounts,
        loading: bool,
        alert: Option<String>,
    ) -> Self {
        let signed_in = session.map(|s| !s.is_anonymous).unwrap_or(false);
        let badge = session
            .map(|s| s.badge_label().to_string())
            .unwrap_or_else(|| "Connecting".to_string());
        Self {
            title: "love.net",
            mode_label: match filter {
                FilterMode::Live => "LIVE HEARTBEAT",
                FilterMode::History => "MY CONSTELLATION",
            },
            badge,
            signed_in,
            counts,
            loading,
            alert,
        }
    }
}

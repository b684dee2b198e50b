use feed::filter::ViewerIdentity;

/// The identity the session provider currently vouches for.
///
/// The app only observes transitions; it never mutates a session. The
/// provider moves sessions anonymous -> federated -> (after sign-out) a
/// fresh anonymous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub is_anonymous: bool,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl Session {
    pub fn viewer_identity(&self) -> ViewerIdentity {
        ViewerIdentity {
            id: self.id.clone(),
            is_anonymous: self.is_anonymous,
        }
    }

    /// Short label for the HUD badge.
    pub fn badge_label(&self) -> &str {
        if self.is_anonymous {
            return "Guest Session";
        }
        self.display_name.as_deref().unwrap_or("User")
    }
}

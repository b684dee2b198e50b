use foundation::geo::{GeoPoint, normalize_lng_deg};
use rand::Rng;

use crate::record::MAX_TEXT_CHARS;

/// Degrees of random offset applied to every submission, so a coordinate
/// never pinpoints a device exactly.
const JITTER_DEG: f64 = 0.005;

/// Latitude band for the randomized fallback placement. Slightly narrower
/// than the full range so fallback hearts stay off the polar caps.
const FALLBACK_LAT_DEG: f64 = 80.0;

/// User input captured by the submission form, before validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub text: String,
    pub author_name: String,
    pub anonymous: bool,
}

/// A validated record ready to be appended to the store.
///
/// `id` and `created_at` are intentionally absent: the store assigns both.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub author_id: String,
    pub is_anonymous: bool,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    EmptyText,
    TextTooLong { chars: usize },
    MissingName,
}

impl std::fmt::Display for DraftError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DraftError::EmptyText => write!(f, "confession text is empty"),
            DraftError::TextTooLong { chars } => {
                write!(f, "confession text too long: {chars} chars (max {MAX_TEXT_CHARS})")
            }
            DraftError::MissingName => write!(f, "attributed confession needs a name"),
        }
    }
}

impl std::error::Error for DraftError {}

impl RecordDraft {
    /// Validate and place the draft.
    ///
    /// Placement: the device location when one was resolved, otherwise a
    /// uniformly random point; either way a small jitter is applied and
    /// longitude is renormalized.
    ///
    /// Validation rejects before any coordinate work, so a rejected draft
    /// can never reach the store.
    pub fn compose(
        &self,
        author_id: &str,
        location: Option<GeoPoint>,
    ) -> Result<NewRecord, DraftError> {
        self.compose_with_rng(author_id, location, &mut rand::thread_rng())
    }

    pub fn compose_with_rng<R: Rng>(
        &self,
        author_id: &str,
        location: Option<GeoPoint>,
        rng: &mut R,
    ) -> Result<NewRecord, DraftError> {
        if self.text.trim().is_empty() {
            return Err(DraftError::EmptyText);
        }
        let chars = self.text.chars().count();
        if chars > MAX_TEXT_CHARS {
            return Err(DraftError::TextTooLong { chars });
        }
        if !self.anonymous && self.author_name.trim().is_empty() {
            return Err(DraftError::MissingName);
        }

        let base = location.unwrap_or_else(|| GeoPoint {
            lat_deg: rng.gen_range(-FALLBACK_LAT_DEG..FALLBACK_LAT_DEG),
            lng_deg: rng.gen_range(-180.0..180.0),
        });
        let lat = (base.lat_deg + rng.gen_range(-JITTER_DEG..JITTER_DEG)).clamp(-90.0, 90.0);
        let lng = normalize_lng_deg(base.lng_deg + rng.gen_range(-JITTER_DEG..JITTER_DEG));

        Ok(NewRecord {
            text: self.text.clone(),
            lat,
            lng,
            author_id: author_id.to_string(),
            is_anonymous: self.anonymous,
            author_name: if self.anonymous {
                None
            } else {
                Some(self.author_name.clone())
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{DraftError, JITTER_DEG, RecordDraft};
    use foundation::geo::GeoPoint;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn anonymous_draft(text: &str) -> RecordDraft {
        RecordDraft {
            text: text.into(),
            author_name: String::new(),
            anonymous: true,
        }
    }

    #[test]
    fn empty_text_is_rejected() {
        let err = anonymous_draft("").compose_with_rng("u1", None, &mut rng());
        assert_eq!(err, Err(DraftError::EmptyText));
        let err = anonymous_draft("   \n\t").compose_with_rng("u1", None, &mut rng());
        assert_eq!(err, Err(DraftError::EmptyText));
    }

    #[test]
    fn overlong_text_is_rejected() {
        let long = "x".repeat(281);
        let err = anonymous_draft(&long).compose_with_rng("u1", None, &mut rng());
        assert_eq!(err, Err(DraftError::TextTooLong { chars: 281 }));
    }

    #[test]
    fn attributed_draft_requires_a_name() {
        let draft = RecordDraft {
            text: "under the old bridge".into(),
            author_name: "  ".into(),
            anonymous: false,
        };
        let err = draft.compose_with_rng("u1", None, &mut rng());
        assert_eq!(err, Err(DraftError::MissingName));
    }

    #[test]
    fn device_location_is_used_with_jitter() {
        let here = GeoPoint::new(40.0, -74.0);
        let new = anonymous_draft("rooftop at dawn")
            .compose_with_rng("u1", Some(here), &mut rng())
            .unwrap();
        assert!((new.lat - 40.0).abs() <= JITTER_DEG);
        assert!((new.lng - -74.0).abs() <= JITTER_DEG);
    }

    #[test]
    fn missing_location_falls_back_to_a_random_point() {
        let new = anonymous_draft("no gps here")
            .compose_with_rng("u1", None, &mut rng())
            .unwrap();
        assert!(new.lat >= -90.0 && new.lat <= 90.0);
        assert!(new.lng >= -180.0 && new.lng < 180.0);
    }

    #[test]
    fn anonymity_strips_the_author_name() {
        let draft = RecordDraft {
            text: "kept this one to myself".into(),
            author_name: "Sam".into(),
            anonymous: true,
        };
        let new = draft.compose_with_rng("u1", None, &mut rng()).unwrap();
        assert!(new.is_anonymous);
        assert_eq!(new.author_name, None);

        let attributed = RecordDraft {
            anonymous: false,
            ..draft
        };
        let new = attributed.compose_with_rng("u1", None, &mut rng()).unwrap();
        assert_eq!(new.author_name.as_deref(), Some("Sam"));
    }
}

use foundation::geo::GeoPoint;
use foundation::time::Timestamp;

/// Maximum confession length in characters.
pub const MAX_TEXT_CHARS: usize = 280;

/// One user-submitted geo-tagged confession.
///
/// Records are immutable once created; there is no edit or delete path. The
/// store assigns `id` and `created_at`; a record observed before the server
/// acknowledged it has `created_at == None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: String,
    pub text: String,
    pub lat: f64,
    pub lng: f64,
    pub created_at: Option<Timestamp>,
    pub author_id: String,
    pub is_anonymous: bool,
    pub author_name: Option<String>,
}

impl Record {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

use foundation::time::{DAY_MS, Timestamp};

use crate::record::Record;
use crate::set::RecordSet;

/// Which slice of the record set the viewer is looking at.
///
/// `Live` is the public feed: everything acknowledged in the last 24 hours,
/// regardless of author. `History` is the viewer's own submissions,
/// unconstrained by age, and only meaningful for an attributed session.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    Live,
    History,
}

impl FilterMode {
    /// Apply the session guard: an anonymous viewer has no history, so
    /// `History` degrades to `Live` rather than showing someone else's.
    pub fn guarded(self, viewer_is_anonymous: bool) -> FilterMode {
        match self {
            FilterMode::History if viewer_is_anonymous => FilterMode::Live,
            other => other,
        }
    }
}

/// The identity a filter evaluates against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerIdentity {
    pub id: String,
    pub is_anonymous: bool,
}

/// Select the records visible under the given mode.
///
/// This is a pure function of the full set: switching modes or sessions
/// recomputes from scratch, never patches a previous result, so stale
/// markers cannot survive a toggle.
///
/// `Live` excludes records the server has not timestamped yet; they appear
/// once acknowledged.
pub fn visible_records<'a>(
    set: &'a RecordSet,
    mode: FilterMode,
    viewer: &ViewerIdentity,
    now: Timestamp,
) -> Vec<&'a Record> {
    match mode.guarded(viewer.is_anonymous) {
        FilterMode::History => set
            .records()
            .iter()
            .filter(|r| r.author_id == viewer.id)
            .collect(),
        FilterMode::Live => set
            .records()
            .iter()
            .filter(|r| match r.created_at {
                Some(at) => at.within(now, DAY_MS),
                None => false,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{FilterMode, ViewerIdentity, visible_records};
    use crate::record::Record;
    use crate::set::RecordSet;
    use foundation::time::{DAY_MS, Timestamp};

    fn record(id: &str, author: &str, created_at: Option<i64>) -> Record {
        Record {
            id: id.into(),
            text: "t".into(),
            lat: 0.0,
            lng: 0.0,
            created_at: created_at.map(Timestamp::new),
            author_id: author.into(),
            is_anonymous: true,
            author_name: None,
        }
    }

    fn ids(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.clone()).collect()
    }

    fn sample_set(now_ms: i64) -> RecordSet {
        let mut set = RecordSet::new();
        set.apply_snapshot(vec![
            record("fresh-mine", "me", Some(now_ms - 1_000)),
            record("fresh-theirs", "them", Some(now_ms - DAY_MS + 60_000)),
            record("stale-mine", "me", Some(now_ms - DAY_MS * 30)),
            record("unacked-mine", "me", None),
        ]);
        set
    }

    #[test]
    fn live_is_bounded_by_age_and_acknowledgement() {
        let now = Timestamp::new(DAY_MS * 100);
        let set = sample_set(now.millis());
        let viewer = ViewerIdentity {
            id: "me".into(),
            is_anonymous: true,
        };
        let visible = visible_records(&set, FilterMode::Live, &viewer, now);
        assert_eq!(ids(&visible), vec!["fresh-mine", "fresh-theirs"]);
        for r in &visible {
            let at = r.created_at.expect("live records are acknowledged");
            assert!(at.age_ms(now) < DAY_MS);
        }
    }

    #[test]
    fn history_spans_all_ages_for_the_author_only() {
        let now = Timestamp::new(DAY_MS * 100);
        let set = sample_set(now.millis());
        let viewer = ViewerIdentity {
            id: "me".into(),
            is_anonymous: false,
        };
        let visible = visible_records(&set, FilterMode::History, &viewer, now);
        assert_eq!(ids(&visible), vec!["fresh-mine", "stale-mine", "unacked-mine"]);
    }

    #[test]
    fn anonymous_viewer_never_sees_history() {
        let now = Timestamp::new(DAY_MS * 100);
        let set = sample_set(now.millis());
        let viewer = ViewerIdentity {
            id: "me".into(),
            is_anonymous: true,
        };
        let history = visible_records(&set, FilterMode::History, &viewer, now);
        let live = visible_records(&set, FilterMode::Live, &viewer, now);
        assert_eq!(ids(&history), ids(&live));
        assert_eq!(FilterMode::History.guarded(true), FilterMode::Live);
        assert_eq!(FilterMode::History.guarded(false), FilterMode::History);
    }

    #[test]
    fn mode_switch_recomputes_from_the_full_set() {
        let now = Timestamp::new(DAY_MS * 100);
        let mut set = sample_set(now.millis());
        let viewer = ViewerIdentity {
            id: "me".into(),
            is_anonymous: false,
        };

        let before = visible_records(&set, FilterMode::Live, &viewer, now).len();
        // A snapshot arriving between toggles must be fully reflected.
        set.apply_snapshot(vec![record("only", "other", Some(now.millis() - 5_000))]);
        let after = visible_records(&set, FilterMode::Live, &viewer, now);
        assert_ne!(before, after.len());
        assert_eq!(ids(&after), vec!["only"]);
        assert!(visible_records(&set, FilterMode::History, &viewer, now).is_empty());
    }
}

use crate::record::Record;

/// The client's view of the full record collection.
///
/// The store pushes complete snapshots, never deltas, so the only mutation
/// is wholesale replacement. A snapshot is sorted once on arrival and the
/// revision counter bumps, letting views detect change with a single
/// integer compare instead of diffing the set.
///
/// Ordering contract:
/// - Newest acknowledged record first (`created_at` descending).
/// - Unacknowledged records (no server timestamp) sort last.
/// - Ties keep snapshot order (stable sort).
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordSet {
    records: Vec<Record>,
    revision: u64,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire set atomically.
    pub fn apply_snapshot(&mut self, mut records: Vec<Record>) {
        records.sort_by_key(|r| {
            std::cmp::Reverse(r.created_at.map(|t| t.millis()).unwrap_or(i64::MIN))
        });
        self.records = records;
        self.revision += 1;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Bumped on every applied snapshot; never on reads.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Version conflict detection.

use recsync_protocol::{RecordMap, RecordPointer, VersionConflict};

/// Compares record versions between the snapshot a transaction was built
/// against (`original`) and the authoritative one reloaded at commit time
/// (`current`).
///
/// Only `modified` records are checked. A record missing from either map is
/// skipped, not reported. The result is sorted by `(table, id)` and holds at
/// most one entry per record, so it does not depend on the order of
/// `modified`.
pub fn check_conflicts(
    original: &RecordMap,
    current: &RecordMap,
    modified: &[RecordPointer],
) -> Vec<VersionConflict> {
    let mut conflicts: Vec<VersionConflict> = modified
        .iter()
        .filter_map(|pointer| {
            let expected = original.get_pointer(pointer)?;
            let actual = current.get_pointer(pointer)?;
            (expected.version != actual.version).then(|| {
                VersionConflict::new(
                    pointer.table.clone(),
                    pointer.id,
                    expected.version,
                    actual.version,
                )
            })
        })
        .collect();

    conflicts.sort_by(|a, b| (&a.table, a.id).cmp(&(&b.table, b.id)));
    conflicts.dedup();
    conflicts
}

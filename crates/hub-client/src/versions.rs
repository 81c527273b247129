//! Chronological ordering of versions.

use blackduck_resource_core::types::Version;

/// Sorts by `settingUpdatedAt`, oldest first.
///
/// The sort is stable, so versions with equal timestamps keep the order the
/// service returned them in. The last element is the newest version.
pub fn sort_chronologically(versions: &mut [Version]) {
    versions.sort_by(|a, b| a.updated.cmp(&b.updated));
}

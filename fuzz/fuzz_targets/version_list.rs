#![no_main]

use blackduck_resource_client::sort_chronologically;
use blackduck_resource_core::types::VersionList;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(list) = serde_json::from_slice::<VersionList>(data) {
        let mut versions = list.versions;
        let len = versions.len();
        sort_chronologically(&mut versions);
        assert_eq!(versions.len(), len);
        for pair in versions.windows(2) {
            assert!(pair[0].updated <= pair[1].updated);
        }
        for version in &versions {
            let _ = version.to_ref();
        }
    }
});

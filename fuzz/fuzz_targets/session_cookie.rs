#![no_main]

use blackduck_resource_client::auth::{TOKEN_PREFIX, extract_token};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|cookies: Vec<String>| {
    if let Some(token) = extract_token(cookies.iter().map(String::as_str)) {
        let expected = format!("{TOKEN_PREFIX}{token}");
        assert!(
            cookies
                .iter()
                .flat_map(|c| c.split(';'))
                .any(|segment| segment.trim() == expected)
        );
    }
});

#![no_main]

use blackduck_resource_interpreter::{InterpretError, interpret};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(log) = std::str::from_utf8(data) {
        match interpret(log) {
            Ok(scan) => assert!(scan.is_success()),
            Err(InterpretError::ScanFailed { status, scan }) => {
                assert_eq!(scan.status.as_deref(), Some(status.as_str()));
                assert!(!scan.is_success());
            }
            Err(InterpretError::MalformedLine { line, .. }) => assert!(line >= 1),
        }
    }
});

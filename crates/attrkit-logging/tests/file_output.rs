//! Runs in its own binary: installing a subscriber is process-global.

use std::fs;

use attrkit_logging::{AttrkitSubscriberBuilder, LogError, LogFile};
use tempfile::TempDir;

#[test]
fn test_file_sink_and_second_install() {
    let temp_dir = TempDir::new().unwrap();
    let file = LogFile::new(temp_dir.path(), "engine");
    let path = file.path();

    let guard = AttrkitSubscriberBuilder::new()
        .with_level("warn")
        .with_console(None)
        .with_file(file)
        .try_init()
        .unwrap();
    assert!(guard.is_some());

    tracing::warn!(attribute = "label", "Rejected non-callable block assignment");
    drop(guard);

    let contents = fs::read_to_string(&path).unwrap();
    let line: serde_json::Value = serde_json::from_str(contents.lines().next().unwrap()).unwrap();
    assert_eq!(line["level"], "WARN");
    assert_eq!(line["attribute"], "label");
    assert_eq!(line["message"], "Rejected non-callable block assignment");

    let second = AttrkitSubscriberBuilder::new().with_console(None).try_init();
    assert!(matches!(second, Err(LogError::AlreadyInitialized(_))));
}

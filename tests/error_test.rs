//! Error handling tests
//!
//! Failure categories, the user-facing messages they map to, and the
//! folder scan error cases.

use food_scanner::error::{ScannerError, ANALYSIS_FAILED_MESSAGE};
use food_scanner::picker;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

/// Every analysis failure shows the same generic message
#[test]
fn test_analysis_failures_share_message() {
    let errors = [
        ScannerError::Transport("connection reset".into()),
        ScannerError::AnalysisParse("expected value at line 1".into()),
        ScannerError::AnalysisTimeout(Duration::from_secs(60)),
        ScannerError::from(food_scanner_common::Error::EmptyResponse),
    ];

    for err in &errors {
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
        assert!(err.is_analysis_failure());
        assert!(!err.suggests_file_picker());
    }
}

/// Parse and transport failures stay distinguishable in logs
#[test]
fn test_categories_are_distinct() {
    assert_eq!(ScannerError::Transport("x".into()).category(), "transport");
    assert_eq!(ScannerError::AnalysisParse("x".into()).category(), "analysis_parse");
    assert_eq!(
        ScannerError::AnalysisTimeout(Duration::from_secs(1)).category(),
        "analysis_timeout"
    );
    assert_eq!(ScannerError::PermissionDenied("x".into()).category(), "permission_denied");
    assert_eq!(ScannerError::DeviceUnavailable("x".into()).category(), "device_unavailable");
    assert_eq!(ScannerError::StreamNotReady.category(), "stream_not_ready");
    assert_eq!(ScannerError::UnreadableFile("x".into()).category(), "unreadable_file");
}

/// Camera failures point to the file picker, each with its own message
#[test]
fn test_camera_failures() {
    let denied = ScannerError::PermissionDenied("/dev/video0".into());
    let missing = ScannerError::DeviceUnavailable("/dev/video0".into());

    assert!(denied.suggests_file_picker());
    assert!(missing.suggests_file_picker());
    assert_ne!(denied.user_message(), missing.user_message());
    assert_ne!(denied.user_message(), ANALYSIS_FAILED_MESSAGE);
    assert!(!denied.is_analysis_failure());

    assert!(!ScannerError::StreamNotReady.suggests_file_picker());
    assert!(!ScannerError::UnreadableFile("x".into()).is_analysis_failure());
}

/// User messages never leak technical detail
#[test]
fn test_user_message_hides_detail() {
    let err = ScannerError::Transport("tcp connect error: 10.0.0.1:443".into());
    assert!(!err.user_message().contains("10.0.0.1"));
    assert!(err.to_string().contains("10.0.0.1"));
}

#[test]
fn test_missing_api_key_message() {
    let err = ScannerError::MissingApiKey;
    assert!(err.to_string().contains("OPENAI_API_KEY"));
    assert_eq!(err.category(), "config");
}

/// Scanning a folder that does not exist
#[test]
fn test_scan_nonexistent_folder() {
    let result = picker::scan_folder(Path::new("/nonexistent/path/12345"));
    let err = result.unwrap_err();
    assert!(matches!(err, ScannerError::FolderNotFound(_)));
    assert_eq!(err.category(), "folder_not_found");
}

/// An empty folder is not an error
#[test]
fn test_scan_empty_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = picker::scan_folder(dir.path());
    assert!(result.unwrap().is_empty());
}

/// A folder without images
#[test]
fn test_scan_folder_no_images() {
    let dir = tempdir().expect("Failed to create temp dir");
    std::fs::write(dir.path().join("test.txt"), "hello").unwrap();
    std::fs::write(dir.path().join("data.json"), "{}").unwrap();

    let result = picker::scan_folder(dir.path()).unwrap();
    assert!(result.is_empty());
}

/// Passing a file instead of a folder
#[test]
fn test_scan_file_as_folder() {
    let dir = tempdir().expect("Failed to create temp dir");
    let file = dir.path().join("meal.jpg");
    std::fs::write(&file, "dummy").unwrap();

    assert!(matches!(
        picker::scan_folder(&file),
        Err(ScannerError::FolderNotFound(_))
    ));
}

//! Tests for configuration loading.

use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;

use strictly_hanoi_app::HanoiConfig;
use strictly_hanoi_app::strictly_hanoi::DiskCount;

#[test]
fn test_defaults() {
    let config = HanoiConfig::default();
    assert_eq!(config.disk_count().get(), DiskCount::MIN);
    assert_eq!(config.pace(), Duration::from_secs(1));
    assert_eq!(config.database_path(), "strictly_hanoi.db");
}

#[test]
fn test_partial_file_keeps_defaults() {
    let config = HanoiConfig::from_toml("disk_count = 5\n").expect("Parse failed");
    assert_eq!(config.disk_count().get(), 5);
    assert_eq!(*config.solution_pace_ms(), 1000);
}

#[test]
fn test_full_file() {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(
        file,
        "disk_count = 8\nsolution_pace_ms = 250\ndatabase_path = \"scores.db\"\nlog_file = \"hanoi.log\""
    )
    .expect("Write failed");

    let config = HanoiConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(config.disk_count().get(), 8);
    assert_eq!(config.pace(), Duration::from_millis(250));
    assert_eq!(config.database_path(), "scores.db");
    assert_eq!(config.log_file().to_str(), Some("hanoi.log"));
}

#[test]
fn test_out_of_range_disk_count_rejected() {
    assert!(HanoiConfig::from_toml("disk_count = 13").is_err());
    assert!(HanoiConfig::from_toml("disk_count = 2").is_err());
}

#[test]
fn test_zero_pace_rejected() {
    assert!(HanoiConfig::from_toml("solution_pace_ms = 0").is_err());
}

#[test]
fn test_unknown_key_rejected() {
    assert!(HanoiConfig::from_toml("disks = 4").is_err());
}

#[test]
fn test_missing_explicit_file_is_error() {
    let result = HanoiConfig::load(Some(std::path::Path::new("/nonexistent/strictly_hanoi.toml")));
    assert!(result.is_err());
}

#[test]
fn test_setters_chain() {
    let config = HanoiConfig::default()
        .with_solution_pace_ms(40)
        .with_database_path("other.db".to_string());
    assert_eq!(config.pace(), Duration::from_millis(40));
    assert_eq!(config.database_path(), "other.db");
}

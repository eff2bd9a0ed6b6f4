//! Tests for configuration loading and root folder resolution
//!
//! Uses serial_test to prevent environment variable races: tests that touch
//! GAIT_ROOT_FOLDER are marked #[serial] so they never run in parallel.

use gait_common::config::{
    validate_root_folder, OutputFormat, RootFolderResolver, RootSource, TomlConfig,
    ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
#[serial]
fn test_cli_argument_has_highest_priority() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/gait-env-root");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/gait-toml-root")),
        ..TomlConfig::default()
    };

    let resolver = RootFolderResolver::new();
    let (path, source) = resolver
        .resolve(Some(Path::new("/tmp/gait-cli-root")), &config)
        .unwrap();

    assert_eq!(path, PathBuf::from("/tmp/gait-cli-root"));
    assert_eq!(source, RootSource::CommandLine);

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_environment_beats_config_file() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/gait-env-root");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/gait-toml-root")),
        ..TomlConfig::default()
    };

    let (path, source) = RootFolderResolver::new().resolve(None, &config).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/gait-env-root"));
    assert_eq!(source, RootSource::Environment);

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_blank_environment_value_is_ignored() {
    env::set_var(ROOT_FOLDER_ENV, "   ");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/gait-toml-root")),
        ..TomlConfig::default()
    };

    let (path, source) = RootFolderResolver::new().resolve(None, &config).unwrap();
    assert_eq!(path, PathBuf::from("/tmp/gait-toml-root"));
    assert_eq!(source, RootSource::ConfigFile);

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_no_source_resolves_to_none() {
    env::remove_var(ROOT_FOLDER_ENV);
    let resolved = RootFolderResolver::new().resolve(None, &TomlConfig::default());
    assert!(resolved.is_none());
}

#[test]
fn test_load_explicit_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gait.toml");
    std::fs::write(
        &path,
        "day_count = 3\ntrials_per_side = 4\noutput_format = \"csv\"\n",
    )
    .unwrap();

    let config = TomlConfig::load(Some(&path)).unwrap();
    assert_eq!(config.day_count, 3);
    assert_eq!(config.trials_per_side, 4);
    assert_eq!(config.output_format, OutputFormat::Csv);
    assert_eq!(config.first_day, 1);
}

#[test]
fn test_load_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();
    let result = TomlConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(result.is_err());
}

#[test]
fn test_validate_root_folder_accepts_existing_directory() {
    let dir = TempDir::new().unwrap();
    let validated = validate_root_folder(dir.path()).unwrap();
    assert_eq!(validated, dir.path().to_path_buf());
}

#[test]
fn test_validate_root_folder_rejects_regular_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("not_a_folder.txt");
    std::fs::write(&file, b"x").unwrap();
    assert!(validate_root_folder(&file).is_err());
}

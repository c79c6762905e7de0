#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::predicate;

const DEFAULT_JSON: &str = r#"{"theme":{"author":null,"author_url":null},"links":[]}"#;

fn config_file(home: &Path) -> PathBuf {
    home.join(".forge").join("config.json")
}

fn forge(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("forge");
    cmd.env("HOME", home).env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_config_path() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".forge/config.json"));
    assert!(!config_file(home.path()).exists());
}

#[test]
fn test_config_show_creates_default_file() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(DEFAULT_JSON));
    assert_eq!(
        std::fs::read_to_string(config_file(home.path())).unwrap(),
        DEFAULT_JSON
    );
}

#[test]
fn test_config_set_then_get() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act
    forge(home.path())
        .args(["config", "set", "links", r#"["/var/www/wordpress"]"#])
        .assert()
        .success();

    // Assert
    forge(home.path())
        .args(["config", "get", "links"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"["/var/www/wordpress"]"#));
    assert_eq!(
        std::fs::read_to_string(config_file(home.path())).unwrap(),
        r#"{"theme":{"author":null,"author_url":null},"links":["/var/www/wordpress"]}"#
    );
}

#[test]
fn test_config_get_missing_key() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "get", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy is not set"));
}

#[test]
fn test_config_author() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act
    forge(home.path())
        .args([
            "config",
            "author",
            "--name",
            "Matt Button",
            "--url",
            "http://that-matt.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Theme author: Matt Button (http://that-matt.com)",
        ));

    // Assert
    assert_eq!(
        std::fs::read_to_string(config_file(home.path())).unwrap(),
        r#"{"theme":{"author":"Matt Button","author_url":"http://that-matt.com"},"links":[]}"#
    );
}

#[test]
fn test_config_author_keeps_other_theme_keys() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let path = config_file(home.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        r#"{"theme":{"author":"A","author_url":null,"name":"twentyten"},"links":[]}"#,
    )
    .unwrap();

    // Act
    forge(home.path())
        .args(["config", "author", "--name", "B"])
        .assert()
        .success();

    // Assert
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"theme":{"author":"B","author_url":null,"name":"twentyten"},"links":[]}"#
    );
}

#[test]
fn test_config_show_loads_yaml_content() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let path = config_file(home.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "theme:\n  author: Drew\nlinks: []\n").unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"theme":{"author":"Drew"},"links":[]}"#,
        ));
}

#[test]
fn test_link_appends_duplicates() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let site = home.path().join("site");

    // Act
    for _ in 0..2 {
        forge(home.path())
            .arg("link")
            .arg(&site)
            .assert()
            .success()
            .stdout(predicate::str::contains("Linked"));
    }

    // Assert
    forge(home.path())
        .arg("links")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 2 linked path(s)"));
}

#[test]
fn test_links_empty() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act & Assert
    forge(home.path())
        .arg("links")
        .assert()
        .success()
        .stdout(predicate::str::contains("No linked paths."));
}

#[test]
fn test_partial_file_is_not_backfilled() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let path = config_file(home.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"theme":{"author":"Drew"},"links":[]}"#).unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"{"theme":{"author":"Drew"},"links":[]}"#,
        ));
}

#[test]
fn test_malformed_file_fails() {
    // Arrange
    let home = tempfile::tempdir().unwrap();
    let path = config_file(home.path());
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{not json").unwrap();

    // Act & Assert
    forge(home.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load config"));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
}

#[test]
fn test_completions_bash() {
    // Arrange
    let home = tempfile::tempdir().unwrap();

    // Act & Assert
    forge(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("forge"));
}

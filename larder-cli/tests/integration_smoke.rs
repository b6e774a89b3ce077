//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

/// `larder` isolated from the caller's config and environment.
fn larder(home: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("larder").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env_remove("LARDER_CONFIG")
        .env_remove("LARDER_BACKEND")
        .env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_KEY")
        .env_remove("DATABASE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_top_level_help() {
    let home = tempfile::tempdir().unwrap();
    larder(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("influencers"))
        .stdout(predicate::str::contains("recipes"));
}

#[test]
fn test_recipes_create_help() {
    let home = tempfile::tempdir().unwrap();
    larder(&home)
        .args(["recipes", "create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("FIELD=VALUE"));
}

#[test]
fn test_influencers_search_help() {
    let home = tempfile::tempdir().unwrap();
    larder(&home)
        .args(["influencers", "search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name and bio"));
}

#[test]
fn test_config_path_honours_flag() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("custom.toml");
    larder(&home)
        .args(["config", "path", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_then_show() {
    let home = tempfile::tempdir().unwrap();
    let path = home.path().join("config.toml");

    larder(&home)
        .args(["config", "init", "--config"])
        .arg(&path)
        .assert()
        .success();
    assert!(path.exists());

    larder(&home)
        .args(["config", "show", "--config"])
        .arg(&path)
        .env("SUPABASE_URL", "https://example.supabase.co")
        .assert()
        .success()
        .stdout(predicate::str::contains("https://example.supabase.co"));
}

#[test]
fn test_missing_database_url_is_reported() {
    let home = tempfile::tempdir().unwrap();
    larder(&home)
        .args(["influencers", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No database URL configured"));
}

#[test]
fn test_db_init_requires_postgres() {
    let home = tempfile::tempdir().unwrap();
    larder(&home)
        .args(["db", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("postgres backend"));
}

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Helper to create a test command with a clean environment
fn composectl() -> Command {
    let mut cmd = Command::cargo_bin("composectl").unwrap();
    cmd.env_remove("COMPOSEAPITOKEN")
        .env_remove("COMPOSE_API_URL")
        .env_remove("COMPOSECTL_PROFILE")
        .env_remove("COMPOSECTL_CONFIG_FILE")
        .env_remove("RUST_LOG");
    cmd
}

/// Command bound to a config file inside `dir`
fn composectl_with_config(dir: &TempDir) -> Command {
    let mut cmd = composectl();
    cmd.arg("--config-file").arg(dir.path().join("config.toml"));
    cmd
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn test_help_flag() {
    composectl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Manage Compose accounts"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_help_lists_catalog_commands() {
    let assert = composectl().arg("--help").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();

    for command in [
        "accounts",
        "users",
        "add-user",
        "remove-user",
        "teams",
        "add-team",
        "update-team",
        "remove-team",
        "add-team-users",
        "deployments",
        "user-roles",
        "assign-user-role",
        "remove-user-role",
        "team-roles",
        "assign-team-role",
        "remove-team-role",
    ] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_version_flag() {
    composectl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("composectl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_subcommand_json() {
    composectl()
        .args(["version", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name": "composectl""#));
}

#[test]
fn test_subcommand_help() {
    composectl()
        .args(["assign-team-role", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<DEPLOYMENT_ID>"))
        .stdout(predicate::str::contains("<TEAM_ID>"))
        .stdout(predicate::str::contains("<ROLE>"));
}

#[test]
fn test_completions_bash() {
    composectl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("composectl"));
}

// ---------------------------------------------------------------------------
// Usage errors
// ---------------------------------------------------------------------------

#[test]
fn test_no_args_shows_usage() {
    composectl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    composectl()
        .arg("invalid-command")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_missing_positional_argument() {
    composectl()
        .arg("users")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<ACCOUNT_ID>"));
}

#[test]
fn test_add_team_users_requires_a_user_id() {
    composectl()
        .args(["add-team-users", "team-1"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<USER_IDS>"));
}

#[test]
fn test_invalid_output_format() {
    composectl()
        .args(["teams", "-o", "xml"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_invalid_api_method() {
    composectl()
        .args(["api", "fetch", "/teams"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid HTTP method"));
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

#[test]
fn test_profile_list_empty() {
    let dir = TempDir::new().unwrap();
    composectl_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles configured."));
}

#[test]
fn test_profile_path_uses_config_file() {
    let dir = TempDir::new().unwrap();
    composectl_with_config(&dir)
        .args(["profile", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_profile_set_list_show() {
    let dir = TempDir::new().unwrap();

    composectl_with_config(&dir)
        .args(["profile", "set", "work", "--api-token", "tok-123456"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'work' created."))
        .stdout(predicate::str::contains("'work' is the default profile."));

    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(content.contains("default_profile = \"work\""));
    assert!(content.contains("tok-123456"));

    composectl_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* work"));

    composectl_with_config(&dir)
        .args(["profile", "show", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Token: tok-..."))
        .stdout(predicate::str::contains("tok-123456").not())
        .stdout(predicate::str::contains("https://api.compose.io/2016-07"));
}

#[test]
fn test_profile_update_keeps_api_url() {
    let dir = TempDir::new().unwrap();

    composectl_with_config(&dir)
        .args([
            "profile",
            "set",
            "local",
            "--api-token",
            "first",
            "--api-url",
            "http://localhost:8080/2016-07",
        ])
        .assert()
        .success();

    composectl_with_config(&dir)
        .args(["profile", "set", "local", "--api-token", "second"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'local' updated."));

    composectl_with_config(&dir)
        .args(["profile", "show", "local", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://localhost:8080/2016-07"))
        .stdout(predicate::str::contains("seco..."));
}

#[test]
fn test_profile_set_does_not_store_env_connection_values() {
    let dir = TempDir::new().unwrap();

    composectl_with_config(&dir)
        .env("COMPOSE_API_URL", "http://from-env.example/2016-07")
        .args(["profile", "set", "work", "--api-token", "typed-token"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(content.contains("typed-token"));
    assert!(!content.contains("from-env.example"));
}

#[test]
fn test_profile_default_and_remove() {
    let dir = TempDir::new().unwrap();

    for name in ["alpha", "beta"] {
        composectl_with_config(&dir)
            .args(["profile", "set", name, "--api-token", "tok"])
            .assert()
            .success();
    }

    composectl_with_config(&dir)
        .args(["profile", "default", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default profile set to 'beta'."));

    composectl_with_config(&dir)
        .args(["profile", "remove", "beta", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default profile cleared."));

    let content = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(!content.contains("beta"));
    assert!(content.contains("alpha"));
}

#[test]
fn test_profile_show_unknown() {
    let dir = TempDir::new().unwrap();
    composectl_with_config(&dir)
        .args(["profile", "show", "nope"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'nope' not found"))
        .stderr(predicate::str::contains("composectl profile set nope"));
}

#[test]
fn test_unknown_profile_flag_fails_before_request() {
    let dir = TempDir::new().unwrap();
    composectl_with_config(&dir)
        .args(["--profile", "missing", "teams"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'missing' not found"));
}

#[test]
fn test_corrupt_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), "[[[broken").unwrap();

    composectl_with_config(&dir)
        .args(["profile", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}

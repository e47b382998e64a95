use assert_cmd::Command;
use serde_json::Value;

fn shelf(config_dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("shelf").unwrap();
    cmd.env("SHELF_CONFIG_DIR", config_dir)
        .env("SHELF_ENV", "local")
        .env("RUST_LOG", "error");
    cmd
}

#[test]
fn config_prints_layered_settings_as_json() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("base.toml"),
        "[server]\nport = 9100\n\n[database]\nbackend = \"memory\"\n",
    )
    .unwrap();

    let output = shelf(dir.path())
        .env("SHELF__DATABASE__NAME", "catalogue")
        .arg("config")
        .output()
        .unwrap();

    assert!(output.status.success());
    let settings: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(settings["environment"], "local");
    assert_eq!(settings["server"]["port"], 9100);
    assert_eq!(settings["database"]["backend"], "memory");
    assert_eq!(settings["database"]["name"], "catalogue");
}

#[test]
fn unknown_environment_fails() {
    let dir = tempfile::tempdir().unwrap();

    shelf(dir.path())
        .env("SHELF_ENV", "moon")
        .arg("config")
        .assert()
        .failure();
}

#[test]
fn missing_subcommand_is_a_usage_error() {
    let dir = tempfile::tempdir().unwrap();

    shelf(dir.path()).assert().failure().code(2);
}

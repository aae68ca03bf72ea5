use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn vdx() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("vdx"));
    cmd.env_remove("VAULTDEX_VAULT_ROOT")
        .env_remove("VAULTDEX_CACHE_DIR")
        .env_remove("VAULTDEX_LOG_LEVEL")
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn doctor_reads_provided_config_path() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    write_file(
        &cfg,
        r#"
version = 1
profile = "default"

[profiles.default]
vault_root = "/tmp/v"
excluded_folders = ["{{vault_root}}/archive"]
"#,
    );

    vdx()
        .args(["doctor", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   vaultdex doctor"))
        .stdout(predicate::str::contains("profile: default"))
        .stdout(predicate::str::contains("vault_root: /tmp/v"))
        .stdout(predicate::str::contains("cache_dir: /tmp/v/.vaultdex/cache"))
        .stdout(predicate::str::contains("excluded_folders: [/tmp/v/archive]"));
}

#[test]
fn doctor_uses_xdg_default_when_present() {
    let tmp = tempdir().unwrap();
    write_file(
        &tmp.path().join("vaultdex/config.toml"),
        "version = 1\n[profiles.default]\nvault_root = \"/tmp/v\"\n",
    );

    vdx()
        .env("XDG_CONFIG_HOME", tmp.path())
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("OK   vaultdex doctor"))
        .stdout(predicate::str::contains("vault_root: /tmp/v"));
}

#[test]
fn doctor_reports_cache_state_after_index() {
    let tmp = tempdir().unwrap();
    let vault = tmp.path().join("vault");
    write_file(&vault.join("note.md"), "# Note\n");
    let cfg = tmp.path().join("config.toml");
    write_file(
        &cfg,
        &format!("version = 1\n[profiles.default]\nvault_root = \"{}\"\n", vault.display()),
    );

    vdx()
        .args(["doctor", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache_entries: 0"))
        .stdout(predicate::str::contains("last_run: never"));

    vdx().args(["index", "--config", cfg.to_str().unwrap()]).assert().success();

    vdx()
        .args(["doctor", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("cache_entries: 1"))
        .stdout(predicate::str::contains("last_run: never").not());
}

#[test]
fn doctor_applies_env_overrides() {
    let tmp = tempdir().unwrap();
    let cfg = tmp.path().join("config.toml");
    write_file(&cfg, "version = 1\n[profiles.default]\nvault_root = \"/tmp/v\"\n");

    vdx()
        .env("VAULTDEX_VAULT_ROOT", "/srv/notes")
        .args(["doctor", "--config", cfg.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("vault_root: /srv/notes"))
        .stdout(predicate::str::contains("cache_dir: /srv/notes/.vaultdex/cache"));
}

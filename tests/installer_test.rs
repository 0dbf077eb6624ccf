//! Integration tests for the install/update/uninstall lifecycle.

use serde_json::json;
use superclaude::config::ConfigStore;
use superclaude::installer::{Installer, Profile};
use tempfile::TempDir;

fn setup(dir: &TempDir) -> (ConfigStore, Installer) {
    let store = ConfigStore::new(dir.path().join(".claude")).unwrap();
    let installer = Installer::new(store.clone());
    (store, installer)
}

#[test]
fn quick_install_writes_config_and_payloads() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();

    assert!(store.is_installed());
    let doc = store.load();
    assert_eq!(doc["version"], json!("3.1.0"));
    assert_eq!(doc["profile"], json!("quick"));
    assert_eq!(
        store.installed_components(),
        ["commands", "personas", "mcp", "orchestrator"]
    );

    let root = store.claude_dir();
    assert!(root.join("commands/sc/index.md").is_file());
    assert!(root.join("commands/sc/analyze.md").is_file());
    assert!(root.join("personas/architect.md").is_file());
    assert!(root.join("mcp/servers.json").is_file());
    assert!(root.join("ORCHESTRATOR.md").is_file());
}

#[test]
fn minimal_install_enables_commands_only() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Minimal, false).unwrap();

    assert_eq!(store.installed_components(), ["commands"]);
    assert_eq!(store.get("mcp_servers"), Some(json!([])));
    assert!(store.claude_dir().join("commands/sc/index.md").is_file());
    assert!(!store.claude_dir().join("personas").exists());
}

#[test]
fn developer_install_turns_debug_on() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Developer, false).unwrap();

    assert_eq!(store.get("settings.debug"), Some(json!(true)));
    assert_eq!(
        store.installed_components(),
        ["commands", "personas", "mcp", "orchestrator"]
    );
}

#[test]
fn custom_install_enables_nothing() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Custom, false).unwrap();

    assert!(store.is_installed());
    assert!(store.installed_components().is_empty());
    assert!(!store.claude_dir().join("commands").exists());
}

#[test]
fn reinstall_requires_force() {
    let dir = TempDir::new().unwrap();
    let (_, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    let err = installer.install(Profile::Quick, false).unwrap_err();
    assert!(err.to_string().contains("already installed"));

    installer.install(Profile::Minimal, true).unwrap();
}

#[test]
fn forced_reinstall_rebuilds_from_defaults() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    store.set("custom_key", json!("kept?")).unwrap();

    installer.install(Profile::Minimal, true).unwrap();
    let doc = store.load();
    assert_eq!(doc["profile"], json!("minimal"));
    assert!(doc.get("custom_key").is_none());
}

#[test]
fn update_requires_install() {
    let dir = TempDir::new().unwrap();
    let (_, installer) = setup(&dir);

    assert!(installer.update().is_err());
    assert!(installer.check_for_updates().is_err());
}

#[test]
fn check_for_updates_compares_semver() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    assert!(!installer.check_for_updates().unwrap());

    store.set("version", json!("1.0.0")).unwrap();
    assert!(installer.check_for_updates().unwrap());

    // Unparsable recorded versions count as update-available.
    store.set("version", json!("not-a-version")).unwrap();
    assert!(installer.check_for_updates().unwrap());
}

#[test]
fn update_restores_payloads_and_bumps_version() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    store.set("version", json!("1.0.0")).unwrap();
    let index = store.claude_dir().join("commands/sc/index.md");
    std::fs::remove_file(&index).unwrap();

    installer.update().unwrap();

    assert_eq!(store.get("version"), Some(json!("3.1.0")));
    assert!(index.is_file());
}

#[test]
fn uninstall_removes_framework_but_not_claude_dir() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    store.set("settings.telemetry", json!(true)).unwrap();
    superclaude::telemetry::TelemetryCollector::new(&store).track_command("status", true, None);

    installer.uninstall().unwrap();

    assert!(!store.is_installed());
    let root = store.claude_dir();
    assert!(root.is_dir());
    assert!(!root.join("commands").exists());
    assert!(!root.join("personas").exists());
    assert!(!root.join("mcp").exists());
    assert!(!root.join(".telemetry").exists());
    assert!(!root.join("ORCHESTRATOR.md").exists());
}

#[test]
fn uninstall_tolerates_missing_pieces() {
    let dir = TempDir::new().unwrap();
    let (_, installer) = setup(&dir);

    // Nothing installed at all — still succeeds.
    installer.uninstall().unwrap();
}

#[test]
fn status_reflects_installation() {
    let dir = TempDir::new().unwrap();
    let (_, installer) = setup(&dir);

    let before = installer.status();
    assert!(!before.installed);
    // Defaults leak through the unsaved document view.
    assert_eq!(before.version, "3.1.0");

    installer.install(Profile::Developer, false).unwrap();
    let after = installer.status();
    assert!(after.installed);
    assert_eq!(after.profile, "developer");
    assert_eq!(
        after.components,
        ["commands", "personas", "mcp", "orchestrator"]
    );
}

#[test]
fn enable_component_writes_payload_and_flag() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Custom, false).unwrap();
    installer.enable_component("personas").unwrap();

    assert_eq!(store.installed_components(), ["personas"]);
    assert!(store.claude_dir().join("personas/architect.md").is_file());
}

#[test]
fn disable_component_clears_flag_but_keeps_files() {
    let dir = TempDir::new().unwrap();
    let (store, installer) = setup(&dir);

    installer.install(Profile::Quick, false).unwrap();
    installer.disable_component("personas").unwrap();

    assert!(!store.installed_components().contains(&"personas".to_string()));
    assert!(store.claude_dir().join("personas/architect.md").is_file());
}

#[test]
fn unknown_component_is_rejected() {
    let dir = TempDir::new().unwrap();
    let (_, installer) = setup(&dir);

    assert!(installer.enable_component("bogus").is_err());
    assert!(installer.disable_component("bogus").is_err());
}

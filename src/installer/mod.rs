//! Install/update/uninstall lifecycle for the framework.
//!
//! The installer copies embedded component payloads into the claude
//! directory tree and records state through [`ConfigStore`] — it never
//! touches the JSON file directly. The claude directory itself is shared
//! with Claude Code and is never deleted; uninstall removes only what
//! install created.

mod payloads;

use std::path::Path;

use anyhow::{bail, Context as _, Result};
use semver::Version;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::{ConfigStore, VERSION};

// ─── Profile ──────────────────────────────────────────────────────────────────

/// Installation profile: which components an install enables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// Commands only, no MCP servers.
    Minimal,
    /// Everything on — the default document is exactly this profile.
    Quick,
    /// Everything on, plus debug logging enabled in settings.
    Developer,
    /// Nothing enabled; components are opted into individually.
    Custom,
}

impl Profile {
    pub fn as_str(self) -> &'static str {
        match self {
            Profile::Minimal => "minimal",
            Profile::Quick => "quick",
            Profile::Developer => "developer",
            Profile::Custom => "custom",
        }
    }

    /// Component names this profile enables.
    pub fn components(self) -> &'static [&'static str] {
        match self {
            Profile::Minimal => &["commands"],
            Profile::Quick | Profile::Developer => {
                &["commands", "personas", "mcp", "orchestrator"]
            }
            Profile::Custom => &[],
        }
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Profile {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "minimal" => Ok(Profile::Minimal),
            "quick" => Ok(Profile::Quick),
            "developer" => Ok(Profile::Developer),
            "custom" => Ok(Profile::Custom),
            other => bail!("unknown profile '{other}' (expected minimal, quick, developer, or custom)"),
        }
    }
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// Snapshot returned by [`Installer::status`].
#[derive(Debug, Clone)]
pub struct InstallStatus {
    pub installed: bool,
    pub version: String,
    pub profile: String,
    pub components: Vec<String>,
}

// ─── Installer ────────────────────────────────────────────────────────────────

/// Manages the framework's on-disk lifecycle.
pub struct Installer {
    store: ConfigStore,
}

impl Installer {
    pub fn new(store: ConfigStore) -> Self {
        Self { store }
    }

    // ─── Install ──────────────────────────────────────────────────────────────

    /// Install the framework with the given profile.
    ///
    /// Fails if already installed unless `force` is set. A forced reinstall
    /// rebuilds the configuration from defaults — prior edits are discarded.
    pub fn install(&self, profile: Profile, force: bool) -> Result<()> {
        if self.store.is_installed() && !force {
            bail!("already installed (use --force to reinstall)");
        }

        debug!(profile = %profile, force, "installing framework");

        let mut doc = ConfigStore::defaults();
        doc["profile"] = json!(profile.as_str());

        let enabled = profile.components();
        if let Some(components) = doc["components"].as_object_mut() {
            for (name, flag) in components.iter_mut() {
                *flag = json!(enabled.contains(&name.as_str()));
            }
        }
        match profile {
            Profile::Minimal | Profile::Custom => doc["mcp_servers"] = json!([]),
            Profile::Developer => doc["settings"]["debug"] = json!(true),
            Profile::Quick => {}
        }

        for component in enabled {
            self.write_payload(component)?;
        }

        self.store.save(&doc)?;
        info!(profile = %profile, "framework installed");
        Ok(())
    }

    // ─── Update ───────────────────────────────────────────────────────────────

    /// Re-copy payloads for the enabled components and bump the recorded
    /// version to this binary's version.
    pub fn update(&self) -> Result<()> {
        if !self.store.is_installed() {
            bail!("not installed (run install first)");
        }

        for component in self.store.installed_components() {
            self.write_payload(&component)?;
        }

        self.store.set("version", json!(VERSION))?;
        info!(version = VERSION, "framework updated");
        Ok(())
    }

    /// Whether this binary is newer than the installed framework.
    ///
    /// An unparsable recorded version counts as update-available: whatever
    /// is on disk, a clean re-install from this binary improves it.
    pub fn check_for_updates(&self) -> Result<bool> {
        if !self.store.is_installed() {
            bail!("not installed (run install first)");
        }

        let current = Version::parse(VERSION).context("invalid crate version")?;
        let recorded = self
            .store
            .get("version")
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_default();

        match Version::parse(&recorded) {
            Ok(installed) => Ok(current > installed),
            Err(_) => {
                warn!(recorded = %recorded, "unparsable installed version");
                Ok(true)
            }
        }
    }

    // ─── Uninstall ────────────────────────────────────────────────────────────

    /// Remove everything install created: component directories, the
    /// telemetry subtree, and the configuration file.
    ///
    /// The claude directory itself stays — it belongs to Claude Code, not to
    /// this framework. Paths already missing are logged and skipped.
    pub fn uninstall(&self) -> Result<()> {
        for component in ["commands", "personas", "mcp"] {
            // The names come from the fixed component table, so path
            // resolution cannot fail here.
            if let Ok(path) = self.store.component_path(component) {
                remove_dir_if_present(&path)?;
            }
        }

        remove_dir_if_present(&self.store.claude_dir().join(".telemetry"))?;

        let orchestrator_file = self.store.claude_dir().join("ORCHESTRATOR.md");
        if orchestrator_file.exists() {
            std::fs::remove_file(&orchestrator_file).with_context(|| {
                format!("failed to remove {}", orchestrator_file.display())
            })?;
        }

        let config_path = self.store.config_path().to_path_buf();
        if config_path.exists() {
            std::fs::remove_file(&config_path)
                .with_context(|| format!("failed to remove {}", config_path.display()))?;
        } else {
            warn!(path = %config_path.display(), "config file not found during uninstall");
        }

        info!("framework uninstalled");
        Ok(())
    }

    // ─── Status ───────────────────────────────────────────────────────────────

    pub fn status(&self) -> InstallStatus {
        InstallStatus {
            installed: self.store.is_installed(),
            version: self
                .store
                .get_or("version", json!("unknown"))
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            profile: self
                .store
                .get_or("profile", json!("unknown"))
                .as_str()
                .unwrap_or("unknown")
                .to_string(),
            components: self.store.installed_components(),
        }
    }

    // ─── Component toggles ────────────────────────────────────────────────────

    /// Enable a component: write its payload and set its flag.
    ///
    /// Unknown names fail fast via the component path table.
    pub fn enable_component(&self, name: &str) -> Result<()> {
        self.validate_component(name)?;
        self.write_payload(name)?;
        self.store.set(&format!("components.{name}"), json!(true))?;
        info!(component = name, "component enabled");
        Ok(())
    }

    /// Disable a component: clear its flag. Payload files stay on disk so a
    /// re-enable is cheap.
    pub fn disable_component(&self, name: &str) -> Result<()> {
        self.validate_component(name)?;
        self.store.set(&format!("components.{name}"), json!(false))?;
        info!(component = name, "component disabled");
        Ok(())
    }

    fn validate_component(&self, name: &str) -> Result<()> {
        // orchestrator has no path of its own — its payload lands under the
        // core path — but it is a real component flag.
        if name == "orchestrator" {
            return Ok(());
        }
        self.store.component_path(name)?;
        Ok(())
    }

    // ─── Payload writes ───────────────────────────────────────────────────────

    /// Write one component's embedded files under its target path.
    /// Idempotent: existing files are overwritten.
    fn write_payload(&self, component: &str) -> Result<()> {
        let payload = match payloads::payload_for(component) {
            Some(payload) => payload,
            None => {
                debug!(component, "no payload for component");
                return Ok(());
            }
        };

        let target = if component == "orchestrator" {
            self.store.component_path("core")?
        } else {
            self.store.component_path(component)?
        };

        std::fs::create_dir_all(&target)
            .with_context(|| format!("failed to create component dir {}", target.display()))?;

        for (rel_path, content) in payload.files {
            let dest = target.join(rel_path);
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create dir {}", parent.display()))?;
            }
            std::fs::write(&dest, content)
                .with_context(|| format!("failed to write {}", dest.display()))?;
        }

        debug!(component, files = payload.files.len(), "payload written");
        Ok(())
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

fn remove_dir_if_present(path: &Path) -> Result<()> {
    if path.exists() {
        std::fs::remove_dir_all(path)
            .with_context(|| format!("failed to remove {}", path.display()))?;
    } else {
        debug!(path = %path.display(), "directory not found during uninstall, skipping");
    }
    Ok(())
}

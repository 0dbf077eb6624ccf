//! Persisted configuration for the SuperClaude framework.
//!
//! The single source of truth is `{claude_dir}/superclaude.json`, a
//! schema-less JSON object read and rewritten in full on every access.
//! A corrupt file is treated as absent — defaults are substituted so that
//! one bad write can never block every other command.
//!
//! Known limitation: the file is shared mutable state with no locking.
//! Concurrent processes writing through `set` race under last-writer-wins.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use serde_json::{json, Map, Value};
use tracing::{debug, error};

/// File name of the configuration document inside the claude directory.
const CONFIG_FILE: &str = "superclaude.json";

/// Framework version stamped into freshly written documents.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ─── Errors ───────────────────────────────────────────────────────────────────

/// Validation errors raised by the config store.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown component: {0}")]
    UnknownComponent(String),
}

// ─── ConfigStore ──────────────────────────────────────────────────────────────

/// Handle to the on-disk configuration document.
///
/// Cheap to clone — holds only the resolved paths. Every `get`/`set` performs
/// a full load-modify-save cycle; there is no in-memory cache to go stale.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    claude_dir: PathBuf,
    config_path: PathBuf,
}

impl ConfigStore {
    /// Open a store rooted at `claude_dir`, creating the directory if needed.
    pub fn new(claude_dir: impl Into<PathBuf>) -> Result<Self> {
        let claude_dir = claude_dir.into();
        let config_path = claude_dir.join(CONFIG_FILE);
        let store = Self {
            claude_dir,
            config_path,
        };
        store.ensure_dir()?;
        Ok(store)
    }

    /// Open a store at the default location (`~/.claude`).
    pub fn open_default() -> Result<Self> {
        Self::new(default_claude_dir())
    }

    /// Create the claude directory (and parents) if absent. Idempotent.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.claude_dir).with_context(|| {
            format!("failed to create claude dir {}", self.claude_dir.display())
        })?;
        debug!(path = %self.claude_dir.display(), "claude directory ensured");
        Ok(())
    }

    pub fn claude_dir(&self) -> &Path {
        &self.claude_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    // ─── Load / save ──────────────────────────────────────────────────────────

    /// Load the configuration document.
    ///
    /// A missing file yields the defaults. So does an unparsable one: the
    /// parse error is logged and swallowed, never surfaced — partial trust in
    /// a broken file is worse than a clean reset.
    pub fn load(&self) -> Value {
        let raw = match std::fs::read_to_string(&self.config_path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!("config file not found, returning defaults");
                return Self::defaults();
            }
        };
        match serde_json::from_str(&raw) {
            Ok(doc) => doc,
            Err(e) => {
                error!(path = %self.config_path.display(), err = %e, "failed to parse config — using defaults");
                Self::defaults()
            }
        }
    }

    /// Serialize `doc` and overwrite the configuration file.
    ///
    /// I/O failures (permissions, disk full) propagate to the caller.
    pub fn save(&self, doc: &Value) -> Result<()> {
        let raw = serde_json::to_string_pretty(doc)
            .context("failed to serialize configuration")?;
        std::fs::write(&self.config_path, raw).with_context(|| {
            format!("failed to write config {}", self.config_path.display())
        })?;
        debug!(path = %self.config_path.display(), "configuration saved");
        Ok(())
    }

    /// The canonical default document. Pure — no I/O.
    pub fn defaults() -> Value {
        json!({
            "version": VERSION,
            "profile": "quick",
            "components": {
                "commands": true,
                "personas": true,
                "mcp": true,
                "orchestrator": true,
            },
            "settings": {
                "auto_update": true,
                "telemetry": false,
                "debug": false,
            },
            "mcp_servers": [
                "context7",
                "sequential",
                "magic",
                "playwright",
            ],
        })
    }

    // ─── Dotted-path access ───────────────────────────────────────────────────

    /// Get a value by dotted key, e.g. `"settings.telemetry"`.
    ///
    /// Returns `None` as soon as any path segment is missing or a non-object
    /// value is reached before the path is exhausted.
    pub fn get(&self, key: &str) -> Option<Value> {
        let doc = self.load();
        let mut current = &doc;
        for segment in key.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current.clone())
    }

    /// Get a value by dotted key, falling back to `default`.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.get(key).unwrap_or(default)
    }

    /// Set a value by dotted key, creating intermediate objects as needed.
    ///
    /// Quirk, kept on purpose: an intermediate segment holding a non-object
    /// value is silently replaced by an empty object rather than erroring.
    pub fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut doc = self.load();
        let segments: Vec<&str> = key.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return Ok(()),
        };

        let mut current = as_object_mut(&mut doc);
        for segment in parents {
            let slot = current
                .entry((*segment).to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = as_object_mut(slot);
        }
        current.insert((*last).to_string(), value);

        self.save(&doc)
    }

    // ─── Component queries ────────────────────────────────────────────────────

    /// Resolve a component name to its installation path.
    pub fn component_path(&self, component: &str) -> Result<PathBuf, ConfigError> {
        match component {
            "commands" => Ok(self.claude_dir.join("commands").join("sc")),
            "personas" => Ok(self.claude_dir.join("personas")),
            "mcp" => Ok(self.claude_dir.join("mcp")),
            "core" => Ok(self.claude_dir.clone()),
            other => Err(ConfigError::UnknownComponent(other.to_string())),
        }
    }

    /// Whether the framework is installed — the config file exists on disk.
    /// Existence check only; the file is not parsed.
    pub fn is_installed(&self) -> bool {
        self.config_path.exists()
    }

    /// Names of components whose `components` entry is truthy, in document
    /// order.
    pub fn installed_components(&self) -> Vec<String> {
        let doc = self.load();
        doc.get("components")
            .and_then(Value::as_object)
            .map(|components| {
                components
                    .iter()
                    .filter(|(_, enabled)| truthy(enabled))
                    .map(|(name, _)| name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// View `value` as a mutable object, replacing any non-object content with an
/// empty object first.
fn as_object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just set to an object"),
    }
}

/// JSON truthiness: false, null, 0, "" and empty containers are falsy.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Default claude directory: `~/.claude`.
///
/// Resolved from `HOME` (`USERPROFILE` on Windows) rather than a platform
/// crate — the directory is fixed by the external assistant tool, not by
/// platform convention.
pub fn default_claude_dir() -> PathBuf {
    #[cfg(not(target_os = "windows"))]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".claude");
        }
    }
    #[cfg(target_os = "windows")]
    {
        if let Ok(profile) = std::env::var("USERPROFILE") {
            return PathBuf::from(profile).join(".claude");
        }
    }
    // Fallback
    PathBuf::from(".claude")
}

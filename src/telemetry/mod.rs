//! Privacy-conscious local usage metrics.
//!
//! Events are appended to `{claude_dir}/.telemetry/metrics.json`, a single
//! JSON array capped at 1000 entries (oldest dropped first). Collection is
//! opt-in via `settings.telemetry` and entirely local — nothing leaves the
//! machine.
//!
//! Failure policy: storage and read errors are logged at debug level and
//! absorbed. Telemetry must never be able to break the command that
//! triggered it.

mod sanitize;

pub use sanitize::sanitize;

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::{ConfigStore, VERSION};

/// Maximum number of events retained in the metrics file.
const MAX_EVENTS: usize = 1000;

const TELEMETRY_DIR: &str = ".telemetry";
const METRICS_FILE: &str = "metrics.json";
const CLIENT_ID_FILE: &str = "client_id";

// ─── Event types ─────────────────────────────────────────────────────────────

/// A single recorded usage event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// RFC 3339 UTC timestamp.
    pub timestamp: String,
    /// Random per-process identifier.
    pub session_id: String,
    /// Random per-installation identifier, persisted once.
    pub client_id: String,
    /// Event name, e.g. `command_executed`.
    pub event: String,
    /// Free-form event properties.
    pub properties: Value,
    /// Environment snapshot at record time.
    pub context: EventContext,
}

/// Version/platform/profile snapshot attached to every event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventContext {
    pub version: String,
    pub platform: String,
    pub profile: String,
}

/// Aggregated view over the stored events.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MetricsSummary {
    pub total_events: usize,
    pub total_commands: usize,
    pub total_errors: usize,
    /// Top 10 commands by descending count; ties keep first-seen order.
    pub top_commands: Vec<(String, usize)>,
    /// Top 5 error types by descending count; ties keep first-seen order.
    pub top_errors: Vec<(String, usize)>,
}

// ─── TelemetryCollector ──────────────────────────────────────────────────────

/// Collects anonymous usage events when `settings.telemetry` is enabled.
///
/// The enablement flag is read once at construction. `session_id` is fresh
/// per process; `client_id` is loaded from disk or generated and persisted on
/// first use. Construction never fails — setup problems degrade to
/// best-effort behavior.
pub struct TelemetryCollector {
    store: ConfigStore,
    enabled: bool,
    session_id: String,
    client_id: String,
    metrics_file: PathBuf,
}

impl TelemetryCollector {
    pub fn new(store: &ConfigStore) -> Self {
        let enabled = store
            .get("settings.telemetry")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        let session_id = Uuid::new_v4().to_string();
        let telemetry_dir = store.claude_dir().join(TELEMETRY_DIR);
        let metrics_file = telemetry_dir.join(METRICS_FILE);

        let client_id = if enabled {
            if let Err(e) = std::fs::create_dir_all(&telemetry_dir) {
                debug!(err = %e, "failed to create telemetry dir");
            }
            load_or_create_client_id(&telemetry_dir.join(CLIENT_ID_FILE))
        } else {
            String::new()
        };

        if enabled {
            info!(session_id = %session_id, "telemetry enabled");
        } else {
            debug!("telemetry disabled");
        }

        Self {
            store: store.clone(),
            enabled,
            session_id,
            client_id,
            metrics_file,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    // ─── Recording ────────────────────────────────────────────────────────────

    /// Record an event. No-op when disabled; never returns an error.
    pub fn track_event(&self, name: &str, properties: Value) {
        if !self.enabled {
            return;
        }

        let event = TelemetryEvent {
            timestamp: Utc::now().to_rfc3339(),
            session_id: self.session_id.clone(),
            client_id: self.client_id.clone(),
            event: name.to_string(),
            properties,
            context: self.context(),
        };

        self.store_event(&event);
        debug!(event = name, "event tracked");
    }

    /// Record a `command_executed` event.
    pub fn track_command(&self, command: &str, success: bool, duration_ms: Option<u64>) {
        self.track_event(
            "command_executed",
            json!({
                "command": command,
                "success": success,
                "duration_ms": duration_ms,
            }),
        );
    }

    /// Record an `error_occurred` event. The message is scrubbed before
    /// storage.
    pub fn track_error(&self, error_type: &str, error_message: &str, context: Value) {
        self.track_event(
            "error_occurred",
            json!({
                "error_type": error_type,
                "error_message": sanitize(error_message),
                "context": context,
            }),
        );
    }

    fn context(&self) -> EventContext {
        EventContext {
            version: VERSION.to_string(),
            platform: std::env::consts::OS.to_string(),
            profile: self
                .store
                .get("profile")
                .and_then(|v| v.as_str().map(String::from))
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }

    // ─── Storage ──────────────────────────────────────────────────────────────

    /// Append `event` to the metrics file, keeping the most recent 1000.
    ///
    /// Full read-append-rewrite of the array — O(n) per event, acceptable
    /// under the cap. Any I/O failure is logged at debug level and absorbed.
    fn store_event(&self, event: &TelemetryEvent) {
        let result = (|| -> anyhow::Result<()> {
            let mut events = read_events(&self.metrics_file);
            events.push(serde_json::to_value(event)?);
            if events.len() > MAX_EVENTS {
                events = events.split_off(events.len() - MAX_EVENTS);
            }
            std::fs::write(&self.metrics_file, serde_json::to_string_pretty(&events)?)?;
            Ok(())
        })();

        if let Err(e) = result {
            debug!(err = %e, "failed to store telemetry event");
        }
    }

    // ─── Summary ──────────────────────────────────────────────────────────────

    /// Aggregate the stored events into a summary.
    ///
    /// Returns the empty summary when telemetry is disabled or no metrics
    /// file exists.
    pub fn metrics_summary(&self) -> MetricsSummary {
        if !self.enabled || !self.metrics_file.exists() {
            return MetricsSummary::default();
        }

        let events = read_events(&self.metrics_file);

        let mut commands = Tally::default();
        let mut errors = Tally::default();

        for event in &events {
            match event.get("event").and_then(Value::as_str) {
                Some("command_executed") => {
                    if let Some(cmd) = event
                        .get("properties")
                        .and_then(|p| p.get("command"))
                        .and_then(Value::as_str)
                    {
                        commands.bump(cmd);
                    }
                }
                Some("error_occurred") => {
                    if let Some(kind) = event
                        .get("properties")
                        .and_then(|p| p.get("error_type"))
                        .and_then(Value::as_str)
                    {
                        errors.bump(kind);
                    }
                }
                _ => {}
            }
        }

        MetricsSummary {
            total_events: events.len(),
            total_commands: commands.total,
            total_errors: errors.total,
            top_commands: commands.top(10),
            top_errors: errors.top(5),
        }
    }
}

// ─── Helpers ──────────────────────────────────────────────────────────────────

/// Read the stored event array. Absent or unparsable file → empty array.
fn read_events(path: &std::path::Path) -> Vec<Value> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

fn load_or_create_client_id(path: &std::path::Path) -> String {
    if let Ok(existing) = std::fs::read_to_string(path) {
        let existing = existing.trim();
        if !existing.is_empty() {
            return existing.to_string();
        }
    }
    let id = Uuid::new_v4().to_string();
    if let Err(e) = std::fs::write(path, &id) {
        debug!(err = %e, "failed to persist client id");
    }
    id
}

/// Counter that preserves first-seen order so that ranking ties are
/// deterministic under the stable sort.
#[derive(Default)]
struct Tally {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
    total: usize,
}

impl Tally {
    fn bump(&mut self, name: &str) {
        self.total += 1;
        match self.index.get(name) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push((name.to_string(), 1));
            }
        }
    }

    fn top(mut self, n: usize) -> Vec<(String, usize)> {
        // sort_by is stable: equal counts keep encounter order.
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_ranks_by_count_then_first_seen() {
        let mut tally = Tally::default();
        for name in ["status", "install", "status", "update", "install", "status"] {
            tally.bump(name);
        }
        let top = tally.top(10);
        assert_eq!(
            top,
            vec![
                ("status".to_string(), 3),
                ("install".to_string(), 2),
                ("update".to_string(), 1),
            ]
        );
    }

    #[test]
    fn tally_ties_keep_first_seen_order() {
        let mut tally = Tally::default();
        for name in ["b", "a", "b", "a"] {
            tally.bump(name);
        }
        assert_eq!(
            tally.top(2),
            vec![("b".to_string(), 2), ("a".to_string(), 2)]
        );
    }
}

//! Embedded component payloads.
//!
//! The files each component installs are compiled into the binary — no
//! network access, no external asset directory. `payload_for(component)`
//! returns the file set written under that component's path.

/// One component's file set: `(relative path, content)` pairs.
pub struct ComponentPayload {
    pub files: &'static [(&'static str, &'static str)],
}

/// Look up the embedded payload for a component name.
///
/// Returns `None` for names without a payload — the caller validates the
/// name against the component table first.
pub fn payload_for(component: &str) -> Option<ComponentPayload> {
    match component {
        "commands" => Some(ComponentPayload { files: COMMAND_FILES }),
        "personas" => Some(ComponentPayload { files: PERSONA_FILES }),
        "mcp" => Some(ComponentPayload { files: MCP_FILES }),
        "orchestrator" => Some(ComponentPayload {
            files: ORCHESTRATOR_FILES,
        }),
        _ => None,
    }
}

// ─── Commands (`commands/sc/`) ────────────────────────────────────────────────

const COMMAND_FILES: &[(&str, &str)] = &[
    ("analyze.md", SC_ANALYZE_MD),
    ("build.md", SC_BUILD_MD),
    ("review.md", SC_REVIEW_MD),
    ("index.md", SC_INDEX_MD),
];

const SC_INDEX_MD: &str = r#"# SuperClaude Commands

Slash commands installed under `/sc:`.

| Command | Purpose |
|---------|---------|
| /sc:analyze | Analyze code quality, architecture, and risks |
| /sc:build | Build a feature end-to-end with tests |
| /sc:review | Review the current diff before committing |
"#;

const SC_ANALYZE_MD: &str = r#"# /sc:analyze

Analyze the selected code or the whole repository.

Covers: architecture boundaries, error-handling gaps, dead code, and test
coverage. Produces a prioritized findings list, most severe first.
"#;

const SC_BUILD_MD: &str = r#"# /sc:build

Implement the requested feature end-to-end.

Workflow: restate requirements, sketch the change surface, implement with
tests alongside, then summarize what changed and why.
"#;

const SC_REVIEW_MD: &str = r#"# /sc:review

Review the working-tree diff before committing.

Focus on correctness first, then clarity. Flag anything that changes
behavior without a matching test.
"#;

// ─── Personas (`personas/`) ───────────────────────────────────────────────────

const PERSONA_FILES: &[(&str, &str)] = &[
    ("architect.md", PERSONA_ARCHITECT_MD),
    ("reviewer.md", PERSONA_REVIEWER_MD),
    ("mentor.md", PERSONA_MENTOR_MD),
];

const PERSONA_ARCHITECT_MD: &str = r#"# Persona: Architect

Thinks in boundaries and contracts. Prefers the smallest design that keeps
future options open. Asks "what breaks if this doubles?" before approving a
structure.
"#;

const PERSONA_REVIEWER_MD: &str = r#"# Persona: Reviewer

Reads diffs line by line. Hunts for behavior changes without tests, silent
error swallowing, and naming that lies about what the code does.
"#;

const PERSONA_MENTOR_MD: &str = r#"# Persona: Mentor

Explains the why behind every suggestion. Offers the idiomatic way first,
then the pragmatic shortcut, and is explicit about the trade-off.
"#;

// ─── MCP servers (`mcp/`) ─────────────────────────────────────────────────────

const MCP_FILES: &[(&str, &str)] = &[("servers.json", MCP_SERVERS_JSON)];

const MCP_SERVERS_JSON: &str = r#"{
  "servers": {
    "context7": {
      "command": "npx",
      "args": ["-y", "@upstash/context7-mcp"]
    },
    "sequential": {
      "command": "npx",
      "args": ["-y", "@modelcontextprotocol/server-sequential-thinking"]
    },
    "magic": {
      "command": "npx",
      "args": ["-y", "@21st-dev/magic"]
    },
    "playwright": {
      "command": "npx",
      "args": ["-y", "@playwright/mcp"]
    }
  }
}
"#;

// ─── Orchestrator (core path) ─────────────────────────────────────────────────

const ORCHESTRATOR_FILES: &[(&str, &str)] = &[("ORCHESTRATOR.md", ORCHESTRATOR_MD)];

const ORCHESTRATOR_MD: &str = r#"# SuperClaude Orchestrator

Routing rules for combining commands, personas, and MCP servers.

- Pick the persona that matches the task intent before running a command.
- Prefer `sequential` for multi-step reasoning, `context7` for library docs.
- Fall back to plain execution when no routing rule matches.
"#;

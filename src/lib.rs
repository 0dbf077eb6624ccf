//! SuperClaude — installer and configuration manager for Claude Code
//! extensions.
//!
//! The crate is split along the lifecycle: [`config`] owns the persisted
//! JSON document, [`installer`] drives install/update/uninstall against the
//! filesystem, and [`telemetry`] keeps an optional, local, bounded usage
//! log. Everything is synchronous and single-threaded; the shared files are
//! last-writer-wins by design.

pub mod config;
pub mod installer;
pub mod logging;
pub mod telemetry;

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use superclaude::config::ConfigStore;
use superclaude::installer::{Installer, Profile};
use superclaude::logging;
use superclaude::telemetry::TelemetryCollector;

#[derive(Parser)]
#[command(
    name = "superclaude",
    about = "SuperClaude — extend Claude Code with extra commands, personas, and MCP servers",
    version
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true, env = "SUPERCLAUDE_DEBUG")]
    debug: bool,

    /// Custom Claude configuration directory (default: ~/.claude)
    #[arg(long, global = true, env = "SUPERCLAUDE_DIR", value_name = "DIR")]
    claude_dir: Option<PathBuf>,

    /// Write logs to this file path (rotated daily). Optional.
    #[arg(long, env = "SUPERCLAUDE_LOG_FILE")]
    log_file: Option<PathBuf>,

    /// Emit logs as JSON (structured, for log aggregators)
    #[arg(long, env = "SUPERCLAUDE_LOG_JSON")]
    json_logs: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Install the SuperClaude framework.
    ///
    /// Copies the component payloads into the Claude directory and writes
    /// the configuration document.
    ///
    /// Examples:
    ///   superclaude install
    ///   superclaude install --profile developer --force
    Install {
        /// Installation profile: minimal, quick, developer, or custom
        #[arg(long, default_value = "quick")]
        profile: String,
        /// Force reinstall even if already installed
        #[arg(long)]
        force: bool,
    },
    /// Update to this binary's framework version.
    ///
    /// Re-copies payloads for the enabled components and bumps the recorded
    /// version. With --check, only reports whether an update is available.
    Update {
        /// Only check — do not install anything
        #[arg(long)]
        check: bool,
    },
    /// Uninstall the framework.
    ///
    /// Removes the component directories, the telemetry data, and the
    /// configuration file. The Claude directory itself is left in place.
    Uninstall {
        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show installation status.
    Status,
    /// Enable or disable an individual component.
    ///
    /// Examples:
    ///   superclaude component mcp
    ///   superclaude component personas --disable
    Component {
        /// Component name (commands, personas, mcp, orchestrator)
        name: String,
        /// Enable the component (default)
        #[arg(long, conflicts_with = "disable")]
        enable: bool,
        /// Disable the component
        #[arg(long)]
        disable: bool,
    },
    /// Show a summary of locally collected telemetry.
    ///
    /// Telemetry is opt-in (settings.telemetry) and never leaves the
    /// machine.
    Metrics,
}

impl Command {
    /// Stable name recorded in telemetry.
    fn name(&self) -> &'static str {
        match self {
            Command::Install { .. } => "install",
            Command::Update { .. } => "update",
            Command::Uninstall { .. } => "uninstall",
            Command::Status => "status",
            Command::Component { .. } => "component",
            Command::Metrics => "metrics",
        }
    }
}

fn main() {
    let args = Args::parse();
    let _log_guard = logging::setup_logging(args.debug, args.log_file.as_deref(), args.json_logs);

    let started = Instant::now();
    let result = run(&args);
    let duration_ms = started.elapsed().as_millis() as u64;

    // Telemetry is recorded after the command so a broken telemetry setup
    // can never block the command itself.
    if let Ok(store) = open_store(&args) {
        let telemetry = TelemetryCollector::new(&store);
        telemetry.track_command(args.command.name(), result.is_ok(), Some(duration_ms));
        if let Err(e) = &result {
            telemetry.track_error(
                "command_failed",
                &format!("{e:#}"),
                serde_json::json!({ "command": args.command.name() }),
            );
        }
    }

    if let Err(e) = result {
        eprintln!("✗ {e:#}");
        std::process::exit(1);
    }
}

fn open_store(args: &Args) -> Result<ConfigStore> {
    match &args.claude_dir {
        Some(dir) => ConfigStore::new(dir.clone()),
        None => ConfigStore::open_default(),
    }
}

fn run(args: &Args) -> Result<()> {
    let store = open_store(args)?;
    let installer = Installer::new(store.clone());

    match &args.command {
        Command::Install { profile, force } => {
            let profile = Profile::from_str(profile)?;
            println!("Installing SuperClaude (profile: {profile})");
            installer.install(profile, *force)?;
            println!("✓ SuperClaude installed successfully!");
            println!("  Run `superclaude status` to see what's enabled.");
        }

        Command::Update { check } => {
            if *check {
                if installer.check_for_updates()? {
                    println!("⚠ Update available!");
                } else {
                    println!("✓ You're on the latest version.");
                }
            } else {
                installer.update()?;
                println!("✓ Updated successfully!");
            }
        }

        Command::Uninstall { yes } => {
            if !yes && !confirm("Are you sure you want to uninstall?")? {
                println!("Aborted.");
                return Ok(());
            }
            installer.uninstall()?;
            println!("✓ Uninstalled successfully!");
        }

        Command::Status => {
            let status = installer.status();
            println!("SuperClaude Status");
            println!("  Installed:  {}", status.installed);
            println!("  Version:    {}", status.version);
            println!("  Profile:    {}", status.profile);
            println!("  Components: {}", status.components.join(", "));
        }

        Command::Component {
            name,
            enable: _,
            disable,
        } => {
            if *disable {
                installer.disable_component(name)?;
                println!("⚠ Disabled {name}");
            } else {
                installer.enable_component(name)?;
                println!("✓ Enabled {name}");
            }
        }

        Command::Metrics => {
            let telemetry = TelemetryCollector::new(&store);
            if !telemetry.enabled() {
                println!("Telemetry is disabled (settings.telemetry = false).");
                return Ok(());
            }
            let summary = telemetry.metrics_summary();
            println!("Telemetry Summary");
            println!("  Total events:   {}", summary.total_events);
            println!("  Total commands: {}", summary.total_commands);
            println!("  Total errors:   {}", summary.total_errors);
            if !summary.top_commands.is_empty() {
                println!("  Top commands:");
                for (name, count) in &summary.top_commands {
                    println!("    {name:<16} {count}");
                }
            }
            if !summary.top_errors.is_empty() {
                println!("  Top errors:");
                for (name, count) in &summary.top_errors {
                    println!("    {name:<16} {count}");
                }
            }
        }
    }

    Ok(())
}

/// Ask a `[y/N]` question on the terminal.
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::Write;
    print!("{prompt} [y/N] ");
    std::io::stdout().flush().ok();
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

//! ---
//! tl_section: "03-tooling"
//! tl_subsection: "binary"
//! tl_type: "source"
//! tl_scope: "code"
//! tl_description: "Command-line probe for the tunelog stack."
//! tl_version: "v0.1.0"
//! tl_owner: "tbd"
//! ---
use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser};
use tunelog_config::{AnyConfigVar, ConfigRegistry};
use tunelog_logging::{tl_debug, tl_error, tl_info, tl_verbose, Level, LogRuntime};

#[derive(Debug, Parser)]
#[command(about = "Probe the tunelog configuration and logging stack", long_about = None)]
struct Cli {
    /// Configuration assignments applied after the log runtime is up.
    /// Keys accept environment-style spelling (LOG_VERBOSEMASK=svc:.*).
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    assignments: Vec<String>,
    /// Apply a global severity threshold through the mask shortcut.
    #[arg(short = 'l', long = "level", value_name = "LEVEL")]
    level: Option<String>,
    /// Print every declared configuration variable and exit.
    #[arg(long, action = ArgAction::SetTrue)]
    dump: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init()
        .ok();

    let cli = Cli::parse();
    let registry = ConfigRegistry::new();
    let runtime = LogRuntime::init(&registry)?;
    registry.set_from_text("log.stdout", "true");

    let pairs = cli
        .assignments
        .iter()
        .map(|assignment| {
            assignment
                .split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
                .ok_or_else(|| anyhow!("expected KEY=VALUE, got {assignment:?}"))
        })
        .collect::<Result<Vec<_>>>()?;
    let accepted = registry.apply_pairs(pairs);
    if accepted < cli.assignments.len() {
        eprintln!(
            "warning: {} of {} assignments were not accepted",
            cli.assignments.len() - accepted,
            cli.assignments.len()
        );
    }

    if let Some(level) = &cli.level {
        let level: Level = level
            .parse()
            .map_err(|_| anyhow!("unknown level {level:?}"))
            .context("parsing --level")?;
        runtime.set_log_level(level);
    }

    if cli.dump {
        registry.visit_all(|var| {
            println!("{} = {:?}  # {}", var.name(), var.to_text(), var.description());
        });
        return Ok(());
    }

    let probe = runtime.lookup("ctl:probe");
    let sibling = runtime.lookup("ctl:sibling");
    // fold the freshly created loggers into the current mask state
    runtime.refresh_levels();

    tl_error!(probe, "error-tier probe record");
    tl_info!(probe, "info-tier probe record");
    tl_verbose!(probe, "verbose-tier probe record");
    tl_debug!(probe, "debug-tier probe record");

    tl_info!(sibling, "sibling logger at level {}", sibling.level());

    Ok(())
}

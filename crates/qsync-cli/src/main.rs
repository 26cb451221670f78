//! `qsync` command-line tool.

mod cli;
mod output;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use qsync_client::{discover, ClientConfig, Qsync, QsyncError};
use qsync_protocol::{ShadeGroup, ShadeGroupCommand};
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, GroupSelector, Move};
use output::DiscoveryReport;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Qsync(#[from] QsyncError),

    #[error("no group named '{0}' on the hub")]
    UnknownGroup(String),

    #[error("no scene named '{0}' on the hub")]
    UnknownScene(String),

    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::from_file(path)?,
        None => ClientConfig::default(),
    };
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }
    if let Some(port) = cli.port {
        config.tcp_port = port;
    }
    config.validate()?;
    debug!("qsync: effective config {:?}", config);
    Ok(config)
}

/// Turn command-line moves into hub commands, fetching the inventory only
/// when a group is given by name.
fn resolve_moves(qsync: &Qsync, moves: Vec<Move>) -> Result<Vec<ShadeGroupCommand>, CliError> {
    let needs_inventory = moves
        .iter()
        .any(|m| matches!(m.group, GroupSelector::Name(_)));
    let inventory = if needs_inventory {
        info!("qsync: fetching groups to resolve names on [{}]", qsync.host());
        Some(qsync.get_groups_and_scenes()?)
    } else {
        None
    };

    moves
        .into_iter()
        .map(|m| -> Result<ShadeGroupCommand, CliError> {
            let group = match (m.group, &inventory) {
                (GroupSelector::Channel(channel), _) => Arc::new(ShadeGroup::from_channel(channel)),
                (GroupSelector::Name(name), Some(inventory)) => inventory
                    .group_by_name(&name)
                    .cloned()
                    .ok_or(CliError::UnknownGroup(name))?,
                (GroupSelector::Name(name), None) => return Err(CliError::UnknownGroup(name)),
            };
            Ok(ShadeGroupCommand {
                group,
                target: m.target,
            })
        })
        .collect()
}

fn run(cli: Cli) -> Result<String, CliError> {
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Discover { broadcast, wait } => {
            if let Some(broadcast) = broadcast {
                config.broadcast_address = broadcast;
            }
            if let Some(wait) = wait {
                config.discovery_timeout_secs = wait;
            }
            config.validate()?;

            info!(
                "qsync: probing [{}:{}]",
                config.broadcast_address, config.udp_port
            );
            let qsync = discover(&config)?;
            let report = DiscoveryReport {
                host: qsync.host(),
                identity: qsync.identity(),
                inventory: qsync.inventory(),
            };
            if cli.json {
                Ok(output::to_json(&report)?)
            } else {
                Ok(output::discovery_text(&report))
            }
        }

        Commands::Inventory { host } => {
            let inventory = Qsync::with_config(host, config).get_groups_and_scenes()?;
            if cli.json {
                Ok(output::to_json(&inventory)?)
            } else {
                Ok(output::inventory_text(&inventory))
            }
        }

        Commands::Set { host, moves } => {
            let qsync = Qsync::with_config(host, config);
            let commands = resolve_moves(&qsync, moves)?;
            let applied = qsync.set_group_position(&commands)?;
            if cli.json {
                Ok(output::to_json(&applied)?)
            } else {
                Ok(output::applied_text(&applied))
            }
        }

        Commands::Scene { host, name } => {
            let applied = Qsync::with_config(host, config)
                .set_scene(&name)?
                .ok_or(CliError::UnknownScene(name))?;
            if cli.json {
                Ok(output::to_json(&applied)?)
            } else {
                Ok(output::applied_text(&applied))
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(text) => {
            print!("{}", text);
            if !text.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                eprintln!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_load_config_applies_overrides() {
        let cli = parse(&["qsync", "--timeout", "2.5", "--port", "19760", "inventory", "--host", "hub"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.timeout_secs, 2.5);
        assert_eq!(config.tcp_port, 19760);
    }

    #[test]
    fn test_load_config_rejects_out_of_range_timeout() {
        for timeout in ["1e300", "-1", "0"] {
            let flag = format!("--timeout={}", timeout);
            let cli = parse(&["qsync", flag.as_str(), "inventory", "--host", "hub"]);
            assert!(
                matches!(load_config(&cli), Err(CliError::Qsync(QsyncError::Config(_)))),
                "accepted --timeout {}",
                timeout
            );
        }
    }
}

//! Command-line arguments.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{ArgAction, Parser, Subcommand};
use qsync_protocol::Target;

/// Discover and control Qmotion shades through a Qsync hub.
#[derive(Debug, Parser)]
#[command(name = "qsync", version, about)]
pub struct Cli {
    /// YAML client configuration file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Timeout for hub exchanges, in seconds.
    #[arg(long, global = true)]
    pub timeout: Option<f64>,

    /// TCP control port.
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Broadcast for a hub and list its groups and scenes.
    Discover {
        /// Broadcast address to probe.
        #[arg(long)]
        broadcast: Option<String>,

        /// Seconds to wait for a reply.
        #[arg(long)]
        wait: Option<f64>,
    },

    /// List the groups and scenes stored on a hub.
    Inventory {
        /// Hub hostname or address.
        #[arg(long)]
        host: String,
    },

    /// Move up to eight groups.
    Set {
        /// Hub hostname or address.
        #[arg(long)]
        host: String,

        /// `GROUP=TARGET`, where GROUP is a channel number or group name and
        /// TARGET is a percentage (0-100) or `code:XX`.
        #[arg(required = true, num_args = 1..)]
        moves: Vec<Move>,
    },

    /// Recall a scene by name.
    Scene {
        /// Hub hostname or address.
        #[arg(long)]
        host: String,

        /// Scene name, matched exactly.
        name: String,
    },
}

/// How a group is named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupSelector {
    /// Hub channel number.
    Channel(u8),
    /// Group display name, looked up in the hub's inventory.
    Name(String),
}

/// One `GROUP=TARGET` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub group: GroupSelector,
    pub target: Target,
}

impl FromStr for Move {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (group, target) = s
            .rsplit_once('=')
            .ok_or_else(|| format!("expected GROUP=TARGET, got '{}'", s))?;

        let group = group.trim();
        if group.is_empty() {
            return Err(format!("missing group in '{}'", s));
        }
        let group = match group.parse::<u8>() {
            Ok(channel) => GroupSelector::Channel(channel),
            Err(_) => GroupSelector::Name(group.to_string()),
        };

        let target = target.trim();
        let target = match target.strip_prefix("code:") {
            Some(code) if code.len() == 2 => Target::PositionCode(code.to_ascii_lowercase()),
            Some(code) => return Err(format!("position code must be two hex digits, got '{}'", code)),
            None => {
                let percentage = target
                    .trim_end_matches('%')
                    .parse::<i32>()
                    .map_err(|_| format!("invalid percentage '{}'", target))?;
                if !(0..=100).contains(&percentage) {
                    return Err(format!("percentage must be 0-100, got {}", percentage));
                }
                Target::Percentage(percentage)
            }
        };

        Ok(Move { group, target })
    }
}

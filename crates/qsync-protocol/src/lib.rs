//! Qmotion Qsync Protocol
//!
//! This crate provides types and utilities for talking to Qmotion Qsync shade
//! controllers. It performs no I/O; see `qsync-client` for the network side.
//!
//! # Protocol Overview
//!
//! The hub answers a UDP broadcast on port 9720 with its name and hardware
//! id, and accepts request/response exchanges over TCP port 9760. Replies
//! are unframed: each socket read is one record, identified by its leading
//! two-byte tag:
//!
//! - **Header** (`1604`): how many group and scene definitions follow
//! - **Group definition** (`162c`): channel, wire code and name of a group
//! - **Scene definition** (`163b`): up to eight (group code, position) pairs
//!
//! Requests are `1600` (send the inventory) and `1b <len> <body>` (move
//! groups). Shades only support nine discrete [`Position`]s.
//!
//! # Example
//!
//! ```rust
//! use qsync_protocol::{Command, GroupPosition, Position, Record};
//!
//! let cmd = Command::SetPositions(vec![GroupPosition {
//!     channel: 9,
//!     position: Position::for_percentage(0),
//! }]);
//! assert_eq!(cmd.to_hex()?, "1b050000000901");
//!
//! let record = Record::from_hex("4242")?;
//! assert!(matches!(record, Record::Ignored(_)));
//! # Ok::<(), qsync_protocol::ProtocolError>(())
//! ```

mod codec;
mod commands;
mod constants;
mod error;
mod position;
mod records;
mod types;

pub use codec::*;
pub use commands::*;
pub use constants::*;
pub use error::*;
pub use position::*;
pub use records::*;
pub use types::*;

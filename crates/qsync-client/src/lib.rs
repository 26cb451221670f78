//! # qsync-client
//!
//! Blocking client for Qmotion Qsync shade controllers.
//!
//! Every operation opens its own socket with an explicit timeout and closes
//! it before returning. Nothing runs in the background and nothing is
//! retried, except the single drain-and-retry pass used when the hub
//! answers an inventory request from a stale conversation.
//!
//! Logging goes through `tracing`; install a subscriber to see the hex of
//! every exchange at `debug` level.
//!
//! ## Example
//!
//! ```no_run
//! use qsync_client::{discover, ClientConfig, Qsync};
//! use qsync_protocol::ShadeGroupCommand;
//!
//! // Find the hub and load its groups and scenes
//! let qsync = discover(&ClientConfig::default())?;
//! for group in &qsync.inventory().groups {
//!     println!("{}", group);
//! }
//!
//! // Or talk to a known address
//! let qsync = Qsync::new("192.168.1.40");
//! let catalog = qsync.get_groups_and_scenes()?;
//! if let Some(group) = catalog.group_by_name("Living Room") {
//!     qsync.set_group_position(&[ShadeGroupCommand::percentage(group.clone(), 50)])?;
//! }
//! qsync.set_scene("Evening")?;
//! # Ok::<(), qsync_client::QsyncError>(())
//! ```

mod config;
mod control;
mod discovery;
mod error;
mod inventory;
mod session;
mod transport;

#[cfg(test)]
mod testing;

pub use config::{ClientConfig, DEFAULT_DRAIN_TIMEOUT_MS, DEFAULT_READ_BUFFER_SIZE, DEFAULT_TIMEOUT_SECS};
pub use control::{plan_positions, send_positions};
pub use discovery::{discover, discover_with, probe};
pub use error::{BoxedCause, QsyncError};
pub use inventory::{fetch_groups_and_scenes, request_header};
pub use session::Qsync;
pub use transport::{Connector, TcpConnector, TcpTransport, Transport};

/// Result type for hub operations.
pub type Result<T> = std::result::Result<T, QsyncError>;

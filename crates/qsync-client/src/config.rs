//! Client configuration.
//!
//! Defaults match real hardware. A YAML file can override any subset:
//!
//! ```yaml
//! timeout_secs: 30
//! broadcast_address: 192.168.1.255
//! ```

use qsync_protocol::{BROADCAST_ADDRESS, TCP_PORT, UDP_PORT};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::{QsyncError, Result};

/// Long default; the hub can be slow to answer.
pub const DEFAULT_TIMEOUT_SECS: f64 = 20.0;

/// Quiet period that ends a drain of a wedged hub's leftover output.
pub const DEFAULT_DRAIN_TIMEOUT_MS: u64 = 1000;

/// Each record arrives in a single read of at most this many bytes.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 2048;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Seconds as a socket timeout: positive and small enough for a `Duration`.
fn seconds(secs: f64) -> Option<Duration> {
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|duration| !duration.is_zero())
}

/// Settings shared by every hub operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// TCP control port.
    pub tcp_port: u16,
    /// UDP discovery port.
    pub udp_port: u16,
    /// Address discovery probes are sent to.
    pub broadcast_address: String,
    /// Connect/read/write timeout for control exchanges, in seconds.
    pub timeout_secs: f64,
    /// How long to wait for a discovery reply, in seconds.
    pub discovery_timeout_secs: f64,
    /// Read timeout used while draining a wedged hub, in milliseconds.
    pub drain_timeout_ms: u64,
    /// Size of the buffer used for a single record read.
    pub read_buffer_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            tcp_port: TCP_PORT,
            udp_port: UDP_PORT,
            broadcast_address: BROADCAST_ADDRESS.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            discovery_timeout_secs: DEFAULT_TIMEOUT_SECS,
            drain_timeout_ms: DEFAULT_DRAIN_TIMEOUT_MS,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl ClientConfig {
    /// Load and validate a YAML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| QsyncError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml_str(&text)
    }

    /// Parse and validate YAML configuration text.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: ClientConfig =
            serde_yaml::from_str(text).map_err(|e| QsyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings sockets cannot honor.
    pub fn validate(&self) -> Result<()> {
        for (name, secs) in [
            ("timeout_secs", self.timeout_secs),
            ("discovery_timeout_secs", self.discovery_timeout_secs),
        ] {
            if seconds(secs).is_none() {
                return Err(QsyncError::Config(format!(
                    "{} must be a positive number of seconds, got {}",
                    name, secs
                )));
            }
        }
        if self.drain_timeout_ms == 0 {
            return Err(QsyncError::Config("drain_timeout_ms must be non-zero".into()));
        }
        if self.read_buffer_size == 0 {
            return Err(QsyncError::Config("read_buffer_size must be non-zero".into()));
        }
        Ok(())
    }

    /// Timeout for control exchanges. Falls back to the default when
    /// `timeout_secs` fails [`ClientConfig::validate`].
    pub fn timeout(&self) -> Duration {
        seconds(self.timeout_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Timeout for the discovery reply, with the same fallback.
    pub fn discovery_timeout(&self) -> Duration {
        seconds(self.discovery_timeout_secs).unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Quiet period ending a drain.
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

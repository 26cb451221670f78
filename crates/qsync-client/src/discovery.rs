//! Hub discovery over UDP broadcast.
//!
//! A single zero byte broadcast to the discovery port makes every hub on
//! the segment answer with its name and hardware id. We take the first
//! reply; there is no retry.

use std::io;
use std::net::{IpAddr, UdpSocket};

use qsync_protocol::{bytes_to_hex, parse_discovery_reply, HubIdentity, DISCOVERY_PROBE};
use tracing::debug;

use crate::config::ClientConfig;
use crate::session::Qsync;
use crate::transport::{Connector, TcpConnector};
use crate::{QsyncError, Result};

/// Largest discovery reply we accept.
const DISCOVERY_BUFFER_SIZE: usize = 1024;

const DISCOVERY_FAILED: &str = "could not discover qsync";

fn discovery_error(source: impl Into<crate::error::BoxedCause>) -> QsyncError {
    QsyncError::connection(DISCOVERY_FAILED, source)
}

/// Broadcast a discovery probe and decode the first reply.
///
/// Returns the hub's identity and the address it replied from. Every
/// failure, including a malformed reply, is a [`QsyncError::Connection`].
pub fn probe(config: &ClientConfig) -> Result<(HubIdentity, IpAddr)> {
    let socket = UdpSocket::bind(("0.0.0.0", 0)).map_err(discovery_error)?;
    socket
        .set_broadcast(true)
        .and_then(|_| socket.set_read_timeout(Some(config.discovery_timeout())))
        .map_err(discovery_error)?;

    let target = (config.broadcast_address.as_str(), config.udp_port);
    socket.send_to(&DISCOVERY_PROBE, target).map_err(discovery_error)?;
    debug!(
        "Qsync: sent discovery probe to [{}:{}]",
        config.broadcast_address, config.udp_port
    );

    let mut buffer = [0u8; DISCOVERY_BUFFER_SIZE];
    let (len, peer) = socket.recv_from(&mut buffer).map_err(|e| match e.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => QsyncError::connection(
            format!(
                "{}: no reply within {:?}",
                DISCOVERY_FAILED,
                config.discovery_timeout()
            ),
            e,
        ),
        _ => discovery_error(e),
    })?;

    let reply = &buffer[..len];
    debug!("Qsync: discovery reply from [{}]: [{}]", peer, bytes_to_hex(reply));

    let identity = parse_discovery_reply(reply).map_err(|e| {
        QsyncError::connection(format!("{}: malformed reply from [{}]", DISCOVERY_FAILED, peer), e)
    })?;
    debug!(
        "Qsync: found qsync at [{}], name [{}], hardware id [{}]",
        peer.ip(),
        identity.name,
        identity.hardware_id
    );

    Ok((identity, peer.ip()))
}

/// Find a hub on the local network and load its groups and scenes.
pub fn discover(config: &ClientConfig) -> Result<Qsync> {
    discover_with(config, TcpConnector::new(config))
}

/// Find a hub, then load its inventory through `connector`.
pub fn discover_with<C: Connector>(config: &ClientConfig, connector: C) -> Result<Qsync<C>> {
    let (identity, host) = probe(config)?;

    let mut qsync = Qsync::with_connector(host.to_string(), config.clone(), connector);
    qsync.set_identity(identity);
    qsync.refresh()?;

    Ok(qsync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use std::thread;

    fn fake_hub_reply() -> Vec<u8> {
        let mut reply = b"Bedroom Qsync".to_vec();
        reply.resize(16, 0);
        reply.extend_from_slice(&[0x00, 0x1e, 0xc0, 0xaa, 0xbb, 0xcc]);
        reply
    }

    fn local_config(udp_port: u16) -> ClientConfig {
        ClientConfig {
            udp_port,
            broadcast_address: "127.0.0.1".to_string(),
            discovery_timeout_secs: 5.0,
            ..Default::default()
        }
    }

    /// Answer one probe with `reply`, returning the probe payload.
    fn spawn_responder(reply: Vec<u8>) -> (u16, thread::JoinHandle<Vec<u8>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
        let port = socket.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let mut buf = [0u8; 64];
            let (len, from) = socket.recv_from(&mut buf).unwrap();
            socket.send_to(&reply, from).unwrap();
            buf[..len].to_vec()
        });
        (port, handle)
    }

    #[test]
    fn test_probe() {
        let (port, responder) = spawn_responder(fake_hub_reply());

        let (identity, host) = probe(&local_config(port)).unwrap();

        assert_eq!(responder.join().unwrap(), vec![0x00]);
        assert_eq!(identity.name, "Bedroom Qsync");
        assert_eq!(identity.hardware_id, "001ec0aabbcc");
        assert_eq!(host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_probe_malformed_reply_is_connection_error() {
        let (port, responder) = spawn_responder(vec![0x41; 10]);

        let err = probe(&local_config(port)).unwrap_err();
        responder.join().unwrap();

        assert!(err.is_connection());
        assert!(err.to_string().contains("malformed"));
    }

    #[test]
    fn test_probe_timeout_is_connection_error() {
        // Nobody answers on this socket
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let config = ClientConfig {
            discovery_timeout_secs: 0.2,
            ..local_config(silent.local_addr().unwrap().port())
        };

        let err = probe(&config).unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_discover_loads_inventory() {
        let (port, responder) = spawn_responder(fake_hub_reply());
        let hub = ScriptedHub::replies(vec![header(1, 0), group_record(2, [0x0a, 0x02], "Den")]);

        let qsync = discover_with(&local_config(port), hub.clone()).unwrap();
        responder.join().unwrap();

        assert_eq!(qsync.host(), "127.0.0.1");
        let identity = qsync.identity().unwrap();
        assert_eq!(identity.name, "Bedroom Qsync");
        assert_eq!(qsync.inventory().groups[0].name, "Den");
        assert_eq!(hub.connects(), 1);
    }
}

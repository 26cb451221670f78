//! Hub session handle.

use std::time::Duration;

use qsync_protocol::{AppliedCommand, GroupsAndScenes, HubIdentity, ShadeGroupCommand};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::control::{plan_positions, send_positions};
use crate::inventory::fetch_groups_and_scenes;
use crate::transport::{Connector, TcpConnector};
use crate::Result;

/// A Qsync hub.
///
/// Holds no open connection: every operation connects, does its exchange,
/// and closes the connection before returning, whether it succeeded or not.
#[derive(Debug, Clone)]
pub struct Qsync<C = TcpConnector> {
    host: String,
    config: ClientConfig,
    connector: C,
    identity: Option<HubIdentity>,
    inventory: GroupsAndScenes,
}

impl Qsync<TcpConnector> {
    /// Create a handle for the hub at `host` with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_config(host, ClientConfig::default())
    }

    /// Create a handle for the hub at `host`.
    pub fn with_config(host: impl Into<String>, config: ClientConfig) -> Self {
        let connector = TcpConnector::new(&config);
        Self::with_connector(host, config, connector)
    }
}

impl<C: Connector> Qsync<C> {
    /// Create a handle that opens connections through `connector`.
    pub fn with_connector(host: impl Into<String>, config: ClientConfig, connector: C) -> Self {
        Qsync {
            host: host.into(),
            config,
            connector,
            identity: None,
            inventory: GroupsAndScenes::default(),
        }
    }

    /// Hostname or address of the hub.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Per-call timeout for control exchanges.
    pub fn timeout(&self) -> Duration {
        self.config.timeout()
    }

    /// Name and hardware id, when the hub was found by discovery.
    pub fn identity(&self) -> Option<&HubIdentity> {
        self.identity.as_ref()
    }

    pub(crate) fn set_identity(&mut self, identity: HubIdentity) {
        self.identity = Some(identity);
    }

    /// Groups and scenes from the last [`Qsync::refresh`], or discovery.
    pub fn inventory(&self) -> &GroupsAndScenes {
        &self.inventory
    }

    /// Retrieve the hub's current groups and scenes.
    pub fn get_groups_and_scenes(&self) -> Result<GroupsAndScenes> {
        let mut transport = self.connector.connect(&self.host)?;
        let catalog = fetch_groups_and_scenes(&mut transport, self.config.drain_timeout())?;
        debug!(
            "Qsync: [{}] has {} group(s), {} scene(s)",
            self.host,
            catalog.groups.len(),
            catalog.scenes.len()
        );
        Ok(catalog)
    }

    /// Retrieve groups and scenes and keep them on this handle.
    pub fn refresh(&mut self) -> Result<&GroupsAndScenes> {
        self.inventory = self.get_groups_and_scenes()?;
        Ok(&self.inventory)
    }

    /// Move up to eight groups.
    ///
    /// Percentages are rounded to the nearest supported stop, so the
    /// returned commands report the position actually requested from the
    /// hub. More than eight commands is rejected before connecting.
    pub fn set_group_position(&self, commands: &[ShadeGroupCommand]) -> Result<Vec<AppliedCommand>> {
        let (command, applied) = plan_positions(commands)?;

        let mut transport = self.connector.connect(&self.host)?;
        send_positions(&mut transport, &command)?;

        for command in &applied {
            info!("Qsync: moved {} to {}", command.group, command.position);
        }
        Ok(applied)
    }

    /// Recall a scene stored on the hub, by exact name.
    ///
    /// The scene list is fetched fresh from the hub. Returns `None` without
    /// moving anything if no scene has that name.
    pub fn set_scene(&self, name: &str) -> Result<Option<Vec<AppliedCommand>>> {
        let catalog = self.get_groups_and_scenes()?;
        match catalog.scene(name) {
            Some(scene) => self.set_group_position(&scene.commands).map(Some),
            None => {
                debug!("Qsync: no scene named [{}] on [{}]", name, self.host);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use crate::QsyncError;
    use qsync_protocol::{Position, ShadeGroup};
    use std::sync::Arc;

    fn session(hub: &ScriptedHub) -> Qsync<ScriptedHub> {
        Qsync::with_connector("10.0.0.2", ClientConfig::default(), hub.clone())
    }

    #[test]
    fn test_set_group_position_sends_frame() {
        let hub = ScriptedHub::replies(vec![vec![0x1b, 0x00]]);
        let group = Arc::new(ShadeGroup::new(9, "Den", "0901"));

        let applied = session(&hub)
            .set_group_position(&[ShadeGroupCommand::percentage(Arc::clone(&group), 100)])
            .unwrap();

        assert_eq!(hub.connects(), 1);
        assert_eq!(hub.sent(), vec![vec![0x1b, 0x05, 0, 0, 0, 0x09, 0x02]]);
        assert_eq!(applied.len(), 1);
        assert!(Arc::ptr_eq(&applied[0].group, &group));
        assert_eq!(applied[0].position, Position::Position100);
        assert_eq!(hub.remaining(), 0);
    }

    #[test]
    fn test_nine_commands_never_connect() {
        let hub = ScriptedHub::default();
        let commands: Vec<ShadeGroupCommand> = (0..9)
            .map(|channel| ShadeGroupCommand::percentage(ShadeGroup::from_channel(channel), 10))
            .collect();

        let err = session(&hub).set_group_position(&commands).unwrap_err();

        assert!(matches!(err, QsyncError::Input(_)));
        assert_eq!(hub.connects(), 0);
        assert!(hub.sent().is_empty());
    }

    #[test]
    fn test_set_scene_fetches_then_commands() {
        let hub = ScriptedHub::replies(vec![
            header(2, 1),
            group_record(5, [0x09, 0x01], "Living Room"),
            group_record(6, [0x09, 0x02], "Kitchen"),
            scene_record(&[([0x09, 0x01], 0x08), ([0x09, 0x02], 0x0c)], "Evening"),
            vec![0x1b, 0x00],
        ]);

        let applied = session(&hub).set_scene("Evening").unwrap().unwrap();

        assert_eq!(hub.connects(), 2);
        assert_eq!(
            hub.sent(),
            vec![
                vec![0x16, 0x00],
                vec![0x1b, 0x0a, 0, 0, 0, 0x05, 0x08, 0, 0, 0, 0x06, 0x0c],
            ]
        );
        assert_eq!(applied[0].position, Position::Position50);
        assert_eq!(applied[1].position, Position::Position75);
    }

    #[test]
    fn test_set_unknown_scene_is_noop() {
        let hub = ScriptedHub::replies(vec![header(1, 0), group_record(5, [0x09, 0x01], "Den")]);

        assert_eq!(session(&hub).set_scene("Morning").unwrap(), None);
        assert_eq!(hub.connects(), 1);
        assert_eq!(hub.sent().len(), 1);
    }

    #[test]
    fn test_refresh_keeps_inventory() {
        let hub = ScriptedHub::replies(vec![header(1, 0), group_record(5, [0x09, 0x01], "Den")]);
        let mut qsync = session(&hub);
        assert!(qsync.inventory().groups.is_empty());

        qsync.refresh().unwrap();

        assert_eq!(qsync.inventory().groups[0].name, "Den");
        assert_eq!(qsync.host(), "10.0.0.2");
        assert_eq!(qsync.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_with_config_tolerates_unvalidated_timeouts() {
        for secs in [1e300, -1.0] {
            let config = ClientConfig {
                timeout_secs: secs,
                ..Default::default()
            };
            let qsync = Qsync::with_config("10.0.0.2", config);
            assert_eq!(qsync.timeout(), Duration::from_secs(20));
        }
    }
}

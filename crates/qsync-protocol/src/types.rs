//! Groups, scenes and commands exchanged with the hub.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ProtocolError;
use crate::position::Position;

/// A set of shades that move together, as programmed into the hub.
///
/// Group membership lives on the shades themselves; the hub only knows the
/// group's channel, wire code and display name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShadeGroup {
    /// Hub-assigned addressable index, used when issuing commands.
    pub channel: u8,
    /// Display name (may be empty).
    pub name: String,
    /// Two-byte wire identifier, hex encoded. Unique per hub.
    pub code: String,
}

impl ShadeGroup {
    /// Create a fully described group.
    pub fn new(channel: u8, name: impl Into<String>, code: impl Into<String>) -> Self {
        ShadeGroup {
            channel,
            name: name.into(),
            code: code.into(),
        }
    }

    /// Create a placeholder that only knows its channel, enough to address
    /// the group in a command.
    pub fn from_channel(channel: u8) -> Self {
        ShadeGroup {
            channel,
            ..Default::default()
        }
    }
}

impl fmt::Display for ShadeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "channel {} [{}]", self.channel, self.code)
        } else {
            write!(f, "{} (channel {} [{}])", self.name, self.channel, self.code)
        }
    }
}

/// Desired position for a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Percentage closed, 0-100. Rounded to the nearest supported stop.
    Percentage(i32),
    /// Raw two-digit wire position code, as stored in scenes.
    PositionCode(String),
}

impl Target {
    /// Resolve to a supported position.
    ///
    /// Percentages never fail; an unknown wire code does.
    pub fn resolve(&self) -> Result<Position, ProtocolError> {
        match self {
            Target::Percentage(percentage) => Ok(Position::for_percentage(*percentage)),
            Target::PositionCode(code) => Position::from_code(code),
        }
    }
}

/// A (group, desired position) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeGroupCommand {
    /// Group to move.
    pub group: Arc<ShadeGroup>,
    /// Where to move it.
    pub target: Target,
}

impl ShadeGroupCommand {
    /// Move `group` to a percentage closed.
    pub fn percentage(group: impl Into<Arc<ShadeGroup>>, percentage: i32) -> Self {
        ShadeGroupCommand {
            group: group.into(),
            target: Target::Percentage(percentage),
        }
    }

    /// Move `group` to the position with the given wire code.
    pub fn position_code(group: impl Into<Arc<ShadeGroup>>, code: impl Into<String>) -> Self {
        ShadeGroupCommand {
            group: group.into(),
            target: Target::PositionCode(code.into()),
        }
    }
}

/// A command as actually sent, after quantizing to a supported stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCommand {
    /// Group that was moved.
    pub group: Arc<ShadeGroup>,
    /// Position the hub was told to move to.
    pub position: Position,
}

impl AppliedCommand {
    /// Percentage achieved, which may differ from the one requested.
    pub fn percentage(&self) -> f32 {
        self.position.percentage()
    }
}

/// One group reference inside a scene record, before the group is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    /// Wire code of the referenced group.
    pub group_code: String,
    /// Wire position code the group moves to.
    pub position_code: String,
}

/// A scene as parsed off the wire, with group references unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRecord {
    /// Scene name.
    pub name: String,
    /// Group references, in wire order.
    pub entries: Vec<SceneEntry>,
}

impl SceneRecord {
    /// Resolve every group reference against the hub's group catalog.
    ///
    /// Consumes the record, so a scene can only be hydrated once.
    pub fn hydrate(self, groups: &GroupIndex) -> Result<Scene, ProtocolError> {
        let mut commands = Vec::with_capacity(self.entries.len());
        for entry in self.entries {
            let group = groups.get(&entry.group_code).cloned().ok_or_else(|| {
                ProtocolError::UnknownGroupCode {
                    scene: self.name.clone(),
                    code: entry.group_code.clone(),
                }
            })?;
            commands.push(ShadeGroupCommand {
                group,
                target: Target::PositionCode(entry.position_code),
            });
        }

        Ok(Scene {
            name: self.name,
            commands,
        })
    }
}

/// Groups keyed by wire code.
pub type GroupIndex = HashMap<String, Arc<ShadeGroup>>;

/// Build a code → group lookup. Later duplicates replace earlier ones.
pub fn index_groups(groups: &[Arc<ShadeGroup>]) -> GroupIndex {
    groups
        .iter()
        .map(|group| (group.code.clone(), Arc::clone(group)))
        .collect()
}

/// A named bundle of up to eight group positions stored on the hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// Scene name.
    pub name: String,
    /// Group commands, in wire order.
    pub commands: Vec<ShadeGroupCommand>,
}

/// Snapshot of a hub's groups and scenes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupsAndScenes {
    /// All groups.
    pub groups: Vec<Arc<ShadeGroup>>,
    /// All scenes, hydrated.
    pub scenes: Vec<Scene>,
}

impl GroupsAndScenes {
    /// Find a group by channel.
    pub fn group_by_channel(&self, channel: u8) -> Option<&Arc<ShadeGroup>> {
        self.groups.iter().find(|group| group.channel == channel)
    }

    /// Find a group by display name, ignoring case.
    pub fn group_by_name(&self, name: &str) -> Option<&Arc<ShadeGroup>> {
        self.groups
            .iter()
            .find(|group| group.name.eq_ignore_ascii_case(name))
    }

    /// Find the first scene with exactly this name.
    pub fn scene(&self, name: &str) -> Option<&Scene> {
        self.scenes.iter().find(|scene| scene.name == name)
    }
}

/// Identity reported by a hub in its discovery reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubIdentity {
    /// Hub name.
    pub name: String,
    /// Hardware identifier, hex encoded.
    pub hardware_id: String,
}

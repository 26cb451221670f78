//! Rendering results for the terminal.

use qsync_protocol::{AppliedCommand, GroupsAndScenes, HubIdentity, Position, Target};
use serde::Serialize;

/// What `discover` prints.
#[derive(Debug, Serialize)]
pub struct DiscoveryReport<'a> {
    pub host: &'a str,
    pub identity: Option<&'a HubIdentity>,
    pub inventory: &'a GroupsAndScenes,
}

/// Render a value as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn describe_target(target: &Target) -> String {
    match target {
        Target::Percentage(p) => format!("{}%", p),
        Target::PositionCode(code) => match Position::from_code(code) {
            Ok(position) => position.to_string(),
            Err(_) => format!("code {}", code),
        },
    }
}

/// Render groups and scenes as an indented listing.
pub fn inventory_text(inventory: &GroupsAndScenes) -> String {
    let mut out = String::new();

    out.push_str(&format!("Groups ({}):\n", inventory.groups.len()));
    for group in &inventory.groups {
        out.push_str(&format!("  {:>3}  {:<20} [{}]\n", group.channel, group.name, group.code));
    }

    out.push_str(&format!("Scenes ({}):\n", inventory.scenes.len()));
    for scene in &inventory.scenes {
        out.push_str(&format!("  {}\n", scene.name));
        for command in &scene.commands {
            out.push_str(&format!(
                "       {:<20} -> {}\n",
                command.group.name,
                describe_target(&command.target)
            ));
        }
    }

    out
}

/// Render a discovery result.
pub fn discovery_text(report: &DiscoveryReport<'_>) -> String {
    let mut out = match report.identity {
        Some(identity) => format!(
            "Found {} at {} (hardware id {})\n",
            identity.name, report.host, identity.hardware_id
        ),
        None => format!("Found hub at {}\n", report.host),
    };
    out.push_str(&inventory_text(report.inventory));
    out
}

/// Render the commands actually sent.
pub fn applied_text(applied: &[AppliedCommand]) -> String {
    applied
        .iter()
        .map(|command| format!("{} -> {}\n", command.group, command.position))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsync_protocol::{Scene, ShadeGroup, ShadeGroupCommand};
    use std::sync::Arc;

    fn catalog() -> GroupsAndScenes {
        let den = Arc::new(ShadeGroup::new(5, "Den", "0901"));
        GroupsAndScenes {
            groups: vec![Arc::clone(&den)],
            scenes: vec![Scene {
                name: "Evening".to_string(),
                commands: vec![ShadeGroupCommand::position_code(den, "0b")],
            }],
        }
    }

    #[test]
    fn test_inventory_text() {
        let text = inventory_text(&catalog());
        assert!(text.contains("Groups (1):"));
        assert!(text.contains("Den"));
        assert!(text.contains("[0901]"));
        assert!(text.contains("Evening"));
        assert!(text.contains("-> 62.5%"));
    }

    #[test]
    fn test_applied_text() {
        let applied = vec![AppliedCommand {
            group: Arc::new(ShadeGroup::new(5, "Den", "0901")),
            position: Position::Position100,
        }];
        assert_eq!(applied_text(&applied), "Den (channel 5 [0901]) -> 100%\n");
    }

    #[test]
    fn test_discovery_json() {
        let inventory = catalog();
        let identity = HubIdentity {
            name: "Front".to_string(),
            hardware_id: "001ec0010203".to_string(),
        };
        let json = to_json(&DiscoveryReport {
            host: "10.0.0.2",
            identity: Some(&identity),
            inventory: &inventory,
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["identity"]["hardware_id"], "001ec0010203");
        assert_eq!(value["inventory"]["groups"][0]["channel"], 5);
        assert_eq!(
            value["inventory"]["scenes"][0]["commands"][0]["target"]["position_code"],
            "0b"
        );
    }
}

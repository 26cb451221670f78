//! Group position commands.

use std::sync::Arc;

use qsync_protocol::{
    bytes_to_hex, AppliedCommand, Command, GroupPosition, ShadeGroupCommand,
    MAX_GROUPS_PER_COMMAND,
};
use tracing::debug;

use crate::inventory::send_command;
use crate::transport::Transport;
use crate::{QsyncError, Result};

/// Resolve each requested target to a supported position and build the
/// command frame. Performs no I/O.
///
/// Returns the frame together with what each group will actually be moved
/// to, in input order.
pub fn plan_positions(commands: &[ShadeGroupCommand]) -> Result<(Command, Vec<AppliedCommand>)> {
    if commands.len() > MAX_GROUPS_PER_COMMAND {
        return Err(QsyncError::Input(format!(
            "cannot specify more than {} groups to control, got {}",
            MAX_GROUPS_PER_COMMAND,
            commands.len()
        )));
    }

    let mut slots = Vec::with_capacity(commands.len());
    let mut applied = Vec::with_capacity(commands.len());
    for command in commands {
        let position = command.target.resolve()?;
        slots.push(GroupPosition {
            channel: command.group.channel,
            position,
        });
        applied.push(AppliedCommand {
            group: Arc::clone(&command.group),
            position,
        });
    }

    Ok((Command::SetPositions(slots), applied))
}

/// Send a set-positions command and consume the hub's reply.
///
/// The reply carries no per-group acknowledgment; it is only logged.
pub fn send_positions<T: Transport>(transport: &mut T, command: &Command) -> Result<()> {
    send_command(transport, command)?;
    let reply = transport.recv()?;
    debug!("Qsync: receive [{}]", bytes_to_hex(&reply));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedHub;
    use crate::transport::Connector;
    use qsync_protocol::{Position, ProtocolError, ShadeGroup};

    fn group(channel: u8) -> Arc<ShadeGroup> {
        Arc::new(ShadeGroup::from_channel(channel))
    }

    #[test]
    fn test_plan_quantizes_percentages() {
        let (command, applied) = plan_positions(&[
            ShadeGroupCommand::percentage(group(9), 0),
            ShadeGroupCommand::percentage(group(3), 60),
        ])
        .unwrap();

        assert_eq!(command.to_hex().unwrap(), "1b0a0000000901000000030b");
        assert_eq!(applied[0].position, Position::Position0);
        assert_eq!(applied[1].position, Position::Position62_5);
        assert_eq!(applied[1].percentage(), 62.5);
        assert_eq!(applied[1].group.channel, 3);
    }

    #[test]
    fn test_plan_position_code() {
        let (command, applied) =
            plan_positions(&[ShadeGroupCommand::position_code(group(4), "0e")]).unwrap();
        assert_eq!(command.to_hex().unwrap(), "1b05000000040e");
        assert_eq!(applied[0].percentage(), 87.5);
    }

    #[test]
    fn test_plan_unknown_position_code() {
        let err = plan_positions(&[ShadeGroupCommand::position_code(group(4), "zz")]).unwrap_err();
        assert!(matches!(
            err,
            QsyncError::UnexpectedData(ProtocolError::UnknownPositionCode(_))
        ));
    }

    #[test]
    fn test_plan_rejects_more_than_eight() {
        let commands: Vec<ShadeGroupCommand> = (0..9)
            .map(|channel| ShadeGroupCommand::percentage(group(channel), 50))
            .collect();
        assert!(matches!(
            plan_positions(&commands),
            Err(QsyncError::Input(_))
        ));
        assert!(plan_positions(&commands[..8]).is_ok());
    }

    #[test]
    fn test_oversized_frame_is_input_and_never_sent() {
        let hub = ScriptedHub::replies(vec![vec![0x1b, 0x00]]);
        let mut transport = hub.connect("hub").unwrap();
        let slots = (0..60)
            .map(|channel| GroupPosition {
                channel,
                position: Position::Position50,
            })
            .collect();

        let err = send_positions(&mut transport, &Command::SetPositions(slots)).unwrap_err();

        assert!(matches!(err, QsyncError::Input(_)));
        assert!(hub.sent().is_empty());
        assert_eq!(hub.remaining(), 1);
    }
}

//! Commands that can be sent to the hub.

use bytes::{BufMut, BytesMut};

use crate::codec::bytes_to_hex;
use crate::constants::*;
use crate::error::ProtocolError;
use crate::position::Position;

/// One group's slot in a set-positions command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPosition {
    /// Channel of the group to move.
    pub channel: u8,
    /// Position to move it to.
    pub position: Position,
}

/// Commands that can be sent to the hub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Request the inventory header; the hub follows it with every group
    /// and scene definition.
    RequestHeader,

    /// Move up to eight groups at once.
    SetPositions(Vec<GroupPosition>),
}

impl Command {
    /// Encode the command for transmission.
    ///
    /// Set-positions frames are `1b <len> (00 00 00 <channel> <code>)*`,
    /// where `<len>` counts body bytes. More than
    /// [`MAX_GROUPS_PER_COMMAND`] groups is rejected.
    pub fn encode(&self) -> Result<Vec<u8>, ProtocolError> {
        match self {
            Command::RequestHeader => Ok(CMD_REQUEST_HEADER.to_vec()),
            Command::SetPositions(groups) => {
                if groups.len() > MAX_GROUPS_PER_COMMAND {
                    return Err(ProtocolError::TooManyGroups {
                        max: MAX_GROUPS_PER_COMMAND,
                        actual: groups.len(),
                    });
                }

                let mut body = BytesMut::with_capacity(groups.len() * 5);
                for group in groups {
                    body.put_slice(&COMMAND_GROUP_PAD);
                    body.put_u8(group.channel);
                    body.put_u8(group.position.wire_byte());
                }

                let mut frame = BytesMut::with_capacity(2 + body.len());
                frame.put_u8(CMD_SET_POSITIONS);
                // At most 8 groups of 5 bytes, so the length fits
                frame.put_u8(body.len() as u8);
                frame.put_slice(&body);
                Ok(frame.to_vec())
            }
        }
    }

    /// Encode the command as hex text, as it appears in logs.
    pub fn to_hex(&self) -> Result<String, ProtocolError> {
        Ok(bytes_to_hex(&self.encode()?))
    }
}

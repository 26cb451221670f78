//! Classification and decoding of hub records.
//!
//! Every reply from the hub is one record, identified by its two leading
//! bytes. There is no length prefix; a record is whatever one socket read
//! returned. Fields live at fixed byte offsets:
//!
//! ```text
//! header:  16 04 ?? <groups> ?? <scenes> [?? ?? <embedded record>]
//! group:   16 2c ?? <channel> ... <code:2 @24> <name @26..>
//! scene:   16 3b ?? <refs: 8 x (code:2, position:1) @3..27> ... <name @41..>
//! ```

use crate::codec::{bytes_to_hex, decode_padded_text, hex_to_bytes};
use crate::constants::*;
use crate::error::ProtocolError;
use crate::types::{HubIdentity, SceneEntry, SceneRecord, ShadeGroup};

/// Kind of record, determined by its tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Inventory header (`1604`).
    Header,
    /// Group definition (`162c`).
    GroupDef,
    /// Scene definition (`163b`).
    SceneDef,
    /// Anything else, including records too short to carry a tag.
    Unknown,
}

impl RecordKind {
    /// Classify a record by its two-byte tag.
    pub fn classify(data: &[u8]) -> Self {
        match data.get(..2) {
            Some(tag) if tag == TAG_HEADER => RecordKind::Header,
            Some(tag) if tag == TAG_GROUP => RecordKind::GroupDef,
            Some(tag) if tag == TAG_SCENE => RecordKind::SceneDef,
            _ => RecordKind::Unknown,
        }
    }
}

/// Counts announced by an inventory header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InventoryHeader {
    /// Number of group definitions that follow.
    pub group_count: u8,
    /// Number of scene definitions that follow.
    pub scene_count: u8,
}

impl InventoryHeader {
    /// Total number of records that follow the header.
    pub fn record_count(&self) -> usize {
        usize::from(self.group_count) + usize::from(self.scene_count)
    }
}

/// A decoded header reply.
///
/// The hub sometimes appends the first group or scene definition to the
/// header instead of sending it as its own record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderFrame {
    /// Header only.
    Bare(InventoryHeader),
    /// Header followed by the first inventory record.
    WithEmbeddedRecord(InventoryHeader, Vec<u8>),
}

impl HeaderFrame {
    /// The counts carried by this header.
    pub fn header(&self) -> InventoryHeader {
        match self {
            HeaderFrame::Bare(header) | HeaderFrame::WithEmbeddedRecord(header, _) => *header,
        }
    }

    /// Split into the counts and the embedded record, if any.
    pub fn into_parts(self) -> (InventoryHeader, Option<Vec<u8>>) {
        match self {
            HeaderFrame::Bare(header) => (header, None),
            HeaderFrame::WithEmbeddedRecord(header, record) => (header, Some(record)),
        }
    }
}

/// An inventory record following the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Group definition.
    Group(ShadeGroup),
    /// Scene definition with unresolved group references.
    Scene(SceneRecord),
    /// A record that is neither; inventory retrieval skips these.
    Ignored(RecordKind),
}

impl Record {
    /// Classify and decode one inventory record.
    pub fn decode(data: &[u8]) -> Result<Self, ProtocolError> {
        match RecordKind::classify(data) {
            RecordKind::GroupDef => Ok(Record::Group(parse_group(data)?)),
            RecordKind::SceneDef => Ok(Record::Scene(parse_scene(data)?)),
            kind => Ok(Record::Ignored(kind)),
        }
    }

    /// Decode a record given as hex text.
    pub fn from_hex(text: &str) -> Result<Self, ProtocolError> {
        Record::decode(&hex_to_bytes(text)?)
    }
}

fn expect_tag(data: &[u8], tag: [u8; 2]) -> Result<(), ProtocolError> {
    match data.get(..2) {
        Some(actual) if actual == tag => Ok(()),
        Some(actual) => Err(ProtocolError::UnexpectedTag {
            expected: bytes_to_hex(&tag),
            actual: bytes_to_hex(actual),
        }),
        None => Err(ProtocolError::too_short(2, data.len())),
    }
}

fn expect_len(data: &[u8], expected: usize) -> Result<(), ProtocolError> {
    if data.len() < expected {
        return Err(ProtocolError::too_short(expected, data.len()));
    }
    Ok(())
}

/// Decode a header reply.
///
/// The all-`ff` sentinel is reported as [`ProtocolError::HubBadState`].
pub fn parse_header(data: &[u8]) -> Result<HeaderFrame, ProtocolError> {
    expect_tag(data, TAG_HEADER)?;
    if data == HEADER_BAD_STATE {
        return Err(ProtocolError::HubBadState);
    }
    expect_len(data, HEADER_LEN)?;

    let header = InventoryHeader {
        group_count: data[HEADER_GROUP_COUNT_OFFSET],
        scene_count: data[HEADER_SCENE_COUNT_OFFSET],
    };

    if data.len() > HEADER_LEN {
        let start = HEADER_EMBEDDED_RECORD_OFFSET.min(data.len());
        Ok(HeaderFrame::WithEmbeddedRecord(header, data[start..].to_vec()))
    } else {
        Ok(HeaderFrame::Bare(header))
    }
}

/// Decode a group definition.
pub fn parse_group(data: &[u8]) -> Result<ShadeGroup, ProtocolError> {
    expect_tag(data, TAG_GROUP)?;
    expect_len(data, GROUP_NAME_OFFSET)?;

    let channel = data[GROUP_CHANNEL_OFFSET];
    let code = bytes_to_hex(&data[GROUP_CODE_OFFSET..GROUP_NAME_OFFSET]);
    let name = decode_padded_text(&data[GROUP_NAME_OFFSET..])?;

    log::debug!("Group name [{}], channel [{}], code [{}]", name, channel, code);

    Ok(ShadeGroup {
        channel,
        name,
        code,
    })
}

/// Decode a scene definition. Group references are left unresolved.
pub fn parse_scene(data: &[u8]) -> Result<SceneRecord, ProtocolError> {
    expect_tag(data, TAG_SCENE)?;
    expect_len(data, SCENE_NAME_OFFSET)?;

    let name = decode_padded_text(&data[SCENE_NAME_OFFSET..])?;

    // An all-zero reference terminates the list early
    let entries: Vec<SceneEntry> = data[SCENE_REFS_OFFSET..SCENE_REFS_END]
        .chunks_exact(SCENE_REF_LEN)
        .take_while(|chunk| chunk.iter().any(|&b| b != 0))
        .map(|chunk| SceneEntry {
            group_code: bytes_to_hex(&chunk[..2]),
            position_code: bytes_to_hex(&chunk[2..]),
        })
        .collect();

    log::debug!("Scene name [{}], {} group(s)", name, entries.len());
    for entry in &entries {
        log::trace!(
            "Scene [{}] group code [{}], position code [{}]",
            name,
            entry.group_code,
            entry.position_code
        );
    }

    Ok(SceneRecord { name, entries })
}

/// Decode a hub's reply to the discovery broadcast.
///
/// The name occupies the first 15 bytes; bytes 16..22 are the hardware
/// identifier, kept as hex.
pub fn parse_discovery_reply(data: &[u8]) -> Result<HubIdentity, ProtocolError> {
    expect_len(data, DISCOVERY_HARDWARE_ID_END)?;

    let name = decode_padded_text(&data[..DISCOVERY_NAME_LEN])?
        .trim_start()
        .to_string();
    let hardware_id = bytes_to_hex(&data[DISCOVERY_HARDWARE_ID_OFFSET..DISCOVERY_HARDWARE_ID_END]);

    Ok(HubIdentity { name, hardware_id })
}

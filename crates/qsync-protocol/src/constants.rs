//! Protocol constants
//!
//! Ports, record tags, and fixed offsets used by the Qsync line protocol.
//! Offsets are in bytes from the start of a record (tag included).

// ============================================================================
// Ports and Addresses
// ============================================================================

/// TCP port the hub listens on for control and inventory queries.
pub const TCP_PORT: u16 = 9760;
/// UDP port the hub listens on for discovery broadcasts.
pub const UDP_PORT: u16 = 9720;
/// Limited broadcast address used for discovery.
pub const BROADCAST_ADDRESS: &str = "255.255.255.255";

// ============================================================================
// Record Tags (hub → host)
// ============================================================================

/// Header record: group and scene counts.
pub const TAG_HEADER: [u8; 2] = [0x16, 0x04];
/// Group definition record.
pub const TAG_GROUP: [u8; 2] = [0x16, 0x2c];
/// Scene definition record.
pub const TAG_SCENE: [u8; 2] = [0x16, 0x3b];

// ============================================================================
// Command Codes (host → hub)
// ============================================================================

/// Request the header and full group/scene inventory.
pub const CMD_REQUEST_HEADER: [u8; 2] = [0x16, 0x00];
/// Set positions for one or more groups.
pub const CMD_SET_POSITIONS: u8 = 0x1b;

/// Maximum number of groups a single set-positions command may carry.
pub const MAX_GROUPS_PER_COMMAND: usize = 8;

/// Zero pad preceding each channel in a set-positions body.
pub const COMMAND_GROUP_PAD: [u8; 3] = [0x00; 3];

// ============================================================================
// Header Layout
// ============================================================================

/// Length of a bare header record.
pub const HEADER_LEN: usize = 6;
/// Offset of the group count byte.
pub const HEADER_GROUP_COUNT_OFFSET: usize = 3;
/// Offset of the scene count byte.
pub const HEADER_SCENE_COUNT_OFFSET: usize = 5;
/// Offset at which a record appended to the header begins.
pub const HEADER_EMBEDDED_RECORD_OFFSET: usize = 8;
/// Header the hub sends when it is wedged mid-conversation.
pub const HEADER_BAD_STATE: [u8; 6] = [0x16, 0x04, 0xff, 0xff, 0xff, 0xff];

// ============================================================================
// Group Definition Layout
// ============================================================================

/// Offset of the channel byte.
pub const GROUP_CHANNEL_OFFSET: usize = 3;
/// Offset of the 2-byte group code.
pub const GROUP_CODE_OFFSET: usize = 24;
/// Offset of the NUL-padded display name.
pub const GROUP_NAME_OFFSET: usize = 26;

// ============================================================================
// Scene Definition Layout
// ============================================================================

/// Offset of the group reference block.
pub const SCENE_REFS_OFFSET: usize = 3;
/// Offset one past the end of the group reference block.
pub const SCENE_REFS_END: usize = 27;
/// Size of one group reference: 2-byte group code + 1-byte position code.
pub const SCENE_REF_LEN: usize = 3;
/// Offset of the NUL-padded scene name.
pub const SCENE_NAME_OFFSET: usize = 41;

// ============================================================================
// Discovery Reply Layout
// ============================================================================

/// Payload broadcast to find hubs: a single zero byte.
pub const DISCOVERY_PROBE: [u8; 1] = [0x00];
/// Length of the NUL-padded hub name at the start of a discovery reply.
pub const DISCOVERY_NAME_LEN: usize = 15;
/// Offset of the hardware identifier.
pub const DISCOVERY_HARDWARE_ID_OFFSET: usize = 16;
/// Offset one past the end of the hardware identifier.
pub const DISCOVERY_HARDWARE_ID_END: usize = 22;

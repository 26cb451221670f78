//! Group and scene inventory retrieval.
//!
//! The hub answers a `1600` request with a header announcing N groups and
//! M scenes, then streams N + M definition records, one per read. The first
//! record is sometimes appended to the header itself.
//!
//! The hub does not reset its conversation when a TCP connection closes, so
//! a new session can land in the middle of an old one. The hub signals this
//! with a `1604ffffffff` header; we drain whatever it still has queued and
//! ask once more.

use std::sync::Arc;
use std::time::Duration;

use qsync_protocol::{
    bytes_to_hex, index_groups, parse_header, Command, GroupsAndScenes, HeaderFrame, Record,
};
use tracing::{debug, trace, warn};

use crate::transport::Transport;
use crate::{QsyncError, Result};

/// Send a command and log it.
pub(crate) fn send_command<T: Transport>(transport: &mut T, command: &Command) -> Result<()> {
    let data = command.encode()?;
    transport.send(&data)?;
    debug!("Qsync: send [{}]", bytes_to_hex(&data));
    Ok(())
}

/// Request the inventory header and decode the reply.
pub fn request_header<T: Transport>(transport: &mut T) -> Result<HeaderFrame> {
    send_command(transport, &Command::RequestHeader)?;

    let data = transport.recv()?;
    debug!("Qsync: receive [{}]", bytes_to_hex(&data));

    Ok(parse_header(&data)?)
}

/// Request the header, recovering once from a wedged hub.
fn request_header_with_recovery<T: Transport>(
    transport: &mut T,
    drain_quiet: Duration,
) -> Result<HeaderFrame> {
    match request_header(transport) {
        Err(QsyncError::UnexpectedData(err)) => {
            warn!("Qsync: bad header ({}), clearing socket and retrying", err);
            let discarded = transport.drain(drain_quiet)?;
            debug!("Qsync: cleared {} byte(s) from socket", discarded);
            request_header(transport)
        }
        other => other,
    }
}

/// Retrieve every group and scene over an open transport.
///
/// Scenes come back hydrated: each command points at the same
/// `Arc<ShadeGroup>` held in the group list.
pub fn fetch_groups_and_scenes<T: Transport>(
    transport: &mut T,
    drain_quiet: Duration,
) -> Result<GroupsAndScenes> {
    let (header, mut embedded) = request_header_with_recovery(transport, drain_quiet)?.into_parts();
    debug!("Qsync: number of groups [{}]", header.group_count);
    debug!("Qsync: number of scenes [{}]", header.scene_count);

    let mut groups = Vec::with_capacity(usize::from(header.group_count));
    let mut scene_records = Vec::with_capacity(usize::from(header.scene_count));

    for _ in 0..header.record_count() {
        let data = match embedded.take() {
            Some(record) => record,
            None => transport.recv()?,
        };
        trace!("Qsync: receive [{}]", bytes_to_hex(&data));

        match Record::decode(&data)? {
            Record::Group(group) => groups.push(Arc::new(group)),
            Record::Scene(scene) => scene_records.push(scene),
            Record::Ignored(kind) => {
                debug!("Qsync: skipping {:?} record [{}]", kind, bytes_to_hex(&data))
            }
        }
    }

    let index = index_groups(&groups);
    let scenes = scene_records
        .into_iter()
        .map(|scene| scene.hydrate(&index))
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(GroupsAndScenes { groups, scenes })
}

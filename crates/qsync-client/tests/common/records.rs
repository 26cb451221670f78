//! Builders for hub records laid out the way the hardware sends them.
//!
//! Shared by unit tests in `src/` and the integration tests here.

#![allow(dead_code)]

/// Header a wedged hub sends instead of real counts.
pub const BAD_HEADER: [u8; 6] = [0x16, 0x04, 0xff, 0xff, 0xff, 0xff];

/// Build a bare header announcing `groups` and `scenes` records.
pub fn header(groups: u8, scenes: u8) -> Vec<u8> {
    vec![0x16, 0x04, 0x00, groups, 0x00, scenes]
}

/// Build a group definition record.
pub fn group_record(channel: u8, code: [u8; 2], name: &str) -> Vec<u8> {
    let mut data = vec![0x16, 0x2c, 0x00, channel];
    data.resize(24, 0);
    data.extend_from_slice(&code);
    let mut name_field = name.as_bytes().to_vec();
    name_field.resize(20, 0);
    data.extend_from_slice(&name_field);
    data
}

/// Build a scene definition record from (group code, position code) refs.
pub fn scene_record(refs: &[([u8; 2], u8)], name: &str) -> Vec<u8> {
    let mut data = vec![0x16, 0x3b, 0x00];
    for (code, position) in refs {
        data.extend_from_slice(code);
        data.push(*position);
    }
    data.resize(41, 0);
    let mut name_field = name.as_bytes().to_vec();
    name_field.resize(20, 0);
    data.extend_from_slice(&name_field);
    data
}

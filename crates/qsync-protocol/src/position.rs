//! Supported shade positions.
//!
//! Shades cannot be driven to an arbitrary percentage; the hub only knows
//! nine stops, each addressed by a one-byte wire code. The codes are not
//! monotonic with the position they represent.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ProtocolError;

/// Tolerance added to each stop when rounding a percentage, in tenths of a
/// percent. Inputs within this band above a stop round down to it.
pub const HALF_BUCKET: i64 = 63;

/// A supported shade position. 0% is fully open, 100% fully closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    /// Fully open.
    Position0,
    /// 12.5% closed.
    Position12_5,
    /// 25% closed.
    Position25,
    /// 37.5% closed.
    Position37_5,
    /// 50% closed.
    Position50,
    /// 62.5% closed.
    Position62_5,
    /// 75% closed.
    Position75,
    /// 87.5% closed.
    Position87_5,
    /// Fully closed.
    Position100,
}

impl Position {
    /// Every position, in ascending order.
    pub const ALL: [Position; 9] = [
        Position::Position0,
        Position::Position12_5,
        Position::Position25,
        Position::Position37_5,
        Position::Position50,
        Position::Position62_5,
        Position::Position75,
        Position::Position87_5,
        Position::Position100,
    ];

    /// Canonical value in tenths of a percent (0..=1000).
    pub fn tenths(self) -> u16 {
        match self {
            Position::Position0 => 0,
            Position::Position12_5 => 125,
            Position::Position25 => 250,
            Position::Position37_5 => 375,
            Position::Position50 => 500,
            Position::Position62_5 => 625,
            Position::Position75 => 750,
            Position::Position87_5 => 875,
            Position::Position100 => 1000,
        }
    }

    /// Canonical value as a percentage.
    pub fn percentage(self) -> f32 {
        f32::from(self.tenths()) / 10.0
    }

    /// Wire code as sent in set-positions commands.
    pub fn wire_byte(self) -> u8 {
        match self {
            Position::Position0 => 0x01,
            Position::Position12_5 => 0x06,
            Position::Position25 => 0x07,
            Position::Position37_5 => 0x09,
            Position::Position50 => 0x08,
            Position::Position62_5 => 0x0b,
            Position::Position75 => 0x0c,
            Position::Position87_5 => 0x0e,
            Position::Position100 => 0x02,
        }
    }

    /// Wire code as two lowercase hex digits.
    pub fn code(self) -> &'static str {
        match self {
            Position::Position0 => "01",
            Position::Position12_5 => "06",
            Position::Position25 => "07",
            Position::Position37_5 => "09",
            Position::Position50 => "08",
            Position::Position62_5 => "0b",
            Position::Position75 => "0c",
            Position::Position87_5 => "0e",
            Position::Position100 => "02",
        }
    }

    /// Map a percentage to the nearest supported stop.
    ///
    /// Values at or below zero map to fully open and values past the last
    /// stop's band map to fully closed. Ties round down.
    pub fn for_percentage(percentage: i32) -> Position {
        if percentage <= 0 {
            return Position::Position0;
        }

        let scaled = i64::from(percentage) * 10;
        Position::ALL
            .into_iter()
            .find(|position| i64::from(position.tenths()) + HALF_BUCKET > scaled)
            .unwrap_or(Position::Position100)
    }

    /// Look up a position by its two-digit wire code.
    pub fn from_code(code: &str) -> Result<Position, ProtocolError> {
        Position::ALL
            .into_iter()
            .find(|position| position.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| ProtocolError::UnknownPositionCode(code.to_string()))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percentage())
    }
}

//! Hall-call travel direction.

use std::fmt;

/// Which hall button was pressed.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `true` if a call in this direction makes sense from `floor` in a
    /// building with `floors` floors: no `Up` from the top, no `Down` from 0.
    pub fn valid_from(self, floor: u32, floors: u32) -> bool {
        match self {
            Direction::Up   => floor + 1 < floors,
            Direction::Down => floor > 0,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up   => "up",
            Direction::Down => "down",
        })
    }
}

use lift_cabin::Refusal;
use lift_core::{CallId, Direction, LiftError};
use thiserror::Error;

use crate::call::CALL_DEBOUNCE_MS;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(#[from] LiftError),

    #[error("snapshot encoding error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;

/// Why a world-level command was refused.  Like [`Refusal`], these are
/// ordinary outcomes that callers log and move past.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    #[error("floor {floor} is outside the building (0..{floors})")]
    InvalidFloor { floor: u32, floors: u32 },

    #[error("cannot call {direction} from floor {floor}")]
    InvalidDirection { floor: u32, direction: Direction },

    #[error("an identical call is already live ({existing})")]
    DuplicateCall { existing: CallId },

    #[error("same call repeated within {} ms", CALL_DEBOUNCE_MS)]
    Debounced,

    #[error("cabin is not at the passenger's floor {floor}")]
    NotAtPassengerFloor { floor: u32 },

    #[error("cabin is between floors")]
    BetweenFloors,

    #[error("passenger is already in the cabin")]
    PassengerInside,

    #[error("passenger is not in the cabin")]
    NoOccupant,

    #[error(transparent)]
    Cabin(#[from] Refusal),
}

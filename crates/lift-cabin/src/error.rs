use thiserror::Error;

use crate::MIN_DOOR_HEALTH;

/// Why a cabin command was refused.
///
/// Refusals are ordinary outcomes, not faults: callers log them and carry on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Refusal {
    #[error("door health {health:.1}% is below the {}% minimum", MIN_DOOR_HEALTH)]
    DoorHealthLow { health: f64 },

    #[error("doors are held by a jam")]
    DoorsHeld,

    #[error("cabin is moving")]
    InMotion,

    #[error("load {load_kg:.0} kg would exceed the {limit_kg:.0} kg limit")]
    Overload { load_kg: f64, limit_kg: f64 },

    #[error("doors are not open far enough")]
    DoorsNotReady,

    #[error("door cooldown active for another {remaining_ms} ms")]
    Cooldown { remaining_ms: u64 },

    #[error("passenger is already inside")]
    AlreadyInside,

    #[error("no passenger inside")]
    NotInside,

    #[error("floor {floor} is already requested")]
    AlreadyRequested { floor: u32 },

    #[error("emergency stop engaged")]
    Emergency,
}

pub type CommandResult<T> = Result<T, Refusal>;

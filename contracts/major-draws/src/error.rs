use cosmwasm_std::StdError;
use thiserror::Error;
use tools_draws_common::{DrawStatus, ScheduleError};

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Schedule(#[from] ScheduleError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("draw {draw_id} not found")]
    DrawNotFound { draw_id: u64 },

    /// No active, frozen or queued draw can take the credit.
    #[error("no active or queued draw available for entries")]
    NoActiveDraw,

    #[error("draw {draw_id} configuration is locked")]
    ConfigurationLocked { draw_id: u64 },

    #[error("draw {draw_id} cannot be edited while {status}")]
    DrawNotEditable { draw_id: u64, status: DrawStatus },

    #[error("draw {draw_id} cannot move from {from} to {to}")]
    InvalidTransition {
        draw_id: u64,
        from: DrawStatus,
        to: DrawStatus,
    },

    #[error("draw schedule overlaps draw {other_draw_id}")]
    ScheduleOverlap { other_draw_id: u64 },

    #[error("draw date {draw_date} is not in the future")]
    DrawDateInPast { draw_date: u64 },

    #[error("entry count must be positive")]
    ZeroEntries,

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("entry count overflow on draw {draw_id}")]
    EntryOverflow { draw_id: u64 },

    #[error("draw {draw_id} is {status} and not accepting entries")]
    DrawNotAcceptingEntries { draw_id: u64, status: DrawStatus },

    #[error("draw {draw_id} is not completed")]
    DrawNotCompleted { draw_id: u64 },

    #[error("winner already recorded for draw {draw_id}")]
    WinnerAlreadyRecorded { draw_id: u64 },

    #[error("user {user_id} holds no entries in draw {draw_id}")]
    UserHasNoEntries { draw_id: u64, user_id: String },

    #[error("draw {draw_id} already has successor {successor_id}")]
    SuccessorExists { draw_id: u64, successor_id: u64 },
}

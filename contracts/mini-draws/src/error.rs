use cosmwasm_std::StdError;
use thiserror::Error;
use tools_draws_common::MiniDrawStatus;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("mini draw {mini_draw_id} not found")]
    MiniDrawNotFound { mini_draw_id: u64 },

    #[error("min_entries must be positive")]
    ZeroMinEntries,

    #[error("entry count must be positive")]
    ZeroEntries,

    #[error("{field} must not be empty")]
    EmptyField { field: String },

    #[error("mini draw {mini_draw_id} is {status} and not accepting entries")]
    NotAcceptingEntries {
        mini_draw_id: u64,
        status: MiniDrawStatus,
    },

    #[error("mini draw {mini_draw_id} cannot move from {from} to {to}")]
    InvalidTransition {
        mini_draw_id: u64,
        from: MiniDrawStatus,
        to: MiniDrawStatus,
    },

    #[error("entry count overflow on mini draw {mini_draw_id}")]
    EntryOverflow { mini_draw_id: u64 },

    #[error("mini draw {mini_draw_id} is not completed")]
    NotCompleted { mini_draw_id: u64 },

    #[error("winner already recorded for mini draw {mini_draw_id}")]
    WinnerAlreadyRecorded { mini_draw_id: u64 },

    #[error("user {user_id} holds no entries in mini draw {mini_draw_id}")]
    UserHasNoEntries { mini_draw_id: u64, user_id: String },
}

use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Timestamp;
use tools_draws_common::{
    DrawStatus, EntrySource, PaymentMetadata, Prize, ScheduleConfig, UserEntry,
};

use crate::lifecycle::SweepPlan;
use crate::state::{Config, CreditRecord, MajorDraw};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    /// Falls back to `ScheduleConfig::default()`
    pub schedule: Option<ScheduleConfig>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Create a queued draw. Admin only.
    CreateDraw {
        name: String,
        description: String,
        prize: Prize,
        draw_date: Timestamp,
        /// Defaults to the current block time
        activation_date: Option<Timestamp>,
    },
    /// Edit a queued, unlocked draw. Admin only.
    UpdateDraw {
        draw_id: u64,
        name: Option<String>,
        description: Option<String>,
        prize: Option<Prize>,
        draw_date: Option<Timestamp>,
        activation_date: Option<Timestamp>,
    },
    /// Make a draw's parameters immutable. Admin only.
    LockDraw { draw_id: u64 },
    /// Cancel a draw that has not completed. Admin only.
    CancelDraw { draw_id: u64 },
    /// Credit entries for a settled payment. Operator only.
    /// Replays of the same (payment_id, user_id) are no-ops.
    CreditEntries {
        payment_id: String,
        user_id: String,
        entries: u64,
        source: EntrySource,
        payment: Option<PaymentMetadata>,
    },
    /// Advance draw statuses and materialise the next draw. Anyone can call.
    Tick {},
    /// Record the winner of a completed draw. Admin only.
    RecordWinner { draw_id: u64, user_id: String },
    /// Update configuration. Admin only.
    UpdateConfig {
        admin: Option<String>,
        operator: Option<String>,
        schedule: Option<ScheduleConfig>,
    },
}

pub struct CreateDrawParams {
    pub name: String,
    pub description: String,
    pub prize: Prize,
    pub draw_date: Timestamp,
    pub activation_date: Option<Timestamp>,
}

pub struct UpdateDrawParams {
    pub draw_id: u64,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prize: Option<Prize>,
    pub draw_date: Option<Timestamp>,
    pub activation_date: Option<Timestamp>,
}

pub struct CreditEntriesParams {
    pub payment_id: String,
    pub user_id: String,
    pub entries: u64,
    pub source: EntrySource,
    pub payment: Option<PaymentMetadata>,
}

pub struct UpdateConfigParams {
    pub admin: Option<String>,
    pub operator: Option<String>,
    pub schedule: Option<ScheduleConfig>,
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(MajorDraw)]
    Draw { draw_id: u64 },
    #[returns(DrawsResponse)]
    Draws {
        status: Option<DrawStatus>,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    /// The draw in `active` or `frozen` status, if any.
    #[returns(Option<MajorDraw>)]
    CurrentDraw {},
    /// Where a credit would land right now, without writing it.
    #[returns(MajorDraw)]
    ResolveTarget { payment: Option<PaymentMetadata> },
    #[returns(DrawEntriesResponse)]
    DrawEntries {
        draw_id: u64,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(Option<UserEntry>)]
    UserEntry { draw_id: u64, user_id: String },
    #[returns(DrawTotalsResponse)]
    DrawTotals { draw_id: u64 },
    #[returns(Option<CreditRecord>)]
    Credit { payment_id: String, user_id: String },
    /// What `Tick` would do at the current block time.
    #[returns(SweepPlan)]
    PendingTransitions {},
    #[returns(Option<u64>)]
    Successor { draw_id: u64 },
}

#[cw_serde]
pub struct DrawsResponse {
    pub draws: Vec<MajorDraw>,
}

#[cw_serde]
pub struct DrawEntriesResponse {
    pub entries: Vec<UserEntry>,
}

#[cw_serde]
pub struct DrawTotalsResponse {
    pub draw_id: u64,
    /// The denormalised total stored on the draw
    pub total_entries: u64,
    /// Recomputed from the per-user records
    pub summed_entries: u64,
    pub entrant_count: u64,
    pub counted_entrants: u64,
}

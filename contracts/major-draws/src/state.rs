use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use tools_draws_common::{DrawStatus, EntrySource, Prize, ScheduleConfig, UserEntry, WinnerRecord};

use crate::error::ContractError;

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_DRAW_ID: Item<u64> = Item::new("next_draw_id");
pub const DRAWS: Map<u64, MajorDraw> = Map::new("draws");

/// One record per (draw_id, user_id).
pub const DRAW_ENTRIES: Map<(u64, &str), UserEntry> = Map::new("draw_entries");

/// Applied credits keyed by `credit_key(payment_id, user_id)`.
pub const CREDITS: Map<&[u8], CreditRecord> = Map::new("credits");

/// predecessor draw id -> successor draw id. At most one successor per draw.
pub const SUCCESSORS: Map<u64, u64> = Map::new("successors");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    /// Relays verified payment webhooks as entry credits
    pub operator: Addr,
    pub schedule: ScheduleConfig,
}

#[cw_serde]
pub struct MajorDraw {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub prize: Prize,
    pub status: DrawStatus,
    pub activation_date: Timestamp,
    pub draw_date: Timestamp,
    pub freeze_entries_at: Timestamp,
    pub configuration_locked: bool,
    pub locked_at: Option<Timestamp>,
    /// Sum of `total_entries` over this draw's `DRAW_ENTRIES`
    pub total_entries: u64,
    pub entrant_count: u64,
    /// Set when the draw was materialised from an earlier one
    pub predecessor: Option<u64>,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub winner: Option<WinnerRecord>,
}

#[cw_serde]
pub struct CreditRecord {
    pub payment_id: String,
    pub user_id: String,
    pub draw_id: u64,
    pub entries: u64,
    pub source: EntrySource,
    pub credited_at: Timestamp,
}

pub fn load_draw(storage: &dyn Storage, draw_id: u64) -> Result<MajorDraw, ContractError> {
    DRAWS
        .may_load(storage, draw_id)?
        .ok_or(ContractError::DrawNotFound { draw_id })
}

/// Every draw that can still change status, in ascending id order.
pub fn open_draws(storage: &dyn Storage) -> StdResult<Vec<MajorDraw>> {
    DRAWS
        .range(storage, None, None, Order::Ascending)
        .filter(|r| r.as_ref().map_or(true, |(_, d)| !d.status.is_terminal()))
        .map(|r| r.map(|(_, d)| d))
        .collect()
}

/// The queued draw that opens first among those `accepts` admits (ties
/// broken by id).
pub fn earliest_queued(
    draws: &[MajorDraw],
    accepts: impl Fn(&MajorDraw) -> bool,
) -> Option<&MajorDraw> {
    draws
        .iter()
        .filter(|d| d.status == DrawStatus::Queued && accepts(*d))
        .min_by_key(|d| (d.activation_date, d.id))
}

/// The draw currently `active` or `frozen`. If corrupted state ever holds
/// more than one, the lowest id wins.
pub fn current_draw(draws: &[MajorDraw]) -> Option<&MajorDraw> {
    draws.iter().find(|d| d.status.is_current())
}

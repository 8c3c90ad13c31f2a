use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use tools_draws_common::{MiniDrawStatus, Prize, UserEntry, WinnerRecord};

use crate::error::ContractError;

pub const CONFIG: Item<Config> = Item::new("config");
pub const NEXT_MINI_DRAW_ID: Item<u64> = Item::new("next_mini_draw_id");
pub const MINI_DRAWS: Map<u64, MiniDraw> = Map::new("mini_draws");
pub const MINI_DRAW_ENTRIES: Map<(u64, &str), UserEntry> = Map::new("mini_draw_entries");
pub const CREDITS: Map<&[u8], MiniCreditRecord> = Map::new("credits");

#[cw_serde]
pub struct Config {
    pub admin: Addr,
    pub operator: Addr,
}

#[cw_serde]
pub struct MiniDraw {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub prize: Prize,
    pub status: MiniDrawStatus,
    /// Reaching this many entries closes the draw
    pub min_entries: u64,
    pub total_entries: u64,
    pub entrant_count: u64,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub winner: Option<WinnerRecord>,
}

#[cw_serde]
pub struct MiniCreditRecord {
    pub payment_id: String,
    pub user_id: String,
    pub mini_draw_id: u64,
    pub entries: u64,
    pub credited_at: Timestamp,
}

pub fn load_mini_draw(storage: &dyn Storage, mini_draw_id: u64) -> Result<MiniDraw, ContractError> {
    MINI_DRAWS
        .may_load(storage, mini_draw_id)?
        .ok_or(ContractError::MiniDrawNotFound { mini_draw_id })
}

use cosmwasm_schema::{cw_serde, QueryResponses};
use tools_draws_common::{MiniDrawStatus, Prize, UserEntry};

use crate::state::{Config, MiniCreditRecord, MiniDraw};

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Open a mini draw. It starts active with its configuration locked. Admin only.
    CreateMiniDraw {
        name: String,
        description: String,
        prize: Prize,
        min_entries: u64,
    },
    /// Credit entries bought for a mini draw. Operator only.
    CreditMiniDrawEntries {
        mini_draw_id: u64,
        payment_id: String,
        user_id: String,
        entries: u64,
    },
    /// Close an active mini draw early. Admin only.
    CompleteMiniDraw { mini_draw_id: u64 },
    /// Admin only.
    CancelMiniDraw { mini_draw_id: u64 },
    /// Admin only.
    RecordMiniDrawWinner { mini_draw_id: u64, user_id: String },
    /// Admin only.
    UpdateConfig {
        admin: Option<String>,
        operator: Option<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(MiniDraw)]
    MiniDraw { mini_draw_id: u64 },
    #[returns(MiniDrawsResponse)]
    MiniDraws {
        status: Option<MiniDrawStatus>,
        start_after: Option<u64>,
        limit: Option<u32>,
    },
    #[returns(MiniDrawEntriesResponse)]
    MiniDrawEntries {
        mini_draw_id: u64,
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(Option<UserEntry>)]
    UserEntry { mini_draw_id: u64, user_id: String },
    #[returns(Option<MiniCreditRecord>)]
    Credit { payment_id: String, user_id: String },
}

#[cw_serde]
pub struct MiniDrawsResponse {
    pub mini_draws: Vec<MiniDraw>,
}

#[cw_serde]
pub struct MiniDrawEntriesResponse {
    pub entries: Vec<UserEntry>,
}

use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdResult};
use cw_storage_plus::Bound;
use tools_draws_common::{credit_key, MiniDrawStatus, UserEntry};

use crate::msg::{MiniDrawEntriesResponse, MiniDrawsResponse};
use crate::state::{CONFIG, CREDITS, MINI_DRAWS, MINI_DRAW_ENTRIES};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&CONFIG.load(deps.storage)?)
}

pub fn query_mini_draw(deps: Deps, mini_draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&MINI_DRAWS.load(deps.storage, mini_draw_id)?)
}

pub fn query_mini_draws(
    deps: Deps,
    status: Option<MiniDrawStatus>,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let mini_draws = MINI_DRAWS
        .range(deps.storage, start, None, Order::Ascending)
        .filter(|r| {
            r.as_ref()
                .map_or(true, |(_, d)| status.map_or(true, |s| d.status == s))
        })
        .take(limit)
        .map(|r| r.map(|(_, d)| d))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&MiniDrawsResponse { mini_draws })
}

pub fn query_mini_draw_entries(
    deps: Deps,
    mini_draw_id: u64,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(50).min(100) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let entries = MINI_DRAW_ENTRIES
        .prefix(mini_draw_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .map(|r| r.map(|(_, entry)| entry))
        .collect::<StdResult<Vec<UserEntry>>>()?;

    to_json_binary(&MiniDrawEntriesResponse { entries })
}

pub fn query_user_entry(deps: Deps, mini_draw_id: u64, user_id: String) -> StdResult<Binary> {
    let entry = MINI_DRAW_ENTRIES.may_load(deps.storage, (mini_draw_id, user_id.as_str()))?;
    to_json_binary(&entry)
}

pub fn query_credit(deps: Deps, payment_id: String, user_id: String) -> StdResult<Binary> {
    let record = CREDITS.may_load(deps.storage, &credit_key(&payment_id, &user_id))?;
    to_json_binary(&record)
}

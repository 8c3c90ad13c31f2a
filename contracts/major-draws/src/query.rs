use cosmwasm_std::{to_json_binary, Binary, Deps, Env, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use tools_draws_common::{credit_key, DrawStatus, PaymentMetadata, UserEntry};

use crate::lifecycle::plan_sweep;
use crate::msg::{DrawEntriesResponse, DrawTotalsResponse, DrawsResponse};
use crate::resolve::resolve_target_draw;
use crate::state::{current_draw, open_draws, CONFIG, CREDITS, DRAWS, DRAW_ENTRIES, SUCCESSORS};

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_draw(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let draw = DRAWS.load(deps.storage, draw_id)?;
    to_json_binary(&draw)
}

pub fn query_draws(
    deps: Deps,
    status: Option<DrawStatus>,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(20).min(100) as usize;
    let start = start_after.map(Bound::exclusive);

    let draws: Vec<_> = DRAWS
        .range(deps.storage, start, None, Order::Ascending)
        .filter_map(|r| r.ok())
        .map(|(_, draw)| draw)
        .filter(|draw| status.map_or(true, |s| draw.status == s))
        .take(limit)
        .collect();

    to_json_binary(&DrawsResponse { draws })
}

pub fn query_current_draw(deps: Deps) -> StdResult<Binary> {
    let draws = open_draws(deps.storage)?;
    to_json_binary(&current_draw(&draws))
}

pub fn query_resolve_target(
    deps: Deps,
    env: Env,
    payment: Option<PaymentMetadata>,
) -> StdResult<Binary> {
    let draw = resolve_target_draw(deps.storage, env.block.time, payment.as_ref())
        .map_err(|e| StdError::generic_err(e.to_string()))?;
    to_json_binary(&draw)
}

pub fn query_draw_entries(
    deps: Deps,
    draw_id: u64,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let limit = limit.unwrap_or(50).min(100) as usize;
    let start = start_after.as_deref().map(Bound::exclusive);

    let entries: Vec<UserEntry> = DRAW_ENTRIES
        .prefix(draw_id)
        .range(deps.storage, start, None, Order::Ascending)
        .take(limit)
        .filter_map(|r| r.ok())
        .map(|(_, entry)| entry)
        .collect();

    to_json_binary(&DrawEntriesResponse { entries })
}

pub fn query_user_entry(deps: Deps, draw_id: u64, user_id: String) -> StdResult<Binary> {
    let entry = DRAW_ENTRIES.may_load(deps.storage, (draw_id, user_id.as_str()))?;
    to_json_binary(&entry)
}

/// Audits the denormalised totals against the per-user records.
pub fn query_draw_totals(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let draw = DRAWS.load(deps.storage, draw_id)?;

    let mut summed_entries = 0u64;
    let mut counted_entrants = 0u64;
    for item in DRAW_ENTRIES
        .prefix(draw_id)
        .range(deps.storage, None, None, Order::Ascending)
    {
        let (_, entry) = item?;
        summed_entries = summed_entries.saturating_add(entry.total_entries);
        counted_entrants += 1;
    }

    to_json_binary(&DrawTotalsResponse {
        draw_id,
        total_entries: draw.total_entries,
        summed_entries,
        entrant_count: draw.entrant_count,
        counted_entrants,
    })
}

pub fn query_credit(deps: Deps, payment_id: String, user_id: String) -> StdResult<Binary> {
    let record = CREDITS.may_load(deps.storage, &credit_key(&payment_id, &user_id))?;
    to_json_binary(&record)
}

pub fn query_pending_transitions(deps: Deps, env: Env) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let plan = plan_sweep(deps.storage, env.block.time, &config.schedule)?;
    to_json_binary(&plan)
}

pub fn query_successor(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    let successor = SUCCESSORS.may_load(deps.storage, draw_id)?;
    to_json_binary(&successor)
}

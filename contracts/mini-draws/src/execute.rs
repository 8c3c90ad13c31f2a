use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Storage, Timestamp};
use tools_draws_common::{credit_key, EntrySource, MiniDrawStatus, Prize, UserEntry, WinnerRecord};

use crate::error::ContractError;
use crate::state::{
    load_mini_draw, Config, MiniCreditRecord, MiniDraw, CONFIG, CREDITS, MINI_DRAWS,
    MINI_DRAW_ENTRIES, NEXT_MINI_DRAW_ID,
};

fn ensure_admin(config: &Config, info: &MessageInfo, reason: &str) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: reason.to_string(),
        });
    }
    Ok(())
}

fn ensure_not_empty(field: &str, value: &str) -> Result<(), ContractError> {
    if value.trim().is_empty() {
        return Err(ContractError::EmptyField {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn transition(
    storage: &mut dyn Storage,
    draw: &mut MiniDraw,
    to: MiniDrawStatus,
    now: Timestamp,
) -> Result<Event, ContractError> {
    let from = draw.status;
    if !from.can_transition_to(to) {
        return Err(ContractError::InvalidTransition {
            mini_draw_id: draw.id,
            from,
            to,
        });
    }

    draw.status = to;
    match to {
        MiniDrawStatus::Completed => draw.completed_at = Some(now),
        MiniDrawStatus::Cancelled => draw.cancelled_at = Some(now),
        MiniDrawStatus::Active => {}
    }
    MINI_DRAWS.save(storage, draw.id, draw)?;

    Ok(Event::new("tools_mini_draw_transition")
        .add_attribute("mini_draw_id", draw.id.to_string())
        .add_attribute("from", from.as_str())
        .add_attribute("to", to.as_str())
        .add_attribute("total_entries", draw.total_entries.to_string())
        .add_attribute("timestamp", now.seconds().to_string()))
}

pub fn create_mini_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    name: String,
    description: String,
    prize: Prize,
    min_entries: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can create mini draws")?;
    ensure_not_empty("name", &name)?;
    if min_entries == 0 {
        return Err(ContractError::ZeroMinEntries);
    }

    let mini_draw_id = NEXT_MINI_DRAW_ID.load(deps.storage)?;
    NEXT_MINI_DRAW_ID.save(deps.storage, &(mini_draw_id + 1))?;

    let draw = MiniDraw {
        id: mini_draw_id,
        name,
        description,
        prize,
        status: MiniDrawStatus::Active,
        min_entries,
        total_entries: 0,
        entrant_count: 0,
        created_at: env.block.time,
        completed_at: None,
        cancelled_at: None,
        winner: None,
    };
    MINI_DRAWS.save(deps.storage, mini_draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "create_mini_draw")
        .add_attribute("mini_draw_id", mini_draw_id.to_string())
        .add_event(
            Event::new("tools_mini_draw_created")
                .add_attribute("mini_draw_id", mini_draw_id.to_string())
                .add_attribute("name", draw.name)
                .add_attribute("min_entries", min_entries.to_string()),
        ))
}

/// Credit entries into an active mini draw. Operator only. Reaching
/// `min_entries` completes the draw in the same message.
pub fn credit_mini_draw_entries(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    mini_draw_id: u64,
    payment_id: String,
    user_id: String,
    entries: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: "only operator can credit entries".to_string(),
        });
    }
    ensure_not_empty("payment_id", &payment_id)?;
    ensure_not_empty("user_id", &user_id)?;
    if entries == 0 {
        return Err(ContractError::ZeroEntries);
    }

    let key = credit_key(&payment_id, &user_id);
    if let Some(record) = CREDITS.may_load(deps.storage, &key)? {
        return Ok(Response::new()
            .add_attribute("action", "credit_mini_draw_entries")
            .add_attribute("duplicate", "true")
            .add_attribute("mini_draw_id", record.mini_draw_id.to_string())
            .add_event(
                Event::new("tools_mini_draw_credit_duplicate")
                    .add_attribute("payment_id", payment_id)
                    .add_attribute("user_id", user_id)
                    .add_attribute("mini_draw_id", record.mini_draw_id.to_string())
                    .add_attribute("entries", record.entries.to_string()),
            ));
    }

    let now = env.block.time;
    let mut draw = load_mini_draw(deps.storage, mini_draw_id)?;
    if draw.status != MiniDrawStatus::Active {
        return Err(ContractError::NotAcceptingEntries {
            mini_draw_id,
            status: draw.status,
        });
    }

    let overflow = || ContractError::EntryOverflow { mini_draw_id };
    let draw_total = draw.total_entries.checked_add(entries).ok_or_else(overflow)?;
    let entry = match MINI_DRAW_ENTRIES.may_load(deps.storage, (mini_draw_id, user_id.as_str()))? {
        Some(mut existing) => {
            existing
                .checked_credit(EntrySource::MiniDraw, entries, now)
                .ok_or_else(overflow)?;
            existing
        }
        None => {
            draw.entrant_count += 1;
            UserEntry::new(&user_id, EntrySource::MiniDraw, entries, now)
        }
    };
    MINI_DRAW_ENTRIES.save(deps.storage, (mini_draw_id, user_id.as_str()), &entry)?;
    draw.total_entries = draw_total;
    MINI_DRAWS.save(deps.storage, mini_draw_id, &draw)?;

    CREDITS.save(
        deps.storage,
        &key,
        &MiniCreditRecord {
            payment_id: payment_id.clone(),
            user_id: user_id.clone(),
            mini_draw_id,
            entries,
            credited_at: now,
        },
    )?;

    let mut response = Response::new()
        .add_attribute("action", "credit_mini_draw_entries")
        .add_attribute("duplicate", "false")
        .add_attribute("mini_draw_id", mini_draw_id.to_string())
        .add_event(
            Event::new("tools_mini_draw_entries_credited")
                .add_attribute("mini_draw_id", mini_draw_id.to_string())
                .add_attribute("payment_id", payment_id)
                .add_attribute("user_id", user_id)
                .add_attribute("entries", entries.to_string())
                .add_attribute("user_total", entry.total_entries.to_string())
                .add_attribute("draw_total", draw.total_entries.to_string()),
        );

    if draw.total_entries >= draw.min_entries {
        let event = transition(deps.storage, &mut draw, MiniDrawStatus::Completed, now)?;
        response = response
            .add_attribute("completed", "true")
            .add_event(event);
    }

    Ok(response)
}

pub fn complete_mini_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    mini_draw_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can complete mini draws")?;

    let mut draw = load_mini_draw(deps.storage, mini_draw_id)?;
    let event = transition(
        deps.storage,
        &mut draw,
        MiniDrawStatus::Completed,
        env.block.time,
    )?;

    Ok(Response::new()
        .add_attribute("action", "complete_mini_draw")
        .add_attribute("mini_draw_id", mini_draw_id.to_string())
        .add_event(event))
}

pub fn cancel_mini_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    mini_draw_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can cancel mini draws")?;

    let mut draw = load_mini_draw(deps.storage, mini_draw_id)?;
    let event = transition(
        deps.storage,
        &mut draw,
        MiniDrawStatus::Cancelled,
        env.block.time,
    )?;

    Ok(Response::new()
        .add_attribute("action", "cancel_mini_draw")
        .add_attribute("mini_draw_id", mini_draw_id.to_string())
        .add_event(event))
}

pub fn record_mini_draw_winner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    mini_draw_id: u64,
    user_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can record winners")?;

    let mut draw = load_mini_draw(deps.storage, mini_draw_id)?;
    if draw.status != MiniDrawStatus::Completed {
        return Err(ContractError::NotCompleted { mini_draw_id });
    }
    if draw.winner.is_some() {
        return Err(ContractError::WinnerAlreadyRecorded { mini_draw_id });
    }

    let entry = MINI_DRAW_ENTRIES
        .may_load(deps.storage, (mini_draw_id, user_id.as_str()))?
        .ok_or_else(|| ContractError::UserHasNoEntries {
            mini_draw_id,
            user_id: user_id.clone(),
        })?;

    draw.winner = Some(WinnerRecord {
        user_id: user_id.clone(),
        entries_held: entry.total_entries,
        recorded_at: env.block.time,
    });
    MINI_DRAWS.save(deps.storage, mini_draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "record_mini_draw_winner")
        .add_attribute("mini_draw_id", mini_draw_id.to_string())
        .add_event(
            Event::new("tools_mini_draw_winner")
                .add_attribute("mini_draw_id", mini_draw_id.to_string())
                .add_attribute("user_id", user_id)
                .add_attribute("entries_held", entry.total_entries.to_string()),
        ))
}

pub fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    admin: Option<String>,
    operator: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can update config")?;

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(operator) = operator {
        config.operator = deps.api.addr_validate(&operator)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("tools_mini_draw_config_updated")
                .add_attribute("admin", config.admin.to_string())
                .add_attribute("operator", config.operator.to_string()),
        ))
}

use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response, Storage, Timestamp};
use tools_draws_common::schedule::{calculate_freeze_time, validate_schedule};
use tools_draws_common::{credit_key, DrawStatus, EntrySource, UserEntry, WinnerRecord};

use crate::error::ContractError;
use crate::lifecycle::{apply_sweep, plan_sweep, transition_draw};
use crate::msg::{CreateDrawParams, CreditEntriesParams, UpdateConfigParams, UpdateDrawParams};
use crate::resolve::resolve_target_draw;
use crate::state::{
    load_draw, open_draws, Config, CreditRecord, MajorDraw, CONFIG, CREDITS, DRAWS,
    DRAW_ENTRIES, NEXT_DRAW_ID,
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

/// Open draws must not share an entry window: an earlier draw's draw date
/// bounds a later draw's activation.
fn ensure_no_overlap(
    storage: &dyn Storage,
    draw_id: u64,
    activation_date: Timestamp,
    draw_date: Timestamp,
) -> Result<(), ContractError> {
    for other in open_draws(storage)? {
        let overlaps = if other.id < draw_id {
            activation_date < other.draw_date
        } else if other.id > draw_id {
            other.activation_date < draw_date
        } else {
            false
        };
        if overlaps {
            return Err(ContractError::ScheduleOverlap {
                other_draw_id: other.id,
            });
        }
    }
    Ok(())
}

/// Create a queued draw. Admin only.
pub fn create_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: CreateDrawParams,
) -> Result<Response, ContractError> {
    let CreateDrawParams {
        name,
        description,
        prize,
        draw_date,
        activation_date,
    } = params;

    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can create draws")?;
    ensure_not_empty("name", &name)?;

    let now = env.block.time;
    if draw_date <= now {
        return Err(ContractError::DrawDateInPast {
            draw_date: draw_date.seconds(),
        });
    }

    let activation_date = activation_date.unwrap_or(now);
    let freeze_entries_at = calculate_freeze_time(draw_date, &config.schedule);
    validate_schedule(activation_date, freeze_entries_at, draw_date)?;

    let draw_id = NEXT_DRAW_ID.load(deps.storage)?;
    ensure_no_overlap(deps.storage, draw_id, activation_date, draw_date)?;
    NEXT_DRAW_ID.save(deps.storage, &(draw_id + 1))?;

    let draw = MajorDraw {
        id: draw_id,
        name,
        description,
        prize,
        status: DrawStatus::Queued,
        activation_date,
        draw_date,
        freeze_entries_at,
        configuration_locked: false,
        locked_at: None,
        total_entries: 0,
        entrant_count: 0,
        predecessor: None,
        created_at: now,
        completed_at: None,
        cancelled_at: None,
        winner: None,
    };
    DRAWS.save(deps.storage, draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "create_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("tools_draw_created")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("name", draw.name)
                .add_attribute("activation_date", activation_date.seconds().to_string())
                .add_attribute("freeze_entries_at", freeze_entries_at.seconds().to_string())
                .add_attribute("draw_date", draw_date.seconds().to_string()),
        ))
}

/// Edit a queued draw whose configuration is still unlocked. Admin only.
pub fn update_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: UpdateDrawParams,
) -> Result<Response, ContractError> {
    let UpdateDrawParams {
        draw_id,
        name,
        description,
        prize,
        draw_date,
        activation_date,
    } = params;

    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can update draws")?;

    let mut draw = load_draw(deps.storage, draw_id)?;
    if draw.configuration_locked {
        return Err(ContractError::ConfigurationLocked { draw_id });
    }
    if draw.status != DrawStatus::Queued {
        return Err(ContractError::DrawNotEditable {
            draw_id,
            status: draw.status,
        });
    }

    if let Some(name) = name {
        ensure_not_empty("name", &name)?;
        draw.name = name;
    }
    if let Some(description) = description {
        draw.description = description;
    }
    if let Some(prize) = prize {
        draw.prize = prize;
    }

    if draw_date.is_some() || activation_date.is_some() {
        let draw_date = draw_date.unwrap_or(draw.draw_date);
        if draw_date <= env.block.time {
            return Err(ContractError::DrawDateInPast {
                draw_date: draw_date.seconds(),
            });
        }
        let activation_date = activation_date.unwrap_or(draw.activation_date);
        let freeze_entries_at = calculate_freeze_time(draw_date, &config.schedule);
        validate_schedule(activation_date, freeze_entries_at, draw_date)?;
        ensure_no_overlap(deps.storage, draw_id, activation_date, draw_date)?;

        draw.draw_date = draw_date;
        draw.activation_date = activation_date;
        draw.freeze_entries_at = freeze_entries_at;
    }

    DRAWS.save(deps.storage, draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "update_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("tools_draw_updated")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("activation_date", draw.activation_date.seconds().to_string())
                .add_attribute("freeze_entries_at", draw.freeze_entries_at.seconds().to_string())
                .add_attribute("draw_date", draw.draw_date.seconds().to_string()),
        ))
}

/// Lock a draw's configuration ahead of activation. Admin only.
pub fn lock_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    draw_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can lock draws")?;

    let mut draw = load_draw(deps.storage, draw_id)?;
    if draw.configuration_locked {
        return Err(ContractError::ConfigurationLocked { draw_id });
    }
    if draw.status.is_terminal() {
        return Err(ContractError::DrawNotEditable {
            draw_id,
            status: draw.status,
        });
    }

    draw.configuration_locked = true;
    draw.locked_at = Some(env.block.time);
    DRAWS.save(deps.storage, draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "lock_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("tools_draw_locked")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Cancel a draw that has not completed. Admin only.
pub fn cancel_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    draw_id: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can cancel draws")?;

    let (draw, event) =
        transition_draw(deps.storage, draw_id, DrawStatus::Cancelled, env.block.time)?;

    Ok(Response::new()
        .add_attribute("action", "cancel_draw")
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("total_entries", draw.total_entries.to_string())
        .add_event(event))
}

/// Add `entries` to `user_id`'s record on `draw` and bump the draw totals.
/// The caller saves `draw`; both writes land in the same message.
fn apply_entry(
    storage: &mut dyn Storage,
    draw: &mut MajorDraw,
    user_id: &str,
    entries: u64,
    source: EntrySource,
    now: Timestamp,
) -> Result<u64, ContractError> {
    if draw.status != DrawStatus::Active && draw.status != DrawStatus::Queued {
        return Err(ContractError::DrawNotAcceptingEntries {
            draw_id: draw.id,
            status: draw.status,
        });
    }

    let overflow = ContractError::EntryOverflow { draw_id: draw.id };
    let draw_total = draw.total_entries.checked_add(entries).ok_or(overflow)?;

    let entry = match DRAW_ENTRIES.may_load(storage, (draw.id, user_id))? {
        Some(mut existing) => {
            existing
                .checked_credit(source, entries, now)
                .ok_or(ContractError::EntryOverflow { draw_id: draw.id })?;
            existing
        }
        None => {
            draw.entrant_count += 1;
            UserEntry::new(user_id, source, entries, now)
        }
    };

    DRAW_ENTRIES.save(storage, (draw.id, user_id), &entry)?;
    draw.total_entries = draw_total;

    Ok(entry.total_entries)
}

/// Credit entries for a settled payment. Operator only.
///
/// Keyed by (payment_id, user_id): a replayed webhook finds the earlier
/// `CreditRecord` and changes nothing.
pub fn credit_entries(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    params: CreditEntriesParams,
) -> Result<Response, ContractError> {
    let CreditEntriesParams {
        payment_id,
        user_id,
        entries,
        source,
        payment,
    } = params;

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
            .add_attribute("action", "credit_entries")
            .add_attribute("duplicate", "true")
            .add_attribute("draw_id", record.draw_id.to_string())
            .add_event(
                Event::new("tools_draw_credit_duplicate")
                    .add_attribute("payment_id", payment_id)
                    .add_attribute("user_id", user_id)
                    .add_attribute("draw_id", record.draw_id.to_string())
                    .add_attribute("entries", record.entries.to_string()),
            ));
    }

    let now = env.block.time;
    let mut draw = resolve_target_draw(deps.storage, now, payment.as_ref())?;
    let user_total = apply_entry(deps.storage, &mut draw, &user_id, entries, source, now)?;
    DRAWS.save(deps.storage, draw.id, &draw)?;

    let record = CreditRecord {
        payment_id: payment_id.clone(),
        user_id: user_id.clone(),
        draw_id: draw.id,
        entries,
        source,
        credited_at: now,
    };
    CREDITS.save(deps.storage, &key, &record)?;

    Ok(Response::new()
        .add_attribute("action", "credit_entries")
        .add_attribute("duplicate", "false")
        .add_attribute("draw_id", draw.id.to_string())
        .add_event(
            Event::new("tools_draw_entries_credited")
                .add_attribute("draw_id", draw.id.to_string())
                .add_attribute("draw_status", draw.status.as_str())
                .add_attribute("payment_id", payment_id)
                .add_attribute("user_id", user_id)
                .add_attribute("source", source.as_str())
                .add_attribute("entries", entries.to_string())
                .add_attribute("user_total", user_total.to_string())
                .add_attribute("draw_total", draw.total_entries.to_string()),
        ))
}

/// Advance statuses and materialise the next draw. Anyone can call; a
/// second call with nothing due writes nothing.
pub fn tick(deps: DepsMut, env: Env, _info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let now = env.block.time;

    let plan = plan_sweep(deps.storage, now, &config.schedule)?;
    let events = apply_sweep(deps.storage, &plan, now)?;

    Ok(Response::new()
        .add_attribute("action", "tick")
        .add_attribute("transitions", plan.transitions.len().to_string())
        .add_attribute("successor_created", plan.successor.is_some().to_string())
        .add_events(events))
}

/// Record the winner of a completed draw. Admin only.
pub fn record_winner(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    draw_id: u64,
    user_id: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can record winners")?;

    let mut draw = load_draw(deps.storage, draw_id)?;
    if draw.status != DrawStatus::Completed {
        return Err(ContractError::DrawNotCompleted { draw_id });
    }
    if draw.winner.is_some() {
        return Err(ContractError::WinnerAlreadyRecorded { draw_id });
    }

    let entry = DRAW_ENTRIES
        .may_load(deps.storage, (draw_id, user_id.as_str()))?
        .ok_or_else(|| ContractError::UserHasNoEntries {
            draw_id,
            user_id: user_id.clone(),
        })?;

    draw.winner = Some(WinnerRecord {
        user_id: user_id.clone(),
        entries_held: entry.total_entries,
        recorded_at: env.block.time,
    });
    DRAWS.save(deps.storage, draw_id, &draw)?;

    Ok(Response::new()
        .add_attribute("action", "record_winner")
        .add_attribute("draw_id", draw_id.to_string())
        .add_event(
            Event::new("tools_draw_winner")
                .add_attribute("draw_id", draw_id.to_string())
                .add_attribute("user_id", user_id)
                .add_attribute("entries_held", entry.total_entries.to_string())
                .add_attribute("total_entries", draw.total_entries.to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    params: UpdateConfigParams,
) -> Result<Response, ContractError> {
    let UpdateConfigParams {
        admin,
        operator,
        schedule,
    } = params;

    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "only admin can update config")?;

    if let Some(admin) = admin {
        config.admin = deps.api.addr_validate(&admin)?;
    }
    if let Some(operator) = operator {
        config.operator = deps.api.addr_validate(&operator)?;
    }
    if let Some(schedule) = schedule {
        schedule.validate()?;
        config.schedule = schedule;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("tools_draw_config_updated")
                .add_attribute("admin", config.admin.to_string())
                .add_attribute("operator", config.operator.to_string())
                .add_attribute(
                    "freeze_offset_seconds",
                    config.schedule.freeze_offset_seconds.to_string(),
                )
                .add_attribute(
                    "draw_interval_seconds",
                    config.schedule.draw_interval_seconds.to_string(),
                ),
        ))
}

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Event, StdResult, Storage, Timestamp};
use tools_draws_common::schedule::{
    calculate_activation_date, calculate_freeze_time, calculate_next_draw_date,
    is_within_lookahead,
};
use tools_draws_common::{DrawStatus, ScheduleConfig};

use crate::error::ContractError;
use crate::state::{
    current_draw, load_draw, open_draws, MajorDraw, DRAWS, NEXT_DRAW_ID, SUCCESSORS,
};

#[cw_serde]
pub struct PlannedTransition {
    pub draw_id: u64,
    pub from: DrawStatus,
    pub to: DrawStatus,
}

#[cw_serde]
pub struct PlannedSuccessor {
    pub predecessor_id: u64,
    pub activation_date: Timestamp,
    pub freeze_entries_at: Timestamp,
    pub draw_date: Timestamp,
}

/// Status writes and successor creation a sweep at `now` would perform.
#[cw_serde]
pub struct SweepPlan {
    pub transitions: Vec<PlannedTransition>,
    pub successor: Option<PlannedSuccessor>,
}

impl SweepPlan {
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty() && self.successor.is_none()
    }
}

/// The single edge `draw` is due to take at `now`, looking at its own
/// timestamps only.
pub fn next_transition(draw: &MajorDraw, now: Timestamp) -> Option<DrawStatus> {
    match draw.status {
        DrawStatus::Queued if now >= draw.activation_date => Some(DrawStatus::Active),
        DrawStatus::Active | DrawStatus::Frozen if now >= draw.draw_date => {
            Some(DrawStatus::Completed)
        }
        DrawStatus::Active if now >= draw.freeze_entries_at => Some(DrawStatus::Frozen),
        _ => None,
    }
}

/// Walk every open draw forward, one edge at a time, against an in-memory
/// copy of the store. Draws are visited in id order so a predecessor
/// completes before its successor is considered for activation. A queued
/// draw stays queued while another draw is still active or frozen.
pub fn plan_sweep(
    storage: &dyn Storage,
    now: Timestamp,
    cfg: &ScheduleConfig,
) -> StdResult<SweepPlan> {
    let mut draws = open_draws(storage)?;
    let mut transitions = vec![];

    for i in 0..draws.len() {
        while let Some(next) = next_transition(&draws[i], now) {
            if next == DrawStatus::Active
                && draws
                    .iter()
                    .enumerate()
                    .any(|(j, other)| j != i && other.status.is_current())
            {
                break;
            }
            transitions.push(PlannedTransition {
                draw_id: draws[i].id,
                from: draws[i].status,
                to: next,
            });
            draws[i].status = next;
        }
    }

    let successor = match current_draw(&draws) {
        Some(current)
            if is_within_lookahead(now, current.draw_date, cfg)
                && !SUCCESSORS.has(storage, current.id)
                && !draws.iter().any(|d| d.status == DrawStatus::Queued) =>
        {
            let draw_date = calculate_next_draw_date(current.draw_date, cfg);
            Some(PlannedSuccessor {
                predecessor_id: current.id,
                activation_date: calculate_activation_date(current.draw_date, cfg),
                freeze_entries_at: calculate_freeze_time(draw_date, cfg),
                draw_date,
            })
        }
        _ => None,
    };

    Ok(SweepPlan {
        transitions,
        successor,
    })
}

/// Write a status change. Activation locks the draw's configuration.
pub fn transition_draw(
    storage: &mut dyn Storage,
    draw_id: u64,
    to: DrawStatus,
    now: Timestamp,
) -> Result<(MajorDraw, Event), ContractError> {
    let mut draw = load_draw(storage, draw_id)?;
    let from = draw.status;
    if !from.can_transition_to(to) {
        return Err(ContractError::InvalidTransition { draw_id, from, to });
    }

    draw.status = to;
    match to {
        DrawStatus::Active if !draw.configuration_locked => {
            draw.configuration_locked = true;
            draw.locked_at = Some(now);
        }
        DrawStatus::Completed => draw.completed_at = Some(now),
        DrawStatus::Cancelled => draw.cancelled_at = Some(now),
        _ => {}
    }
    DRAWS.save(storage, draw_id, &draw)?;

    let event = Event::new("tools_draw_transition")
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("from", from.as_str())
        .add_attribute("to", to.as_str())
        .add_attribute("total_entries", draw.total_entries.to_string())
        .add_attribute("timestamp", now.seconds().to_string());

    Ok((draw, event))
}

/// Insert the successor of `plan.predecessor_id`. `SUCCESSORS` is the unique
/// constraint: a second attempt for the same predecessor fails.
pub fn create_successor(
    storage: &mut dyn Storage,
    plan: &PlannedSuccessor,
    now: Timestamp,
) -> Result<(MajorDraw, Event), ContractError> {
    let predecessor = load_draw(storage, plan.predecessor_id)?;

    if let Some(successor_id) = SUCCESSORS.may_load(storage, predecessor.id)? {
        return Err(ContractError::SuccessorExists {
            draw_id: predecessor.id,
            successor_id,
        });
    }

    let draw_id = NEXT_DRAW_ID.load(storage)?;
    NEXT_DRAW_ID.save(storage, &(draw_id + 1))?;

    let draw = MajorDraw {
        id: draw_id,
        name: predecessor.name.clone(),
        description: predecessor.description.clone(),
        prize: predecessor.prize.clone(),
        status: DrawStatus::Queued,
        activation_date: plan.activation_date,
        draw_date: plan.draw_date,
        freeze_entries_at: plan.freeze_entries_at,
        configuration_locked: false,
        locked_at: None,
        total_entries: 0,
        entrant_count: 0,
        predecessor: Some(predecessor.id),
        created_at: now,
        completed_at: None,
        cancelled_at: None,
        winner: None,
    };
    DRAWS.save(storage, draw_id, &draw)?;
    SUCCESSORS.save(storage, predecessor.id, &draw_id)?;

    let event = Event::new("tools_draw_successor_created")
        .add_attribute("draw_id", draw_id.to_string())
        .add_attribute("predecessor_id", predecessor.id.to_string())
        .add_attribute("activation_date", draw.activation_date.seconds().to_string())
        .add_attribute("freeze_entries_at", draw.freeze_entries_at.seconds().to_string())
        .add_attribute("draw_date", draw.draw_date.seconds().to_string());

    Ok((draw, event))
}

/// Carry out a sweep plan. Returns the emitted events.
pub fn apply_sweep(
    storage: &mut dyn Storage,
    plan: &SweepPlan,
    now: Timestamp,
) -> Result<Vec<Event>, ContractError> {
    let mut events = Vec::with_capacity(plan.transitions.len() + 1);

    for t in &plan.transitions {
        let (_, event) = transition_draw(storage, t.draw_id, t.to, now)?;
        events.push(event);
    }

    if let Some(successor) = &plan.successor {
        let (_, event) = create_successor(storage, successor, now)?;
        events.push(event);
    }

    Ok(events)
}

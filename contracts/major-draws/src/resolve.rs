use cosmwasm_std::{Storage, Timestamp};
use tools_draws_common::schedule::was_payment_before_freeze;
use tools_draws_common::{DrawStatus, PaymentMetadata};

use crate::error::ContractError;
use crate::state::{current_draw, earliest_queued, open_draws, MajorDraw};

/// Pick the draw a new batch of entries belongs to.
///
/// Reads the store on every call; there is no cached "current draw".
///
/// 1. Find the draw that is `active` or `frozen`.
/// 2. A `frozen` current draw sends entries to the earliest queued draw.
/// 3. A payment authorised on or after the freeze boundary also goes to the
///    queued draw, even if the status write has not happened yet. Without
///    payment metadata the block time is used as the authorisation instant.
/// 4. Otherwise an `active` current draw takes the entries.
/// 5. With no current draw (a gap), the earliest queued draw takes them.
///
/// Whichever draw is picked, active or queued, must still be open for this
/// payment: the authorisation instant is before its freeze and its draw date
/// has not passed. A queued draw that a missed sweep left behind is skipped
/// in favour of the next one.
///
/// Stored status wins over payment time: once a sweep has frozen the draw, a
/// payment authorised before the freeze still goes to the next draw.
pub fn resolve_target_draw(
    storage: &dyn Storage,
    now: Timestamp,
    payment: Option<&PaymentMetadata>,
) -> Result<MajorDraw, ContractError> {
    let draws = open_draws(storage)?;
    let open_for_payment = |draw: &MajorDraw| {
        let before_freeze = match payment {
            Some(p) => was_payment_before_freeze(p.created, draw.freeze_entries_at),
            None => now < draw.freeze_entries_at,
        };
        before_freeze && now < draw.draw_date
    };

    let accepts_current = current_draw(&draws)
        .filter(|draw| draw.status == DrawStatus::Active && open_for_payment(*draw));

    accepts_current
        .or_else(|| earliest_queued(&draws, &open_for_payment))
        .cloned()
        .ok_or(ContractError::NoActiveDraw)
}

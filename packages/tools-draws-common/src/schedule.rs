//! Timestamp arithmetic for the major draw calendar.
//!
//! Everything here is pure: no storage, no clock. Callers pass `env.block.time`
//! as `now`.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Timestamp;
use thiserror::Error;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Entries close 30 minutes before the draw.
pub const DEFAULT_FREEZE_OFFSET_SECONDS: u64 = 30 * 60;
/// Fixed monthly cadence.
pub const DEFAULT_DRAW_INTERVAL_SECONDS: u64 = 30 * 24 * 60 * 60;
pub const DEFAULT_ACTIVATION_DELAY_SECONDS: u64 = 0;
/// How far ahead of a draw its successor is materialised.
pub const DEFAULT_SUCCESSOR_LOOKAHEAD_SECONDS: u64 = 7 * 24 * 60 * 60;

#[derive(Error, Debug, PartialEq)]
pub enum ScheduleError {
    #[error("invalid schedule config: {reason}")]
    InvalidConfig { reason: String },

    #[error("invalid draw schedule: {reason}")]
    InvalidSchedule { reason: String },
}

#[cw_serde]
pub struct ScheduleConfig {
    pub freeze_offset_seconds: u64,
    pub draw_interval_seconds: u64,
    /// Gap between a draw's determination and its successor opening for entries
    pub activation_delay_seconds: u64,
    pub successor_lookahead_seconds: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            freeze_offset_seconds: DEFAULT_FREEZE_OFFSET_SECONDS,
            draw_interval_seconds: DEFAULT_DRAW_INTERVAL_SECONDS,
            activation_delay_seconds: DEFAULT_ACTIVATION_DELAY_SECONDS,
            successor_lookahead_seconds: DEFAULT_SUCCESSOR_LOOKAHEAD_SECONDS,
        }
    }
}

impl ScheduleConfig {
    /// A successor computed from this config must itself satisfy
    /// `activation < freeze < draw`.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        if self.freeze_offset_seconds == 0 {
            return Err(ScheduleError::InvalidConfig {
                reason: "freeze_offset_seconds must be positive".to_string(),
            });
        }
        if self.freeze_offset_seconds >= self.draw_interval_seconds {
            return Err(ScheduleError::InvalidConfig {
                reason: format!(
                    "freeze_offset_seconds ({}) must be shorter than draw_interval_seconds ({})",
                    self.freeze_offset_seconds, self.draw_interval_seconds
                ),
            });
        }
        if self.activation_delay_seconds >= self.draw_interval_seconds - self.freeze_offset_seconds
        {
            return Err(ScheduleError::InvalidConfig {
                reason: format!(
                    "activation_delay_seconds ({}) leaves no entry window before the freeze",
                    self.activation_delay_seconds
                ),
            });
        }
        if self.successor_lookahead_seconds == 0 {
            return Err(ScheduleError::InvalidConfig {
                reason: "successor_lookahead_seconds must be positive".to_string(),
            });
        }
        Ok(())
    }
}

fn add_seconds(t: Timestamp, seconds: u64) -> Timestamp {
    Timestamp::from_nanos(
        t.nanos()
            .saturating_add(seconds.saturating_mul(NANOS_PER_SECOND)),
    )
}

fn sub_seconds(t: Timestamp, seconds: u64) -> Timestamp {
    Timestamp::from_nanos(
        t.nanos()
            .saturating_sub(seconds.saturating_mul(NANOS_PER_SECOND)),
    )
}

/// The instant entries stop being credited to the draw.
pub fn calculate_freeze_time(draw_date: Timestamp, cfg: &ScheduleConfig) -> Timestamp {
    sub_seconds(draw_date, cfg.freeze_offset_seconds)
}

/// When the draw following one determined at `previous_draw_date` opens.
pub fn calculate_activation_date(previous_draw_date: Timestamp, cfg: &ScheduleConfig) -> Timestamp {
    add_seconds(previous_draw_date, cfg.activation_delay_seconds)
}

pub fn calculate_next_draw_date(current_draw_date: Timestamp, cfg: &ScheduleConfig) -> Timestamp {
    add_seconds(current_draw_date, cfg.draw_interval_seconds)
}

/// `[freeze_at, draw_date)`
pub fn is_in_freeze_period(now: Timestamp, freeze_at: Timestamp, draw_date: Timestamp) -> bool {
    now >= freeze_at && now < draw_date
}

/// Whether a payment authorised at `payment_created` (unix seconds) predates
/// the freeze boundary. Payments authorised on the boundary itself are late.
pub fn was_payment_before_freeze(payment_created: u64, freeze_at: Timestamp) -> bool {
    Timestamp::from_seconds(payment_created) < freeze_at
}

/// Whether `now` is inside the successor look-ahead window of `draw_date`.
pub fn is_within_lookahead(now: Timestamp, draw_date: Timestamp, cfg: &ScheduleConfig) -> bool {
    now >= sub_seconds(draw_date, cfg.successor_lookahead_seconds)
}

/// Rejects schedules that would put the draw's milestones out of order.
pub fn validate_schedule(
    activation_date: Timestamp,
    freeze_entries_at: Timestamp,
    draw_date: Timestamp,
) -> Result<(), ScheduleError> {
    if freeze_entries_at >= draw_date {
        return Err(ScheduleError::InvalidSchedule {
            reason: format!(
                "freeze time {} must precede draw date {}",
                freeze_entries_at.seconds(),
                draw_date.seconds()
            ),
        });
    }
    if activation_date >= freeze_entries_at {
        return Err(ScheduleError::InvalidSchedule {
            reason: format!(
                "activation date {} must precede freeze time {}",
                activation_date.seconds(),
                freeze_entries_at.seconds()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRAW: u64 = 1_700_000_000;

    #[test]
    fn test_freeze_time_is_thirty_minutes_before_draw() {
        let cfg = ScheduleConfig::default();
        let freeze = calculate_freeze_time(Timestamp::from_seconds(DRAW), &cfg);
        assert_eq!(freeze, Timestamp::from_seconds(DRAW - 1800));
    }

    #[test]
    fn test_freeze_time_saturates() {
        let cfg = ScheduleConfig::default();
        let freeze = calculate_freeze_time(Timestamp::from_seconds(60), &cfg);
        assert_eq!(freeze, Timestamp::from_seconds(0));
    }

    #[test]
    fn test_next_draw_and_activation() {
        let cfg = ScheduleConfig {
            activation_delay_seconds: 3600,
            ..ScheduleConfig::default()
        };
        let draw = Timestamp::from_seconds(DRAW);
        assert_eq!(
            calculate_next_draw_date(draw, &cfg),
            Timestamp::from_seconds(DRAW + 30 * 86_400)
        );
        assert_eq!(
            calculate_activation_date(draw, &cfg),
            Timestamp::from_seconds(DRAW + 3600)
        );
    }

    #[test]
    fn test_freeze_period_is_half_open() {
        let freeze = Timestamp::from_seconds(DRAW - 1800);
        let draw = Timestamp::from_seconds(DRAW);

        assert!(!is_in_freeze_period(Timestamp::from_seconds(DRAW - 1801), freeze, draw));
        assert!(is_in_freeze_period(freeze, freeze, draw));
        assert!(is_in_freeze_period(Timestamp::from_seconds(DRAW - 1), freeze, draw));
        assert!(!is_in_freeze_period(draw, freeze, draw));
    }

    #[test]
    fn test_payment_before_freeze() {
        let freeze = Timestamp::from_seconds(DRAW - 1800);
        assert!(was_payment_before_freeze(DRAW - 2400, freeze));
        assert!(!was_payment_before_freeze(DRAW - 1800, freeze));
        assert!(!was_payment_before_freeze(DRAW - 300, freeze));
    }

    #[test]
    fn test_payment_compared_against_sub_second_freeze() {
        // block times carry nanoseconds; a payment in the same second but
        // before the fractional boundary still counts as early
        let freeze = Timestamp::from_nanos(DRAW * NANOS_PER_SECOND + 500);
        assert!(was_payment_before_freeze(DRAW, freeze));
    }

    #[test]
    fn test_lookahead() {
        let cfg = ScheduleConfig::default();
        let draw = Timestamp::from_seconds(DRAW);
        let week = 7 * 86_400;
        assert!(!is_within_lookahead(Timestamp::from_seconds(DRAW - week - 1), draw, &cfg));
        assert!(is_within_lookahead(Timestamp::from_seconds(DRAW - week), draw, &cfg));
        assert!(is_within_lookahead(Timestamp::from_seconds(DRAW + 10), draw, &cfg));
    }

    #[test]
    fn test_validate_schedule() {
        let a = Timestamp::from_seconds(100);
        let f = Timestamp::from_seconds(200);
        let d = Timestamp::from_seconds(300);
        assert!(validate_schedule(a, f, d).is_ok());
        assert!(matches!(
            validate_schedule(f, f, d),
            Err(ScheduleError::InvalidSchedule { .. })
        ));
        assert!(matches!(
            validate_schedule(a, d, d),
            Err(ScheduleError::InvalidSchedule { .. })
        ));
    }

    #[test]
    fn test_config_validation() {
        assert!(ScheduleConfig::default().validate().is_ok());

        let zero_freeze = ScheduleConfig {
            freeze_offset_seconds: 0,
            ..ScheduleConfig::default()
        };
        assert!(zero_freeze.validate().is_err());

        let freeze_too_long = ScheduleConfig {
            freeze_offset_seconds: DEFAULT_DRAW_INTERVAL_SECONDS,
            ..ScheduleConfig::default()
        };
        assert!(freeze_too_long.validate().is_err());

        let no_window = ScheduleConfig {
            activation_delay_seconds: DEFAULT_DRAW_INTERVAL_SECONDS - DEFAULT_FREEZE_OFFSET_SECONDS,
            ..ScheduleConfig::default()
        };
        assert!(no_window.validate().is_err());

        let no_lookahead = ScheduleConfig {
            successor_lookahead_seconds: 0,
            ..ScheduleConfig::default()
        };
        assert!(no_lookahead.validate().is_err());
    }
}

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Timestamp, Uint128};

/// Lifecycle status of a major (monthly) draw.
///
/// ```text
/// queued -> active -> frozen -> completed
///             \_______________/
/// any non-terminal -> cancelled
/// ```
#[cw_serde]
#[derive(Copy, Eq)]
pub enum DrawStatus {
    Queued,
    Active,
    Frozen,
    Completed,
    Cancelled,
}

impl DrawStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DrawStatus::Completed | DrawStatus::Cancelled)
    }

    /// True for the statuses a "current" draw can be in.
    pub fn is_current(&self) -> bool {
        matches!(self, DrawStatus::Active | DrawStatus::Frozen)
    }

    /// Permitted edges of the major draw state machine.
    pub fn can_transition_to(&self, next: DrawStatus) -> bool {
        match (self, next) {
            (DrawStatus::Queued, DrawStatus::Active) => true,
            (DrawStatus::Active, DrawStatus::Frozen) => true,
            (DrawStatus::Active | DrawStatus::Frozen, DrawStatus::Completed) => true,
            (from, DrawStatus::Cancelled) => !from.is_terminal(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DrawStatus::Queued => "queued",
            DrawStatus::Active => "active",
            DrawStatus::Frozen => "frozen",
            DrawStatus::Completed => "completed",
            DrawStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a mini (per-item) draw. Mini draws have no freeze
/// window; they close once the entry threshold is reached or an admin closes them.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum MiniDrawStatus {
    Active,
    Completed,
    Cancelled,
}

impl MiniDrawStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MiniDrawStatus::Active)
    }

    pub fn can_transition_to(&self, next: MiniDrawStatus) -> bool {
        matches!(
            (self, next),
            (MiniDrawStatus::Active, MiniDrawStatus::Completed)
                | (MiniDrawStatus::Active, MiniDrawStatus::Cancelled)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MiniDrawStatus::Active => "active",
            MiniDrawStatus::Completed => "completed",
            MiniDrawStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for MiniDrawStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The purchase that produced a batch of entries.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum EntrySource {
    Membership,
    OneTimePackage,
    Upsell,
    MiniDraw,
    CancellationUpsell,
}

impl EntrySource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntrySource::Membership => "membership",
            EntrySource::OneTimePackage => "one_time_package",
            EntrySource::Upsell => "upsell",
            EntrySource::MiniDraw => "mini_draw",
            EntrySource::CancellationUpsell => "cancellation_upsell",
        }
    }
}

/// Per-source breakdown of a user's entries in one draw.
#[cw_serde]
#[derive(Default, Eq)]
pub struct EntriesBySource {
    pub membership: u64,
    pub one_time_package: u64,
    pub upsell: u64,
    pub mini_draw: u64,
    pub cancellation_upsell: u64,
}

impl EntriesBySource {
    pub fn get(&self, source: EntrySource) -> u64 {
        match source {
            EntrySource::Membership => self.membership,
            EntrySource::OneTimePackage => self.one_time_package,
            EntrySource::Upsell => self.upsell,
            EntrySource::MiniDraw => self.mini_draw,
            EntrySource::CancellationUpsell => self.cancellation_upsell,
        }
    }

    /// Adds `entries` to the bucket for `source`. Returns `None` on overflow
    /// and leaves the bucket untouched.
    pub fn checked_add(&mut self, source: EntrySource, entries: u64) -> Option<u64> {
        let bucket = match source {
            EntrySource::Membership => &mut self.membership,
            EntrySource::OneTimePackage => &mut self.one_time_package,
            EntrySource::Upsell => &mut self.upsell,
            EntrySource::MiniDraw => &mut self.mini_draw,
            EntrySource::CancellationUpsell => &mut self.cancellation_upsell,
        };
        *bucket = bucket.checked_add(entries)?;
        Some(*bucket)
    }

    pub fn total(&self) -> u64 {
        self.membership
            .saturating_add(self.one_time_package)
            .saturating_add(self.upsell)
            .saturating_add(self.mini_draw)
            .saturating_add(self.cancellation_upsell)
    }
}

/// One user's tally within one draw. Stored under `(draw_id, user_id)`, so a
/// draw can never hold two records for the same user.
#[cw_serde]
pub struct UserEntry {
    pub user_id: String,
    pub total_entries: u64,
    pub entries_by_source: EntriesBySource,
    pub first_added_date: Timestamp,
    pub last_updated_date: Timestamp,
}

impl UserEntry {
    pub fn new(user_id: &str, source: EntrySource, entries: u64, now: Timestamp) -> Self {
        let mut entries_by_source = EntriesBySource::default();
        // a fresh bucket cannot overflow
        entries_by_source.checked_add(source, entries);
        UserEntry {
            user_id: user_id.to_string(),
            total_entries: entries,
            entries_by_source,
            first_added_date: now,
            last_updated_date: now,
        }
    }

    /// Increments the total and the source bucket together. On overflow the
    /// record is left unchanged and `None` is returned.
    pub fn checked_credit(
        &mut self,
        source: EntrySource,
        entries: u64,
        now: Timestamp,
    ) -> Option<u64> {
        let total = self.total_entries.checked_add(entries)?;
        let mut by_source = self.entries_by_source.clone();
        by_source.checked_add(source, entries)?;

        self.total_entries = total;
        self.entries_by_source = by_source;
        self.last_updated_date = now;
        Some(total)
    }
}

/// Payment facts forwarded by the webhook relay. `created` is the unix time
/// (seconds) at which the payment was authorised, not when it settled.
#[cw_serde]
pub struct PaymentMetadata {
    pub created: u64,
    #[serde(rename = "type")]
    pub payment_type: Option<String>,
    pub package_type: Option<String>,
}

#[cw_serde]
pub struct Prize {
    pub name: String,
    pub description: String,
    /// Retail value in cents (AUD)
    pub value: Uint128,
}

#[cw_serde]
pub struct WinnerRecord {
    pub user_id: String,
    pub entries_held: u64,
    pub recorded_at: Timestamp,
}

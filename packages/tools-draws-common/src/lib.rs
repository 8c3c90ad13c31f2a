pub mod credit;
pub mod schedule;
pub mod types;

pub use credit::{credit_key, credit_key_hex};
pub use schedule::{ScheduleConfig, ScheduleError};
pub use types::{
    DrawStatus, EntriesBySource, EntrySource, MiniDrawStatus, PaymentMetadata, Prize, UserEntry,
    WinnerRecord,
};

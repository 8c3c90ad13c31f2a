pub mod contract;
pub mod error;
pub mod execute;
pub mod lifecycle;
pub mod msg;
pub mod query;
pub mod resolve;
pub mod state;

pub use crate::error::ContractError;

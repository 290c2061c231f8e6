pub mod aggregate;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod export;
pub mod filter;
pub mod pipeline;
mod stats;
pub mod store;
pub mod table;
pub mod validation;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

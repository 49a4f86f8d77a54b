//! Customer loyalty reward points.
//!
//! A purchase earns points by tier: nothing up to 50, one point per unit between 50 and 100, and
//! two points per unit above 100. [`rewards::summarize`] totals a customer's points within a date
//! window and breaks them down by calendar month. The rest of the crate looks customers up
//! ([`directory`]), serves summaries over HTTP ([`http`]) and drives it all from the CLI.

pub mod args;
pub mod commands;
mod config;
mod db;
pub mod directory;
mod error;
pub mod http;
pub mod import;
pub mod model;
pub mod rewards;
mod service;
mod utils;


pub use config::Config;
pub use error::{Error, RewardError, Result};
pub use service::RewardService;

//! Error types.
//!
//! Application plumbing (configuration, CLI commands, imports) uses `anyhow` through
//! [`Result`]. Anything that can reach an HTTP caller is expressed as a [`RewardError`] so that it
//! can be mapped to a status code.

use crate::model::CustomerId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by reward lookups and the inputs that feed them.
#[derive(Debug, Error)]
pub enum RewardError {
    /// No customer exists for the requested identifier.
    #[error("Customer not found. Customer Id: {0}")]
    CustomerNotFound(CustomerId),

    /// The window ends before it starts.
    #[error("Start date cannot be after end date ({start} > {end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// A transaction amount that is negative.
    #[error("Transaction amount must not be negative, got {0}")]
    InvalidAmount(Decimal),

    /// A date that is not in `yyyy-MM-dd` form, or that cannot be represented.
    #[error("Invalid date format. Use yyyy-MM-dd (got '{0}')")]
    InvalidDate(String),

    /// A customer identifier that is not an integer.
    #[error("Invalid customer id '{0}'")]
    InvalidCustomerId(String),

    /// A required request parameter was not supplied.
    #[error("{0} must be provided to fetch rewards")]
    MissingParameter(&'static str),

    /// A request parameter appeared more than once.
    #[error("{0} must be provided only once")]
    DuplicateParameter(String),

    /// The customer directory failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

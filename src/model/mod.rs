//! Types that represent the core data model: customers, their purchases and reward summaries.
mod amount;
mod customer;
mod summary;

pub use amount::{Amount, AmountError};
pub use customer::{parse_date, Customer, CustomerId, Transaction};
pub use summary::{MonthKey, MonthlyReward, RewardSummary};

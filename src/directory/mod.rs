//! Customer directories: where customers and their purchase histories come from.
//!
//! A directory is constructed once at startup and then only read. The reward engine never talks
//! to a directory itself; [`crate::RewardService`] does the lookup and hands the engine the
//! resolved customer and transactions.

mod memory;
mod sqlite;

use crate::error::RewardError;
use crate::model::{Customer, CustomerId, Transaction};
use crate::rewards::DateWindow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub use memory::InMemoryDirectory;
pub use sqlite::SqliteDirectory;

/// Looks up customers and the transactions they own.
#[async_trait]
pub trait CustomerDirectory: Debug + Send + Sync {
    /// Returns the customer with `id`, or [`RewardError::CustomerNotFound`].
    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Customer, RewardError>;

    /// Returns the transactions owned by `customer`. When `window` is given the directory may
    /// leave out transactions outside of it, but callers must not rely on that.
    async fn transactions_of(
        &self,
        customer: &Customer,
        window: Option<DateWindow>,
    ) -> Result<Vec<Transaction>, RewardError>;

    /// Returns every customer, ordered by id.
    async fn customers(&self) -> Result<Vec<Customer>, RewardError>;
}

/// Which directory implementation backs the service.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// The bundled sample customers, held in memory.
    #[default]
    Memory,
    /// The SQLite database in the rewards home directory.
    Sqlite,
}

serde_plain::derive_display_from_serialize!(StoreKind);
serde_plain::derive_fromstr_from_deserialize!(StoreKind);

/// A customer together with the purchase history it owns.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct CustomerRecord {
    customer: Customer,
    transactions: Vec<Transaction>,
}

impl CustomerRecord {
    pub fn new(customer: Customer, transactions: Vec<Transaction>) -> Self {
        Self {
            customer,
            transactions,
        }
    }

    pub fn customer(&self) -> &Customer {
        &self.customer
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn push(&mut self, transaction: Transaction) {
        self.transactions.push(transaction)
    }
}

use crate::directory::{CustomerDirectory, CustomerRecord};
use crate::error::RewardError;
use crate::import;
use crate::model::{Customer, CustomerId, Transaction};
use crate::rewards::DateWindow;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::BTreeMap;

const FIXTURE_CUSTOMERS: &str = include_str!("fixture/customers.csv");
const FIXTURE_TRANSACTIONS: &str = include_str!("fixture/transactions.csv");

/// A read-only directory held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    records: BTreeMap<CustomerId, CustomerRecord>,
}

impl InMemoryDirectory {
    /// Creates a directory from `records`. A later record with the same customer id replaces an
    /// earlier one.
    pub fn new(records: impl IntoIterator<Item = CustomerRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.customer().id(), r))
                .collect(),
        }
    }

    /// Creates a directory holding the bundled sample customers and their purchases during 2024
    /// and 2025.
    pub fn sample() -> crate::Result<Self> {
        let records = import::read_records(
            FIXTURE_CUSTOMERS.as_bytes(),
            FIXTURE_TRANSACTIONS.as_bytes(),
        )
        .context("The bundled sample data is invalid")?;
        Ok(Self::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record(&self, id: CustomerId) -> Result<&CustomerRecord, RewardError> {
        self.records
            .get(&id)
            .ok_or(RewardError::CustomerNotFound(id))
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryDirectory {
    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Customer, RewardError> {
        Ok(self.record(id)?.customer().clone())
    }

    async fn transactions_of(
        &self,
        customer: &Customer,
        window: Option<DateWindow>,
    ) -> Result<Vec<Transaction>, RewardError> {
        let record = self.record(customer.id())?;
        Ok(record
            .transactions()
            .iter()
            .filter(|t| window.map_or(true, |w| w.contains(t.date())))
            .copied()
            .collect())
    }

    async fn customers(&self) -> Result<Vec<Customer>, RewardError> {
        Ok(self.records.values().map(|r| r.customer().clone()).collect())
    }
}

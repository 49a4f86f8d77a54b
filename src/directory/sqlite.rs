use crate::db::Db;
use crate::directory::{CustomerDirectory, CustomerRecord};
use crate::error::RewardError;
use crate::model::{parse_date, Amount, Customer, CustomerId, Transaction};
use crate::rewards::DateWindow;
use anyhow::Context;
use async_trait::async_trait;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

type CustomerRow = (i64, String, String, String);
type TransactionRow = (String, String);

/// A directory backed by the SQLite database in the rewards home directory.
#[derive(Debug, Clone)]
pub struct SqliteDirectory {
    db: Db,
}

impl SqliteDirectory {
    /// Creates a new, empty database at `path`.
    pub async fn init(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self {
            db: Db::init(path).await?,
        })
    }

    /// Opens the existing database at `path`.
    pub async fn load(path: impl AsRef<Path>) -> crate::Result<Self> {
        Ok(Self {
            db: Db::load(path).await?,
        })
    }

    /// Writes `records` in a single database transaction. Customers that already exist have their
    /// display attributes replaced and the new transactions appended to their history.
    ///
    /// Returns the number of transactions written.
    pub async fn insert(&self, records: &[CustomerRecord]) -> crate::Result<usize> {
        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .context("Unable to begin import")?;
        let mut count = 0;

        for record in records {
            let customer = record.customer();
            sqlx::query(
                "INSERT INTO customers (id, name, phone, city) VALUES (?, ?, ?, ?) \
                 ON CONFLICT (id) DO UPDATE SET \
                 name = excluded.name, phone = excluded.phone, city = excluded.city",
            )
            .bind(customer.id().value())
            .bind(customer.name())
            .bind(customer.phone())
            .bind(customer.city())
            .execute(&mut *tx)
            .await
            .with_context(|| format!("Unable to write customer {}", customer.id()))?;

            for transaction in record.transactions() {
                sqlx::query("INSERT INTO transactions (customer_id, date, amount) VALUES (?, ?, ?)")
                    .bind(customer.id().value())
                    .bind(transaction.date().to_string())
                    .bind(transaction.amount().value().to_string())
                    .execute(&mut *tx)
                    .await
                    .with_context(|| {
                        format!("Unable to write a transaction for customer {}", customer.id())
                    })?;
                count += 1;
            }
        }

        tx.commit().await.context("Unable to commit import")?;
        debug!("Wrote {} customers and {count} transactions", records.len());
        Ok(count)
    }
}

fn to_customer((id, name, phone, city): CustomerRow) -> Customer {
    Customer::new(id, name, phone, city)
}

fn to_transaction((date, amount): TransactionRow) -> Result<Transaction, RewardError> {
    let date = parse_date(&date)?;
    let amount = Amount::from_str(&amount)
        .with_context(|| format!("Stored amount '{amount}' is not a number"))?;
    Transaction::new(date, amount)
}

#[async_trait]
impl CustomerDirectory for SqliteDirectory {
    async fn find_customer_by_id(&self, id: CustomerId) -> Result<Customer, RewardError> {
        let row: Option<CustomerRow> =
            sqlx::query_as("SELECT id, name, phone, city FROM customers WHERE id = ?")
                .bind(id.value())
                .fetch_optional(self.db.pool())
                .await
                .with_context(|| format!("Unable to look up customer {id}"))?;
        row.map(to_customer)
            .ok_or(RewardError::CustomerNotFound(id))
    }

    async fn transactions_of(
        &self,
        customer: &Customer,
        window: Option<DateWindow>,
    ) -> Result<Vec<Transaction>, RewardError> {
        let id = customer.id().value();
        let query = match window {
            Some(w) => sqlx::query_as(
                "SELECT date, amount FROM transactions \
                 WHERE customer_id = ? AND date BETWEEN ? AND ? ORDER BY date, id",
            )
            .bind(id)
            .bind(w.start().to_string())
            .bind(w.end().to_string()),
            None => sqlx::query_as(
                "SELECT date, amount FROM transactions WHERE customer_id = ? ORDER BY date, id",
            )
            .bind(id),
        };
        let rows: Vec<TransactionRow> = query
            .fetch_all(self.db.pool())
            .await
            .with_context(|| format!("Unable to read transactions of customer {id}"))?;
        rows.into_iter().map(to_transaction).collect()
    }

    async fn customers(&self) -> Result<Vec<Customer>, RewardError> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as("SELECT id, name, phone, city FROM customers ORDER BY id")
                .fetch_all(self.db.pool())
                .await
                .context("Unable to list customers")?;
        Ok(rows.into_iter().map(to_customer).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn john() -> CustomerRecord {
        CustomerRecord::new(
            Customer::new(1, "John Doe", "9999999999", "New York"),
            vec![
                Transaction::new(date(2025, 6, 10), 120).unwrap(),
                Transaction::new(date(2025, 7, 15), 75).unwrap(),
                Transaction::new(date(2025, 8, 5), Amount::from_str("40.50").unwrap()).unwrap(),
            ],
        )
    }

    async fn directory(dir: &TempDir) -> SqliteDirectory {
        let directory = SqliteDirectory::init(dir.path().join("rewards.sqlite"))
            .await
            .unwrap();
        directory.insert(&[john()]).await.unwrap();
        directory
    }

    #[tokio::test]
    async fn test_find_customer() {
        let dir = TempDir::new().unwrap();
        let directory = directory(&dir).await;
        let customer = directory
            .find_customer_by_id(CustomerId::new(1))
            .await
            .unwrap();
        assert_eq!(customer, *john().customer());
    }

    #[tokio::test]
    async fn test_customer_not_found() {
        let dir = TempDir::new().unwrap();
        let directory = directory(&dir).await;
        let err = directory
            .find_customer_by_id(CustomerId::new(2))
            .await
            .unwrap_err();
        assert!(matches!(err, RewardError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn test_transactions_round_trip_through_storage() {
        let dir = TempDir::new().unwrap();
        let directory = directory(&dir).await;
        let record = john();
        let stored = directory
            .transactions_of(record.customer(), None)
            .await
            .unwrap();
        assert_eq!(stored, record.transactions());
    }

    #[tokio::test]
    async fn test_window_prefilter_is_inclusive() {
        let dir = TempDir::new().unwrap();
        let directory = directory(&dir).await;
        let window = DateWindow::new(date(2025, 7, 15), date(2025, 8, 5)).unwrap();
        let stored = directory
            .transactions_of(john().customer(), Some(window))
            .await
            .unwrap();
        let dates: Vec<NaiveDate> = stored.iter().map(|t| t.date()).collect();
        assert_eq!(dates, [date(2025, 7, 15), date(2025, 8, 5)]);
    }

    #[tokio::test]
    async fn test_reimport_updates_customer_and_appends() {
        let dir = TempDir::new().unwrap();
        let directory = directory(&dir).await;
        let moved = CustomerRecord::new(
            Customer::new(1, "John Doe", "9999999999", "Boston"),
            vec![Transaction::new(date(2025, 9, 1), 60).unwrap()],
        );
        assert_eq!(directory.insert(&[moved]).await.unwrap(), 1);

        let customers = directory.customers().await.unwrap();
        assert_eq!(customers.len(), 1);
        assert_eq!(customers[0].city(), "Boston");
        let all = directory
            .transactions_of(&customers[0], None)
            .await
            .unwrap();
        assert_eq!(all.len(), 4);
    }
}

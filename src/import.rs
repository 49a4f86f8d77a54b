//! Reading customers and their purchases from CSV.
//!
//! Two files are expected:
//! - customers: `id,name,phone,city`
//! - transactions: `customer_id,date,amount` where `date` is `yyyy-MM-dd` and `amount` may carry a
//!   dollar sign and thousands separators.

use crate::directory::CustomerRecord;
use crate::model::{parse_date, Amount, Customer, CustomerId, Transaction};
use crate::Result;
use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
struct CsvCustomer {
    id: i64,
    name: String,
    phone: String,
    city: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CsvTransaction {
    customer_id: i64,
    date: String,
    amount: Amount,
}

/// Reads customer and transaction CSV data into one record per customer, ordered by customer id.
///
/// # Errors
/// - A row cannot be parsed.
/// - A customer id appears twice.
/// - A transaction refers to a customer that is not in the customers data.
/// - A transaction has a malformed date or a negative amount.
pub fn read_records(customers: impl Read, transactions: impl Read) -> Result<Vec<CustomerRecord>> {
    let mut records: BTreeMap<CustomerId, CustomerRecord> = BTreeMap::new();

    let mut rdr = csv::Reader::from_reader(customers);
    for (ix, result) in rdr.deserialize().enumerate() {
        let row: CsvCustomer =
            result.with_context(|| format!("Unable to parse customer row {}", ix + 2))?;
        let customer = Customer::new(row.id, row.name, row.phone, row.city);
        let id = customer.id();
        if records.insert(id, CustomerRecord::new(customer, Vec::new())).is_some() {
            bail!("Customer {id} appears more than once");
        }
    }

    let mut rdr = csv::Reader::from_reader(transactions);
    for (ix, result) in rdr.deserialize().enumerate() {
        let row_num = ix + 2;
        let row: CsvTransaction =
            result.with_context(|| format!("Unable to parse transaction row {row_num}"))?;
        let id = CustomerId::new(row.customer_id);
        let Some(record) = records.get_mut(&id) else {
            bail!("Transaction row {row_num} refers to unknown customer {id}");
        };
        let date = parse_date(&row.date).with_context(|| format!("Transaction row {row_num}"))?;
        let transaction =
            Transaction::new(date, row.amount).with_context(|| format!("Transaction row {row_num}"))?;
        record.push(transaction);
    }

    debug!("Read {} customers from CSV", records.len());
    Ok(records.into_values().collect())
}

/// Reads customer and transaction CSV files. See [`read_records`].
pub fn read_files(customers: &Path, transactions: &Path) -> Result<Vec<CustomerRecord>> {
    let c = std::fs::File::open(customers)
        .with_context(|| format!("Unable to open file {}", customers.display()))?;
    let t = std::fs::File::open(transactions)
        .with_context(|| format!("Unable to open file {}", transactions.display()))?;
    read_records(c, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOMERS: &str = "id,name,phone,city\n\
        2,Priya Sharma,9988776655,Bangalore\n\
        1,John Doe,9999999999,New York\n";

    #[test]
    fn test_read_records() {
        let transactions = "customer_id,date,amount\n\
            1,2025-06-10,120\n\
            1,2025-07-15,$75.00\n\
            2,2025-08-05,\"$1,040.00\"\n";
        let records = read_records(CUSTOMERS.as_bytes(), transactions.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].customer().name(), "John Doe");
        assert_eq!(records[0].transactions().len(), 2);
        assert_eq!(records[1].customer().city(), "Bangalore");
        assert_eq!(
            records[1].transactions()[0].amount(),
            Amount::from(1040)
        );
    }

    #[test]
    fn test_unknown_customer() {
        let transactions = "customer_id,date,amount\n7,2025-06-10,120\n";
        let err = read_records(CUSTOMERS.as_bytes(), transactions.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("unknown customer 7"));
    }

    #[test]
    fn test_negative_amount() {
        let transactions = "customer_id,date,amount\n1,2025-06-10,-12.00\n";
        assert!(read_records(CUSTOMERS.as_bytes(), transactions.as_bytes()).is_err());
    }

    #[test]
    fn test_bad_date() {
        let transactions = "customer_id,date,amount\n1,10/06/2025,12.00\n";
        assert!(read_records(CUSTOMERS.as_bytes(), transactions.as_bytes()).is_err());
    }

    #[test]
    fn test_duplicate_customer() {
        let customers = format!("{CUSTOMERS}1,Someone Else,0,Paris\n");
        let err = read_records(customers.as_bytes(), "customer_id,date,amount\n".as_bytes())
            .unwrap_err();
        assert!(err.to_string().contains("more than once"));
    }
}

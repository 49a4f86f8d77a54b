use crate::error::RewardError;
use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The unique identifier of a customer.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CustomerId(i64);

impl CustomerId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for CustomerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl Display for CustomerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl FromStr for CustomerId {
    type Err = RewardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(CustomerId)
            .map_err(|_| RewardError::InvalidCustomerId(s.to_string()))
    }
}

/// A customer's identity and display attributes. The customer's purchase history is held by the
/// directory that owns the customer.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    phone: String,
    city: String,
}

impl Customer {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        phone: impl Into<String>,
        city: impl Into<String>,
    ) -> Self {
        Self {
            id: CustomerId(id),
            name: name.into(),
            phone: phone.into(),
            city: city.into(),
        }
    }

    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn city(&self) -> &str {
        &self.city
    }
}

/// A single purchase. Immutable once created.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
pub struct Transaction {
    date: NaiveDate,
    amount: Amount,
}

impl Transaction {
    /// Creates a transaction, rejecting negative amounts.
    pub fn new(date: NaiveDate, amount: impl Into<Amount>) -> Result<Self, RewardError> {
        let amount = amount.into();
        if amount.is_negative() {
            return Err(RewardError::InvalidAmount(amount.value()));
        }
        Ok(Self { date, amount })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// Parses a `yyyy-MM-dd` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, RewardError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| RewardError::InvalidDate(s.into()))
}

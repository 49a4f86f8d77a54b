use crate::model::{Customer, CustomerId};
use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};
use std::fmt::{Display, Formatter};

/// A calendar month. Orders chronologically and renders as `YYYY-MM`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for MonthKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Points earned within one calendar month.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyReward {
    month: MonthKey,
    reward_points: u128,
}

impl MonthlyReward {
    pub fn new(month: MonthKey, reward_points: u128) -> Self {
        Self {
            month,
            reward_points,
        }
    }

    pub fn month(&self) -> MonthKey {
        self.month
    }

    pub fn reward_points(&self) -> u128 {
        self.reward_points
    }
}

/// The rewards a customer earned within a window.
///
/// `total_rewards` is always the sum of the `monthly_rewards` points, and `monthly_rewards` is
/// always in ascending month order.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewardSummary {
    customer_id: CustomerId,
    name: String,
    phone: String,
    city: String,
    total_rewards: u128,
    monthly_rewards: Vec<MonthlyReward>,
}

impl RewardSummary {
    pub(crate) fn new(
        customer: &Customer,
        total_rewards: u128,
        monthly_rewards: Vec<MonthlyReward>,
    ) -> Self {
        Self {
            customer_id: customer.id(),
            name: customer.name().to_string(),
            phone: customer.phone().to_string(),
            city: customer.city().to_string(),
            total_rewards,
            monthly_rewards,
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
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

    pub fn total_rewards(&self) -> u128 {
        self.total_rewards
    }

    pub fn monthly_rewards(&self) -> &[MonthlyReward] {
        &self.monthly_rewards
    }

    /// Looks up the points for `month`, if any transaction fell in that month.
    pub fn points_for(&self, month: MonthKey) -> Option<u128> {
        self.monthly_rewards
            .iter()
            .find(|m| m.month == month)
            .map(|m| m.reward_points)
    }
}

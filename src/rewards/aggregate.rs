use crate::model::{Customer, MonthKey, MonthlyReward, RewardSummary, Transaction};
use crate::rewards::{points, DateWindow};
use std::collections::BTreeMap;

/// Summarizes the rewards `customer` earned from `transactions` dated within `window`.
///
/// Transactions outside the window are ignored, whether or not the caller already filtered them.
/// Every month with at least one transaction in the window appears in the breakdown, even when
/// those transactions earned no points. The breakdown is in ascending month order.
pub fn summarize<'a, I>(customer: &Customer, transactions: I, window: DateWindow) -> RewardSummary
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut monthly: BTreeMap<MonthKey, u128> = BTreeMap::new();

    for transaction in transactions
        .into_iter()
        .filter(|t| window.contains(t.date()))
    {
        let earned = points(transaction.amount().value());
        let bucket = monthly.entry(MonthKey::from(transaction.date())).or_default();
        *bucket = bucket.saturating_add(earned);
    }

    // The total is taken from the finished buckets so it always agrees with the breakdown.
    let total = monthly.values().fold(0u128, |sum, p| sum.saturating_add(*p));
    let monthly_rewards = monthly
        .into_iter()
        .map(|(month, points)| MonthlyReward::new(month, points))
        .collect();

    RewardSummary::new(customer, total, monthly_rewards)
}

//! Combines customer lookup with the reward engine.

use crate::directory::CustomerDirectory;
use crate::error::RewardError;
use crate::model::{CustomerId, RewardSummary};
use crate::rewards::{self, DateWindow};
use std::sync::Arc;
use tracing::debug;

/// Looks customers up in a [`CustomerDirectory`] and summarizes their rewards.
///
/// Cloning is cheap; clones share the directory.
#[derive(Debug, Clone)]
pub struct RewardService {
    directory: Arc<dyn CustomerDirectory>,
    default_window: DateWindow,
}

impl RewardService {
    /// `default_window` is used by the lookups that do not take a window.
    pub fn new(directory: Arc<dyn CustomerDirectory>, default_window: DateWindow) -> Self {
        Self {
            directory,
            default_window,
        }
    }

    pub fn default_window(&self) -> DateWindow {
        self.default_window
    }

    /// Summarizes the rewards customer `id` earned within `window`.
    ///
    /// # Errors
    /// - [`RewardError::CustomerNotFound`] when the directory has no customer `id`.
    /// - [`RewardError::Store`] when the directory fails.
    pub async fn rewards_for_period(
        &self,
        id: CustomerId,
        window: DateWindow,
    ) -> Result<RewardSummary, RewardError> {
        let customer = self.directory.find_customer_by_id(id).await?;
        let transactions = self
            .directory
            .transactions_of(&customer, Some(window))
            .await?;
        let summary = rewards::summarize(&customer, &transactions, window);
        debug!(
            "Customer {id} earned {} points in {window} over {} transactions",
            summary.total_rewards(),
            transactions.len()
        );
        Ok(summary)
    }

    /// Summarizes the rewards customer `id` earned within the default window.
    pub async fn rewards_for_customer(&self, id: CustomerId) -> Result<RewardSummary, RewardError> {
        self.rewards_for_period(id, self.default_window).await
    }

    /// Summarizes every customer's rewards within `window`, ordered by customer id.
    pub async fn all_rewards(&self, window: DateWindow) -> Result<Vec<RewardSummary>, RewardError> {
        let customers = self.directory.customers().await?;
        let mut summaries = Vec::with_capacity(customers.len());
        for customer in customers {
            let transactions = self
                .directory
                .transactions_of(&customer, Some(window))
                .await?;
            summaries.push(rewards::summarize(&customer, &transactions, window));
        }
        Ok(summaries)
    }
}

use crate::args::SummaryArgs;
use crate::commands::Out;
use crate::model::{CustomerId, RewardSummary};
use crate::rewards::DateWindow;
use crate::{Config, Result};
use chrono::NaiveDate;

/// Summarizes one customer, or every customer when `args` names none.
///
/// With no dates the window is the configured calendar year. Otherwise missing bounds are filled
/// in the same way as `GET /api/rewards`: `end` defaults to today and `start` to the configured
/// number of trailing months before `end`.
pub async fn summary(config: Config, args: &SummaryArgs) -> Result<Out<Vec<RewardSummary>>> {
    summary_as_of(config, args, chrono::Local::now().date_naive()).await
}

async fn summary_as_of(
    config: Config,
    args: &SummaryArgs,
    today: NaiveDate,
) -> Result<Out<Vec<RewardSummary>>> {
    let service = config.service().await?;
    let window = match (args.start(), args.end()) {
        (None, None) => service.default_window(),
        (start, end) => DateWindow::with_defaults(start, end, today, config.trailing_months())?,
    };

    let summaries = match args.customer_id() {
        Some(id) => vec![
            service
                .rewards_for_period(CustomerId::new(id), window)
                .await?,
        ],
        None => service.all_rewards(window).await?,
    };
    let total = summaries
        .iter()
        .fold(0u128, |sum, s| sum.saturating_add(s.total_rewards()));
    Ok(Out::new(
        format!(
            "{} customers earned {total} points in {window}",
            summaries.len()
        ),
        summaries,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RewardError;
    use crate::test::TestEnv;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn test_summary_for_one_customer() {
        let env = TestEnv::new().await;
        env.insert_john_doe().await;
        let args = SummaryArgs::new(Some(1), date(2025, 6, 1), date(2025, 8, 31));
        let out = summary(env.config(), &args).await.unwrap();
        let summaries = out.structure().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_rewards(), 115);
        assert_eq!(summaries[0].monthly_rewards().len(), 3);
    }

    #[tokio::test]
    async fn test_summary_for_everyone_uses_default_year() {
        let env = TestEnv::new().await;
        env.insert_john_doe().await;
        let out = summary(env.config(), &SummaryArgs::new(None, None, None))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap()[0].total_rewards(), 115);
        assert_eq!(out.message(), "1 customers earned 115 points in [2025-01-01, 2025-12-31]");
    }

    #[tokio::test]
    async fn test_summary_unknown_customer() {
        let env = TestEnv::new().await;
        let err = summary(env.config(), &SummaryArgs::new(Some(5), None, None))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RewardError>(),
            Some(RewardError::CustomerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_summary_fills_missing_bounds_from_today() {
        let env = TestEnv::new().await;
        env.insert_john_doe().await;
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        // a start after the configured year still works, the end is today
        let args = SummaryArgs::new(Some(1), date(2026, 3, 1), None);
        let out = summary_as_of(env.config(), &args, today).await.unwrap();
        assert_eq!(out.structure().unwrap()[0].total_rewards(), 0);
        assert_eq!(out.message(), "1 customers earned 0 points in [2026-03-01, 2026-03-10]");

        // an end alone reaches back the configured trailing months
        let args = SummaryArgs::new(Some(1), None, date(2025, 8, 31));
        let out = summary_as_of(env.config(), &args, today).await.unwrap();
        assert_eq!(out.message(), "1 customers earned 115 points in [2025-05-31, 2025-08-31]");
    }

    #[tokio::test]
    async fn test_summary_inverted_range() {
        let env = TestEnv::new().await;
        let args = SummaryArgs::new(Some(1), date(2025, 9, 1), date(2025, 6, 1));
        let err = summary(env.config(), &args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RewardError>(),
            Some(RewardError::InvalidRange { .. })
        ));
    }
}

//! The HTTP interface.
//!
//! | Route                                         | Window                                  |
//! |-----------------------------------------------|-----------------------------------------|
//! | `GET /api/rewards?customerId=&start=&end=`    | given dates, else trailing months       |
//! | `GET /api/rewards/period?customerId=&start=&end=` | given dates, all required           |
//! | `GET /api/rewards/{customerId}`               | default calendar year                   |
//! | `GET /api/rewards/customers`                  | default calendar year, every customer   |
//! | `GET /health`                                 |                                         |
//!
//! Dates are `yyyy-MM-dd`. Errors are returned as `{"error": "..."}`.

mod error;

use crate::error::RewardError;
use crate::model::{parse_date, CustomerId, RewardSummary};
use crate::rewards::DateWindow;
use crate::service::RewardService;
use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Supplies "today" for requests that do not name an end date.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Shared state for the request handlers.
#[derive(Clone)]
pub struct AppState {
    service: RewardService,
    trailing_months: u32,
    today: Clock,
}

impl AppState {
    /// Creates state that reads "today" from the local system clock.
    pub fn new(service: RewardService, trailing_months: u32) -> Self {
        Self::with_clock(
            service,
            trailing_months,
            Arc::new(|| chrono::Local::now().date_naive()),
        )
    }

    pub fn with_clock(service: RewardService, trailing_months: u32, today: Clock) -> Self {
        Self {
            service,
            trailing_months,
            today,
        }
    }
}

impl Debug for AppState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service", &self.service)
            .field("trailing_months", &self.trailing_months)
            .finish_non_exhaustive()
    }
}

/// Query parameters accepted by the reward routes. The raw pairs are taken as text so that
/// malformed or repeated values produce this service's own error bodies.
#[derive(Debug, Default, Clone)]
struct RewardsQuery {
    customer_id: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

impl TryFrom<Vec<(String, String)>> for RewardsQuery {
    type Error = RewardError;

    fn try_from(pairs: Vec<(String, String)>) -> Result<Self, Self::Error> {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "customerId" => &mut query.customer_id,
                "start" => &mut query.start,
                "end" => &mut query.end,
                _ => continue,
            };
            if slot.replace(value).is_some() {
                return Err(RewardError::DuplicateParameter(key));
            }
        }
        Ok(query)
    }
}

impl RewardsQuery {
    fn customer_id(&self) -> Result<CustomerId, RewardError> {
        self.customer_id
            .as_deref()
            .ok_or(RewardError::MissingParameter("Customer ID"))?
            .parse()
    }

    fn start(&self) -> Result<Option<NaiveDate>, RewardError> {
        self.start.as_deref().map(parse_date).transpose()
    }

    fn end(&self) -> Result<Option<NaiveDate>, RewardError> {
        self.end.as_deref().map(parse_date).transpose()
    }
}

/// Builds the router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/rewards", get(rewards))
        .route("/api/rewards/period", get(rewards_for_period))
        .route("/api/rewards/customers", get(all_rewards))
        .route("/api/rewards/:customer_id", get(rewards_for_customer))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `router(state)` on `listener` until Ctrl-C is received.
pub async fn serve(listener: TcpListener, state: AppState) -> crate::Result<()> {
    let addr = listener
        .local_addr()
        .context("Unable to read the listener address")?;
    info!("Serving rewards on http://{addr}");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutting down");
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Dates are optional here: `end` defaults to today and `start` to `trailing_months` before `end`.
async fn rewards(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RewardSummary>, RewardError> {
    let query = RewardsQuery::try_from(pairs)?;
    let id = query.customer_id()?;
    let window = DateWindow::with_defaults(
        query.start()?,
        query.end()?,
        (state.today)(),
        state.trailing_months,
    )?;
    Ok(Json(state.service.rewards_for_period(id, window).await?))
}

async fn rewards_for_period(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<RewardSummary>, RewardError> {
    let query = RewardsQuery::try_from(pairs)?;
    let id = query.customer_id()?;
    let start = query.start()?.ok_or(RewardError::MissingParameter("Start date"))?;
    let end = query.end()?.ok_or(RewardError::MissingParameter("End date"))?;
    let window = DateWindow::new(start, end)?;
    Ok(Json(state.service.rewards_for_period(id, window).await?))
}

async fn rewards_for_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> Result<Json<RewardSummary>, RewardError> {
    let id: CustomerId = customer_id.parse()?;
    Ok(Json(state.service.rewards_for_customer(id).await?))
}

async fn all_rewards(
    State(state): State<AppState>,
) -> Result<Json<Vec<RewardSummary>>, RewardError> {
    let window = state.service.default_window();
    Ok(Json(state.service.all_rewards(window).await?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{CustomerRecord, InMemoryDirectory};
    use crate::model::{Customer, Transaction};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> Router {
        let john = CustomerRecord::new(
            Customer::new(1, "John Doe", "9999999999", "New York"),
            vec![
                Transaction::new(date(2025, 6, 10), 120).unwrap(),
                Transaction::new(date(2025, 7, 15), 75).unwrap(),
                Transaction::new(date(2025, 8, 5), 40).unwrap(),
            ],
        );
        let service = RewardService::new(
            Arc::new(InMemoryDirectory::new([john])),
            DateWindow::calendar_year(2025).unwrap(),
        );
        router(AppState::with_clock(
            service,
            3,
            Arc::new(|| NaiveDate::from_ymd_opt(2025, 8, 20).unwrap()),
        ))
    }

    async fn fetch(uri: &str) -> (StatusCode, Value) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_rewards_with_dates() {
        let (status, body) = fetch("/api/rewards?customerId=1&start=2025-06-01&end=2025-08-31").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "customerId": 1,
                "name": "John Doe",
                "phone": "9999999999",
                "city": "New York",
                "totalRewards": 115,
                "monthlyRewards": [
                    {"month": "2025-06", "rewardPoints": 90},
                    {"month": "2025-07", "rewardPoints": 25},
                    {"month": "2025-08", "rewardPoints": 0}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_rewards_default_trailing_window() {
        // today is 2025-08-20, so the window is [2025-05-20, 2025-08-20]
        let (status, body) = fetch("/api/rewards?customerId=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRewards"], 115);

        // start given, end defaults to today
        let (_, body) = fetch("/api/rewards?customerId=1&start=2025-07-01").await;
        assert_eq!(body["totalRewards"], 25);

        // end given, start defaults to three months before it
        let (_, body) = fetch("/api/rewards?customerId=1&end=2025-09-30").await;
        assert_eq!(body["totalRewards"], 25);
    }

    #[tokio::test]
    async fn test_rewards_empty_window() {
        let (status, body) = fetch("/api/rewards?customerId=1&start=2025-09-01&end=2025-09-30").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRewards"], 0);
        assert_eq!(body["monthlyRewards"], json!([]));
    }

    #[tokio::test]
    async fn test_missing_customer_id() {
        let (status, body) = fetch("/api/rewards?start=2025-06-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Customer ID must be provided to fetch rewards"
        );
    }

    #[tokio::test]
    async fn test_bad_customer_id() {
        let (status, _) = fetch("/api/rewards?customerId=abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = fetch("/api/rewards/abc").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_repeated_parameter() {
        let (status, body) = fetch("/api/rewards?customerId=1&customerId=2").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "customerId must be provided only once");

        let (status, body) =
            fetch("/api/rewards/period?customerId=1&start=2025-06-01&start=2025-07-01&end=2025-08-31")
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "start must be provided only once");
    }

    #[tokio::test]
    async fn test_unknown_parameters_are_ignored() {
        let (status, body) = fetch("/api/rewards?customerId=1&start=2025-06-01&end=2025-08-31&page=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRewards"], 115);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let (status, body) = fetch("/api/rewards?customerId=42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Customer not found. Customer Id: 42");

        let (status, _) = fetch("/api/rewards/42").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_date() {
        let (status, body) = fetch("/api/rewards?customerId=1&start=31-10-2025").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Invalid date format. Use yyyy-MM-dd"));
    }

    #[tokio::test]
    async fn test_start_after_end() {
        let (status, body) = fetch("/api/rewards?customerId=1&start=2025-09-01&end=2025-06-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Start date cannot be after end date"));
    }

    #[tokio::test]
    async fn test_period_requires_dates() {
        let (status, body) = fetch("/api/rewards/period?customerId=1&start=2025-06-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "End date must be provided to fetch rewards");

        let (status, body) = fetch("/api/rewards/period?customerId=1&start=2025-06-10&end=2025-06-10").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRewards"], 90);
    }

    #[tokio::test]
    async fn test_customer_default_year() {
        let (status, body) = fetch("/api/rewards/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalRewards"], 115);
        assert_eq!(body["monthlyRewards"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_all_customers() {
        let (status, body) = fetch("/api/rewards/customers").await;
        assert_eq!(status, StatusCode::OK);
        let summaries = body.as_array().unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0]["customerId"], 1);
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = fetch("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok" }));
    }
}

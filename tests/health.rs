mod common;

use axum::{extract::State, http::StatusCode};
use quickbite_api::{domain::StatusPolicy, routes::health::health_check};

#[tokio::test]
async fn health_check_reports_database_up() -> anyhow::Result<()> {
    let state = common::test_state(StatusPolicy::Strict).await?;

    let (status, response) = health_check(State(state)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response.0.message, "Health check");

    let data = serde_json::to_value(response.0.data.expect("health data"))?;
    assert_eq!(data["status"], "ok");
    assert_eq!(data["database"], "up");
    Ok(())
}

use axum::extract::State;
use garage_api::{billing::BillingRates, routes::health::health_check, state::AppState};
use sea_orm::DatabaseConnection;

#[tokio::test]
async fn health_check_reports_degraded_without_database() {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/unused")
        .expect("lazy pool");
    let state = AppState {
        pool,
        orm: DatabaseConnection::Disconnected,
        billing: BillingRates::default(),
    };

    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "degraded");
    assert_eq!(data.database, "down");
}

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardStats {
    pub vehicles_in_shop: i64,
    pub appointments_today: i64,
    pub pending_invoices: i64,
    pub monthly_revenue: Decimal,
    pub active_customers: i64,
    pub pending_part_requests: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MonthlyRevenue {
    pub month: u32,
    pub year: i32,
    pub revenue: Decimal,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RevenueChart {
    #[schema(value_type = Vec<MonthlyRevenue>)]
    pub items: Vec<MonthlyRevenue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiagnosisStats {
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityKind {
    Diagnosis,
    Appointment,
    Invoice,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityItem {
    /// `<kind>_<record id>`, e.g. `invoice_12`.
    pub id: String,
    pub kind: ActivityKind,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    /// `HH:MM` of `timestamp`.
    pub time: String,
    pub status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct RecentActivity {
    #[schema(value_type = Vec<ActivityItem>)]
    pub items: Vec<ActivityItem>,
}

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};

use crate::{
    dto::dashboard::{
        ActivityItem, ActivityKind, DashboardStats, DiagnosisStats, MonthlyRevenue,
        RecentActivity, RevenueChart,
    },
    entity::{
        Appointments, Customers, Diagnoses, Invoices, PartRequests, Vehicles, appointments,
        customers, diagnoses, invoices, part_requests, vehicles,
        enums::{DiagnosisStatus, InvoiceStatus, PartRequestStatus, VehicleStatus},
    },
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::lookup,
    state::AppState,
};

pub const REVENUE_CHART_MONTHS: usize = 6;
const RECENT_DIAGNOSES: u64 = 5;
const RECENT_APPOINTMENTS: u64 = 3;
const RECENT_INVOICES: u64 = 3;
const RECENT_ACTIVITY_LIMIT: usize = 10;

pub async fn stats(state: &AppState) -> AppResult<ApiResponse<DashboardStats>> {
    let conn = &state.orm;
    let now = Utc::now();
    let (day_start, day_end) = day_bounds(now.date_naive())?;
    let (month_start, month_end) = month_bounds(now.year(), now.month())?;

    let vehicles_in_shop = Vehicles::find()
        .filter(vehicles::Column::Status.eq(VehicleStatus::InShop))
        .count(conn)
        .await? as i64;
    let appointments_today = Appointments::find()
        .filter(appointments::Column::ScheduledAt.gte(day_start))
        .filter(appointments::Column::ScheduledAt.lt(day_end))
        .count(conn)
        .await? as i64;
    let pending_invoices = Invoices::find()
        .filter(invoices::Column::Status.eq(InvoiceStatus::Sent))
        .count(conn)
        .await? as i64;
    let active_customers = Customers::find()
        .filter(customers::Column::Active.eq(true))
        .count(conn)
        .await? as i64;
    let pending_part_requests = PartRequests::find()
        .filter(part_requests::Column::Status.is_in(PartRequestStatus::PENDING))
        .count(conn)
        .await? as i64;
    let monthly_revenue = paid_revenue(conn, month_start, month_end).await?;

    let data = DashboardStats {
        vehicles_in_shop,
        appointments_today,
        pending_invoices,
        monthly_revenue: monthly_revenue.round_dp(2),
        active_customers,
        pending_part_requests,
    };
    Ok(ApiResponse::success("Dashboard stats", data, Some(Meta::empty())))
}

/// Paid revenue per calendar month, oldest month first, ending with the
/// current one.
pub async fn revenue_chart(state: &AppState) -> AppResult<ApiResponse<RevenueChart>> {
    let today = Utc::now().date_naive();
    let mut items = Vec::with_capacity(REVENUE_CHART_MONTHS);

    for (year, month) in last_months(today, REVENUE_CHART_MONTHS) {
        let (start, end) = month_bounds(year, month)?;
        let revenue = paid_revenue(&state.orm, start, end).await?;
        items.push(MonthlyRevenue {
            month,
            year,
            revenue: revenue.round_dp(2),
        });
    }

    Ok(ApiResponse::success("Revenue chart", RevenueChart { items }, Some(Meta::empty())))
}

pub async fn diagnosis_stats(state: &AppState) -> AppResult<ApiResponse<DiagnosisStats>> {
    let conn = &state.orm;
    let by_status = |status: DiagnosisStatus| {
        Diagnoses::find()
            .filter(diagnoses::Column::Status.eq(status))
            .count(conn)
    };

    let data = DiagnosisStats {
        pending: by_status(DiagnosisStatus::Pending).await? as i64,
        in_progress: by_status(DiagnosisStatus::InProgress).await? as i64,
        completed: by_status(DiagnosisStatus::Completed).await? as i64,
        total: Diagnoses::find().count(conn).await? as i64,
    };
    Ok(ApiResponse::success("Diagnosis stats", data, Some(Meta::empty())))
}

/// Newest diagnoses, appointments of the last 24 hours and newest invoices,
/// merged newest first.
pub async fn recent_activity(state: &AppState) -> AppResult<ApiResponse<RecentActivity>> {
    let conn = &state.orm;
    let since = Utc::now() - Duration::hours(24);

    let diagnoses = Diagnoses::find()
        .order_by_desc(diagnoses::Column::DiagnosedAt)
        .limit(RECENT_DIAGNOSES)
        .all(conn)
        .await?;
    let appointments = Appointments::find()
        .filter(appointments::Column::ScheduledAt.gte(since))
        .order_by_desc(appointments::Column::ScheduledAt)
        .limit(RECENT_APPOINTMENTS)
        .all(conn)
        .await?;
    let invoices = Invoices::find()
        .order_by_desc(invoices::Column::IssueDate)
        .limit(RECENT_INVOICES)
        .all(conn)
        .await?;

    let appointment_diagnoses: Vec<(i32, i32)> = if appointments.is_empty() {
        Vec::new()
    } else {
        Diagnoses::find()
            .select_only()
            .column(diagnoses::Column::Id)
            .column(diagnoses::Column::VehicleId)
            .filter(
                diagnoses::Column::Id
                    .is_in(appointments.iter().map(|a| a.diagnosis_id).collect::<Vec<_>>()),
            )
            .into_tuple()
            .all(conn)
            .await?
    };
    let owners = lookup::vehicle_owners(
        conn,
        diagnoses
            .iter()
            .map(|d| d.vehicle_id)
            .chain(appointment_diagnoses.iter().map(|(_, vehicle_id)| *vehicle_id)),
    )
    .await?;
    let vehicle_label = |vehicle_id: Option<i32>| {
        vehicle_id
            .and_then(|id| owners.get(&id))
            .map(|o| o.vehicle_info.clone())
            .unwrap_or_else(|| "unknown vehicle".to_string())
    };

    let mut items = Vec::new();
    for d in diagnoses {
        items.push(activity(
            ActivityKind::Diagnosis,
            d.id,
            format!(
                "New diagnosis for {}: {}",
                vehicle_label(Some(d.vehicle_id)),
                excerpt(&d.fault_description, 50)
            ),
            d.diagnosed_at.with_timezone(&Utc),
            d.status.to_string(),
        ));
    }
    for a in appointments {
        let vehicle_id = appointment_diagnoses
            .iter()
            .find(|(diagnosis_id, _)| *diagnosis_id == a.diagnosis_id)
            .map(|(_, vehicle_id)| *vehicle_id);
        items.push(activity(
            ActivityKind::Appointment,
            a.id,
            format!("Appointment scheduled for {}", vehicle_label(vehicle_id)),
            a.scheduled_at.with_timezone(&Utc),
            a.status.to_string(),
        ));
    }
    for i in invoices {
        items.push(activity(
            ActivityKind::Invoice,
            i.id,
            format!("Invoice {} issued, {:.2}", i.invoice_number, i.total),
            i.issue_date.with_timezone(&Utc),
            i.status.to_string(),
        ));
    }

    let items = newest_first(items, RECENT_ACTIVITY_LIMIT);
    Ok(ApiResponse::success("Recent activity", RecentActivity { items }, Some(Meta::empty())))
}

async fn paid_revenue<C>(conn: &C, start: DateTime<Utc>, end: DateTime<Utc>) -> AppResult<Decimal>
where
    C: ConnectionTrait,
{
    let sum: Option<Option<Decimal>> = Invoices::find()
        .select_only()
        .column_as(invoices::Column::Total.sum(), "revenue")
        .filter(invoices::Column::Status.eq(InvoiceStatus::Paid))
        .filter(invoices::Column::IssueDate.gte(start))
        .filter(invoices::Column::IssueDate.lt(end))
        .into_tuple()
        .one(conn)
        .await?;
    Ok(sum.flatten().unwrap_or(Decimal::ZERO))
}

fn activity(
    kind: ActivityKind,
    id: i32,
    description: String,
    timestamp: DateTime<Utc>,
    status: String,
) -> ActivityItem {
    ActivityItem {
        id: format!("{kind}_{id}"),
        kind,
        description,
        time: timestamp.format("%H:%M").to_string(),
        timestamp,
        status,
    }
}

/// Sorted by timestamp, newest first, truncated to `limit`.
pub fn newest_first(mut items: Vec<ActivityItem>, limit: usize) -> Vec<ActivityItem> {
    items.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    items.truncate(limit);
    items
}

/// First `max_chars` characters, with `...` when cut.
pub fn excerpt(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// `[start, end)` of a UTC calendar day.
pub fn day_bounds(day: NaiveDate) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = midnight(day)?;
    Ok((start, start + Duration::days(1)))
}

/// `[start, end)` of a UTC calendar month.
pub fn month_bounds(year: i32, month: u32) -> AppResult<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid_month(year, month))?;
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| invalid_month(next_year, next_month))?;
    Ok((midnight(first)?, midnight(next)?))
}

/// The `count` calendar months ending with the month of `today`, oldest first.
pub fn last_months(today: NaiveDate, count: usize) -> Vec<(i32, u32)> {
    let mut year = today.year();
    let mut month = today.month();
    let mut months = Vec::with_capacity(count);
    for _ in 0..count {
        months.push((year, month));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    months.reverse();
    months
}

fn midnight(day: NaiveDate) -> AppResult<DateTime<Utc>> {
    day.and_hms_opt(0, 0, 0)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("no midnight on {day}")))
}

fn invalid_month(year: i32, month: u32) -> AppError {
    AppError::Internal(anyhow::anyhow!("invalid calendar month {year}-{month:02}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_bounds_roll_over_the_year() {
        let (start, end) = month_bounds(2024, 12).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn february_of_a_leap_year() {
        let (start, end) = month_bounds(2024, 2).unwrap();
        assert_eq!((end - start).num_days(), 29);
    }

    #[test]
    fn rejects_month_thirteen() {
        assert!(month_bounds(2024, 13).is_err());
    }

    #[test]
    fn last_six_months_are_chronological() {
        assert_eq!(
            last_months(date(2024, 3, 15), 6),
            vec![(2023, 10), (2023, 11), (2023, 12), (2024, 1), (2024, 2), (2024, 3)]
        );
    }

    #[test]
    fn day_bounds_cover_one_day() {
        let (start, end) = day_bounds(date(2024, 6, 30)).unwrap();
        assert_eq!(start.to_rfc3339(), "2024-06-30T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2024-07-01T00:00:00+00:00");
    }

    #[test]
    fn excerpt_marks_cut_text() {
        assert_eq!(excerpt("short", 50), "short");
        assert_eq!(excerpt("ruido en la dirección", 5), "ruido...");
        assert_eq!(excerpt("ñandú", 5), "ñandú");
    }

    #[test]
    fn activity_is_sorted_and_limited() {
        let base = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let items: Vec<ActivityItem> = (0..12)
            .map(|i| {
                activity(
                    ActivityKind::Diagnosis,
                    i,
                    String::new(),
                    base + Duration::minutes(i64::from(i)),
                    "pending".into(),
                )
            })
            .collect();

        let items = newest_first(items, 10);
        assert_eq!(items.len(), 10);
        assert_eq!(items[0].id, "diagnosis_11");
        assert_eq!(items[0].time, "08:11");
        assert_eq!(items[9].id, "diagnosis_2");
    }
}

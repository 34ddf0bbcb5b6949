use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    billing::{LaborLine, PartLine},
    entity::enums::{
        AppointmentKind, AppointmentStatus, DiagnosisStatus, InvoiceStatus, PartRequestStatus,
        Priority, SupplierKind, VehicleStatus,
    },
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: i32,
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub contact_person: String,
    pub registered_at: DateTime<Utc>,
    pub active: bool,
    pub vehicles_count: i64,
}

/// Billing contact printed on invoices.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerContact {
    pub full_name: String,
    pub national_id: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub contact_person: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub id: i32,
    pub customer_id: i32,
    pub customer_name: Option<String>,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub plate: String,
    pub vin: String,
    pub mileage: i32,
    pub registered_at: DateTime<Utc>,
    pub status: VehicleStatus,
    pub last_service: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Technician {
    pub id: i32,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialties: Vec<String>,
    pub hourly_rate: Decimal,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
    pub active_diagnoses: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Diagnosis {
    pub id: i32,
    pub vehicle_id: i32,
    pub vehicle_info: Option<String>,
    pub customer_name: Option<String>,
    pub technician_id: i32,
    pub technician_name: Option<String>,
    pub fault_description: String,
    pub diagnosed_at: DateTime<Utc>,
    pub status: DiagnosisStatus,
    pub priority: Priority,
    pub estimated_time: Option<String>,
    pub notes: Option<String>,
    pub estimated_cost: Decimal,
    pub required_parts: Vec<String>,
}

/// One line of a customer's repair history.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    pub diagnosis_id: i32,
    pub vehicle: String,
    pub diagnosed_at: DateTime<Utc>,
    pub description: String,
    pub status: DiagnosisStatus,
    pub estimated_cost: Decimal,
    pub technician: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Part {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub reference_price: Option<Decimal>,
    pub preferred_supplier_id: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartQuote {
    pub id: i32,
    pub request_id: i32,
    pub supplier_id: i32,
    pub supplier_name: Option<String>,
    pub supplier_kind: Option<SupplierKind>,
    pub price: Decimal,
    pub delivery_time: Option<String>,
    pub quoted_at: DateTime<Utc>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartRequest {
    pub id: i32,
    pub diagnosis_id: i32,
    pub part_id: i32,
    pub part_name: Option<String>,
    pub quantity: i32,
    pub status: PartRequestStatus,
    pub requested_at: DateTime<Utc>,
    pub best_offer_price: Option<Decimal>,
    pub selected_supplier_id: Option<i32>,
    pub selected_supplier_name: Option<String>,
    pub delivery_time: Option<String>,
    pub quotes: Vec<PartQuote>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub kind: SupplierKind,
    pub active: bool,
    pub avg_response_time: Option<String>,
    pub registered_at: DateTime<Utc>,
    pub quotes_sent: i64,
    pub orders_placed: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Appointment {
    pub id: i32,
    pub diagnosis_id: i32,
    pub vehicle_info: Option<String>,
    pub customer_name: Option<String>,
    pub technician_id: i32,
    pub technician_name: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub date: NaiveDate,
    /// `HH:MM`
    pub start_time: String,
    /// `HH:MM`, start plus the estimated duration.
    pub end_time: String,
    pub estimated_duration: i32,
    /// e.g. `2h 30m`
    pub duration_label: String,
    pub status: AppointmentStatus,
    pub kind: AppointmentKind,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Invoice {
    pub id: i32,
    pub invoice_number: String,
    pub diagnosis_id: i32,
    pub vehicle_info: Option<String>,
    pub customer_name: Option<String>,
    pub customer: Option<CustomerContact>,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: InvoiceStatus,
    pub parts_subtotal: Decimal,
    pub parts_markup: Decimal,
    pub labor_subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub parts_detail: Vec<PartLine>,
    pub labor_detail: Vec<LaborLine>,
    pub pdf_path: Option<String>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    billing::{LaborLine, PartLine},
    entity::enums::InvoiceStatus,
    models::Invoice,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateInvoiceRequest {
    pub diagnosis_id: i32,
    #[serde(default, alias = "detalle_repuestos")]
    pub parts_detail: Vec<PartLine>,
    #[serde(default, alias = "detalle_mano_obra")]
    pub labor_detail: Vec<LaborLine>,
    /// Defaults to `issue_date + 30 days`.
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: InvoiceStatus,
    pub pdf_path: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvoiceStatusRequest {
    pub status: InvoiceStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateInvoiceDetailRequest {
    #[serde(default, alias = "detalle_repuestos")]
    pub parts_detail: Vec<PartLine>,
    #[serde(default, alias = "detalle_mano_obra")]
    pub labor_detail: Vec<LaborLine>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct InvoiceList {
    #[schema(value_type = Vec<Invoice>)]
    pub items: Vec<Invoice>,
}

use std::collections::HashMap;

use anyhow::Context;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;

use crate::{
    audit,
    billing::{
        InvoiceDraft, LaborLine, PartLine, assign_invoice_number, decode_labor, decode_parts,
    },
    dto::invoices::{
        CreateInvoiceRequest, InvoiceList, UpdateInvoiceDetailRequest, UpdateInvoiceStatusRequest,
    },
    entity::{
        Diagnoses, diagnoses,
        enums::InvoiceStatus,
        invoices::{ActiveModel, Column, Entity as Invoices, Model as InvoiceModel},
    },
    error::{AppError, AppResult},
    models::Invoice,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, StatusQuery, status_filter},
    services::lookup,
    state::AppState,
};

pub async fn list_invoices(
    state: &AppState,
    pagination: Pagination,
    query: StatusQuery,
) -> AppResult<ApiResponse<InvoiceList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();
    if let Some(status) = status_filter::<InvoiceStatus>(query.status.as_deref())? {
        condition = condition.add(Column::Status.eq(status));
    }

    let finder = Invoices::find()
        .filter(condition)
        .order_by_desc(Column::IssueDate)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_invoices(&state.orm, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Invoices", InvoiceList { items }, Some(meta)))
}

/// Bills a diagnosis: prices the detail, numbers the invoice and stores it.
///
/// The number is reserved inside the insert transaction, so a failed insert
/// gives it back.
pub async fn create_invoice(
    state: &AppState,
    payload: CreateInvoiceRequest,
) -> AppResult<ApiResponse<Invoice>> {
    validate_detail(&payload.parts_detail, &payload.labor_detail)?;

    Diagnoses::find_by_id(payload.diagnosis_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Diagnosis"))?;

    let already_billed = Invoices::find()
        .filter(Column::DiagnosisId.eq(payload.diagnosis_id))
        .count(&state.orm)
        .await?;
    if already_billed > 0 {
        return Err(AppError::Conflict(format!(
            "diagnosis {} already has an invoice",
            payload.diagnosis_id
        )));
    }

    let mut draft = InvoiceDraft::new(Utc::now(), payload.parts_detail, payload.labor_detail);
    draft.due_date = payload.due_date;
    draft.compute_totals(&state.billing);

    let txn = state.orm.begin().await?;
    assign_invoice_number(&txn, &mut draft).await?;
    let invoice_number = draft
        .invoice_number
        .clone()
        .context("invoice number missing after assignment")?;

    let invoice = ActiveModel {
        id: NotSet,
        invoice_number: Set(invoice_number),
        diagnosis_id: Set(payload.diagnosis_id),
        issue_date: Set(draft.issue_date.into()),
        due_date: Set(draft.due_date.map(Into::into)),
        status: Set(payload.status),
        parts_subtotal: Set(draft.totals.parts_subtotal),
        parts_markup: Set(draft.totals.parts_markup),
        labor_subtotal: Set(draft.totals.labor_subtotal),
        tax: Set(draft.totals.tax),
        total: Set(draft.totals.total),
        parts_detail: Set(Some(encode_detail(&draft.parts)?)),
        labor_detail: Set(Some(encode_detail(&draft.labor)?)),
        pdf_path: Set(payload.pdf_path),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    tracing::info!(
        invoice_id = invoice.id,
        invoice_number = %invoice.invoice_number,
        diagnosis_id = invoice.diagnosis_id,
        total = %invoice.total,
        "invoice created"
    );
    audit::record(
        &state.pool,
        "invoice_create",
        "invoices",
        serde_json::json!({
            "invoice_id": invoice.id,
            "invoice_number": invoice.invoice_number,
            "total": invoice.total,
        }),
    )
    .await;

    let data = single(&state.orm, invoice).await?;
    Ok(ApiResponse::success("Invoice created", data, Some(Meta::empty())))
}

pub async fn get_invoice(state: &AppState, id: i32) -> AppResult<ApiResponse<Invoice>> {
    let invoice = find_invoice(state, id).await?;
    let data = single(&state.orm, invoice).await?;
    Ok(ApiResponse::success("Invoice", data, None))
}

/// Any status may follow any other.
pub async fn update_invoice_status(
    state: &AppState,
    id: i32,
    payload: UpdateInvoiceStatusRequest,
) -> AppResult<ApiResponse<Invoice>> {
    let existing = find_invoice(state, id).await?;
    let previous = existing.status;

    let mut active: ActiveModel = existing.into();
    active.status = Set(payload.status);
    let invoice = active.update(&state.orm).await?;

    tracing::info!(invoice_id = id, from = %previous, to = %payload.status, "invoice status changed");
    audit::record(
        &state.pool,
        "invoice_status",
        "invoices",
        serde_json::json!({ "invoice_id": id, "from": previous, "to": payload.status }),
    )
    .await;

    let data = single(&state.orm, invoice).await?;
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

/// Replaces the line items and recomputes the totals. The number, issue
/// date and due date stay as they are.
pub async fn update_invoice_detail(
    state: &AppState,
    id: i32,
    payload: UpdateInvoiceDetailRequest,
) -> AppResult<ApiResponse<Invoice>> {
    validate_detail(&payload.parts_detail, &payload.labor_detail)?;
    let existing = find_invoice(state, id).await?;

    let mut draft = InvoiceDraft::new(
        existing.issue_date.with_timezone(&Utc),
        payload.parts_detail,
        payload.labor_detail,
    );
    draft.invoice_number = Some(existing.invoice_number.clone());
    draft.due_date = existing.due_date.map(|d| d.with_timezone(&Utc));
    draft.compute_totals(&state.billing);

    let mut active: ActiveModel = existing.into();
    active.due_date = Set(draft.due_date.map(Into::into));
    active.parts_subtotal = Set(draft.totals.parts_subtotal);
    active.parts_markup = Set(draft.totals.parts_markup);
    active.labor_subtotal = Set(draft.totals.labor_subtotal);
    active.tax = Set(draft.totals.tax);
    active.total = Set(draft.totals.total);
    active.parts_detail = Set(Some(encode_detail(&draft.parts)?));
    active.labor_detail = Set(Some(encode_detail(&draft.labor)?));
    let invoice = active.update(&state.orm).await?;

    tracing::info!(invoice_id = id, total = %invoice.total, "invoice detail replaced");
    audit::record(
        &state.pool,
        "invoice_detail",
        "invoices",
        serde_json::json!({ "invoice_id": id, "total": invoice.total }),
    )
    .await;

    let data = single(&state.orm, invoice).await?;
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

/// Prices and labor totals must not be negative.
pub fn validate_detail(parts: &[PartLine], labor: &[LaborLine]) -> AppResult<()> {
    if let Some((index, part)) = parts
        .iter()
        .enumerate()
        .find(|(_, p)| p.base_price.is_sign_negative())
    {
        return Err(AppError::BadRequest(format!(
            "parts_detail[{index}] '{}' has a negative price",
            part.name
        )));
    }
    if let Some(index) = labor.iter().position(|l| l.total.is_sign_negative()) {
        return Err(AppError::BadRequest(format!(
            "labor_detail[{index}] has a negative total"
        )));
    }
    Ok(())
}

fn encode_detail<T: serde::Serialize>(lines: &[T]) -> AppResult<Value> {
    Ok(serde_json::to_value(lines).context("encoding invoice detail")?)
}

async fn find_invoice(state: &AppState, id: i32) -> AppResult<InvoiceModel> {
    Invoices::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Invoice"))
}

async fn single<C>(conn: &C, model: InvoiceModel) -> AppResult<Invoice>
where
    C: ConnectionTrait,
{
    project_invoices(conn, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Invoice"))
}

async fn project_invoices<C>(conn: &C, rows: Vec<InvoiceModel>) -> AppResult<Vec<Invoice>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let vehicle_of: HashMap<i32, i32> = Diagnoses::find()
        .select_only()
        .column(diagnoses::Column::Id)
        .column(diagnoses::Column::VehicleId)
        .filter(diagnoses::Column::Id.is_in(rows.iter().map(|i| i.diagnosis_id).collect::<Vec<_>>()))
        .into_tuple::<(i32, i32)>()
        .all(conn)
        .await?
        .into_iter()
        .collect();
    let owners = lookup::vehicle_owners(conn, vehicle_of.values().copied()).await?;

    rows.into_iter()
        .map(|invoice| -> AppResult<Invoice> {
            let owner = vehicle_of
                .get(&invoice.diagnosis_id)
                .and_then(|vehicle_id| owners.get(vehicle_id));
            Ok(Invoice {
                id: invoice.id,
                vehicle_info: owner.map(|o| o.vehicle_info.clone()),
                customer_name: owner.and_then(|o| o.customer_name()),
                customer: owner.and_then(|o| o.contact()),
                parts_detail: decode_parts(invoice.parts_detail.as_ref())?,
                labor_detail: decode_labor(invoice.labor_detail.as_ref())?,
                invoice_number: invoice.invoice_number,
                diagnosis_id: invoice.diagnosis_id,
                issue_date: invoice.issue_date.with_timezone(&Utc),
                due_date: invoice.due_date.map(|d| d.with_timezone(&Utc)),
                status: invoice.status,
                parts_subtotal: invoice.parts_subtotal,
                parts_markup: invoice.parts_markup,
                labor_subtotal: invoice.labor_subtotal,
                tax: invoice.tax,
                total: invoice.total,
                pdf_path: invoice.pdf_path,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::PartCondition;
    use rust_decimal_macros::dec;

    #[test]
    fn accepts_free_and_priced_lines() {
        let parts = vec![
            PartLine::new("Brake pads", dec!(45.00), PartCondition::New),
            PartLine::new("Washer", dec!(0), PartCondition::Used),
        ];
        let labor = vec![LaborLine::new("Fit pads", dec!(60))];
        assert!(validate_detail(&parts, &labor).is_ok());
        assert!(validate_detail(&[], &[]).is_ok());
    }

    #[test]
    fn rejects_negative_part_price() {
        let parts = vec![
            PartLine::new("Filter", dec!(12), PartCondition::New),
            PartLine::new("Refund", dec!(-5), PartCondition::New),
        ];
        let err = validate_detail(&parts, &[]).unwrap_err();
        match err {
            AppError::BadRequest(message) => assert!(message.contains("parts_detail[1]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_labor() {
        let labor = vec![LaborLine::new("Discount", dec!(-10))];
        assert!(matches!(
            validate_detail(&[], &labor),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn encoded_detail_uses_wire_names() {
        let value = encode_detail(&[PartLine::new("Alternator", dec!(100), PartCondition::Used)])
            .unwrap();
        assert_eq!(value[0]["nombre"], "Alternator");
        assert_eq!(value[0]["tipo"], "usado");
    }
}

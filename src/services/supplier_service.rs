use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use validator::Validate;

use crate::{
    dto::suppliers::{CreateSupplierRequest, SupplierList},
    entity::{
        PartQuotes, PartRequests, part_quotes, part_requests,
        suppliers::{ActiveModel, Column, Entity as Suppliers, Model as SupplierModel},
    },
    error::AppResult,
    models::Supplier,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::lookup,
    state::AppState,
};

pub async fn list_suppliers(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<SupplierList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let finder = Suppliers::find().order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = rows.iter().map(|s| s.id).collect();
    let (quotes, orders) = if ids.is_empty() {
        Default::default()
    } else {
        let quotes = lookup::counts_by(
            &state.orm,
            PartQuotes::find().filter(part_quotes::Column::SupplierId.is_in(ids.clone())),
            part_quotes::Column::SupplierId,
        )
        .await?;
        let orders = lookup::counts_by(
            &state.orm,
            PartRequests::find().filter(part_requests::Column::SelectedSupplierId.is_in(ids)),
            part_requests::Column::SelectedSupplierId,
        )
        .await?;
        (quotes, orders)
    };

    let items = rows
        .into_iter()
        .map(|s| {
            let sent = quotes.get(&s.id).copied().unwrap_or(0);
            let placed = orders.get(&s.id).copied().unwrap_or(0);
            supplier_from_entity(s, sent, placed)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Suppliers", SupplierList { items }, Some(meta)))
}

pub async fn create_supplier(
    state: &AppState,
    payload: CreateSupplierRequest,
) -> AppResult<ApiResponse<Supplier>> {
    payload.validate()?;

    let supplier = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        email: Set(payload.email),
        phone: Set(payload.phone),
        kind: Set(payload.kind),
        active: Set(true),
        avg_response_time: Set(payload.avg_response_time),
        registered_at: Set(Utc::now().into()),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(supplier_id = supplier.id, "supplier created");

    Ok(ApiResponse::success(
        "Supplier created",
        supplier_from_entity(supplier, 0, 0),
        Some(Meta::empty()),
    ))
}

fn supplier_from_entity(model: SupplierModel, quotes_sent: i64, orders_placed: i64) -> Supplier {
    Supplier {
        id: model.id,
        name: model.name,
        email: model.email,
        phone: model.phone,
        kind: model.kind,
        active: model.active,
        avg_response_time: model.avg_response_time,
        registered_at: model.registered_at.with_timezone(&Utc),
        quotes_sent,
        orders_placed,
    }
}

use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use validator::Validate;

use crate::{
    audit,
    dto::parts::{
        CreatePartRequest, CreatePartRequestRequest, CreateQuoteRequest, PartList,
        PartRequestList, UpdatePartRequestStatusRequest,
    },
    entity::{
        Diagnoses, PartQuotes, PartRequests, Parts, Suppliers,
        enums::PartRequestStatus,
        part_quotes, part_requests, parts,
    },
    error::{AppError, AppResult},
    models::{Part, PartQuote, PartRequest},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, StatusQuery, status_filter},
    services::lookup,
    state::AppState,
};

pub async fn list_parts(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<PartList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let finder = Parts::find().order_by_asc(parts::Column::Name);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(part_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Parts", PartList { items }, Some(meta)))
}

pub async fn create_part(
    state: &AppState,
    payload: CreatePartRequest,
) -> AppResult<ApiResponse<Part>> {
    payload.validate()?;
    if payload.reference_price.is_some_and(|p| p.is_sign_negative()) {
        return Err(AppError::BadRequest("reference_price must not be negative".into()));
    }
    if let Some(supplier_id) = payload.preferred_supplier_id {
        Suppliers::find_by_id(supplier_id)
            .one(&state.orm)
            .await?
            .ok_or(AppError::NotFound("Supplier"))?;
    }

    let part = parts::ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        description: Set(payload.description),
        category: Set(payload.category),
        reference_price: Set(payload.reference_price),
        preferred_supplier_id: Set(payload.preferred_supplier_id),
    }
    .insert(&state.orm)
    .await?;

    Ok(ApiResponse::success(
        "Part created",
        part_from_entity(part),
        Some(Meta::empty()),
    ))
}

pub async fn list_requests(
    state: &AppState,
    pagination: Pagination,
    query: StatusQuery,
) -> AppResult<ApiResponse<PartRequestList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();
    if let Some(status) = status_filter::<PartRequestStatus>(query.status.as_deref())? {
        condition = condition.add(part_requests::Column::Status.eq(status));
    }

    let finder = PartRequests::find()
        .filter(condition)
        .order_by_desc(part_requests::Column::RequestedAt)
        .order_by_desc(part_requests::Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_requests(&state.orm, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Part requests", PartRequestList { items }, Some(meta)))
}

pub async fn create_request(
    state: &AppState,
    payload: CreatePartRequestRequest,
) -> AppResult<ApiResponse<PartRequest>> {
    payload.validate()?;

    Diagnoses::find_by_id(payload.diagnosis_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Diagnosis"))?;
    Parts::find_by_id(payload.part_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Part"))?;

    let request = part_requests::ActiveModel {
        id: NotSet,
        diagnosis_id: Set(payload.diagnosis_id),
        part_id: Set(payload.part_id),
        quantity: Set(payload.quantity),
        status: Set(PartRequestStatus::Requested),
        requested_at: Set(Utc::now().into()),
        best_offer_price: Set(None),
        selected_supplier_id: Set(None),
        delivery_time: Set(None),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(
        request_id = request.id,
        diagnosis_id = request.diagnosis_id,
        "part requested"
    );

    let data = single(&state.orm, request).await?;
    Ok(ApiResponse::success("Part request created", data, Some(Meta::empty())))
}

pub async fn update_request_status(
    state: &AppState,
    id: i32,
    payload: UpdatePartRequestStatusRequest,
) -> AppResult<ApiResponse<PartRequest>> {
    let existing = PartRequests::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Part request"))?;
    let previous = existing.status;

    let mut active: part_requests::ActiveModel = existing.into();
    active.status = Set(payload.status);
    let request = active.update(&state.orm).await?;

    tracing::info!(request_id = id, from = %previous, to = %payload.status, "part request status changed");
    audit::record(
        &state.pool,
        "part_request_status",
        "part_requests",
        serde_json::json!({ "request_id": id, "from": previous, "to": payload.status }),
    )
    .await;

    let data = single(&state.orm, request).await?;
    Ok(ApiResponse::success("Updated", data, Some(Meta::empty())))
}

/// Records a supplier quote. The request follows the cheapest quote seen so
/// far, and a request still in `requested` moves to `quoted`.
pub async fn add_quote(
    state: &AppState,
    request_id: i32,
    payload: CreateQuoteRequest,
) -> AppResult<ApiResponse<PartRequest>> {
    payload.validate()?;
    if payload.price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be greater than zero".into()));
    }

    let txn = state.orm.begin().await?;

    let request = PartRequests::find_by_id(request_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Part request"))?;
    Suppliers::find_by_id(payload.supplier_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound("Supplier"))?;

    let quote = part_quotes::ActiveModel {
        id: NotSet,
        request_id: Set(request.id),
        supplier_id: Set(payload.supplier_id),
        price: Set(payload.price),
        delivery_time: Set(payload.delivery_time.clone()),
        quoted_at: Set(Utc::now().into()),
        valid_until: Set(payload.valid_until.map(Into::into)),
    }
    .insert(&txn)
    .await?;

    let is_best = is_better_offer(request.best_offer_price, quote.price);
    let moves_to_quoted = request.status == PartRequestStatus::Requested;

    let request = if is_best || moves_to_quoted {
        let mut active: part_requests::ActiveModel = request.into();
        if is_best {
            active.best_offer_price = Set(Some(quote.price));
            active.selected_supplier_id = Set(Some(quote.supplier_id));
            active.delivery_time = Set(quote.delivery_time.clone());
        }
        if moves_to_quoted {
            active.status = Set(PartRequestStatus::Quoted);
        }
        active.update(&txn).await?
    } else {
        request
    };

    txn.commit().await?;

    tracing::info!(
        request_id,
        quote_id = quote.id,
        supplier_id = quote.supplier_id,
        best = is_best,
        "quote recorded"
    );

    let data = single(&state.orm, request).await?;
    Ok(ApiResponse::success("Quote recorded", data, Some(Meta::empty())))
}

/// Ties keep the earlier quote.
fn is_better_offer(current_best: Option<Decimal>, price: Decimal) -> bool {
    current_best.is_none_or(|best| price < best)
}

async fn single<C>(conn: &C, model: part_requests::Model) -> AppResult<PartRequest>
where
    C: ConnectionTrait,
{
    project_requests(conn, vec![model])
        .await?
        .pop()
        .ok_or(AppError::NotFound("Part request"))
}

async fn project_requests<C>(
    conn: &C,
    rows: Vec<part_requests::Model>,
) -> AppResult<Vec<PartRequest>>
where
    C: ConnectionTrait,
{
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let quotes = PartQuotes::find()
        .filter(part_quotes::Column::RequestId.is_in(ids))
        .order_by_asc(part_quotes::Column::Price)
        .order_by_asc(part_quotes::Column::Id)
        .all(conn)
        .await?;

    let part_names = lookup::part_names(conn, rows.iter().map(|r| r.part_id)).await?;
    let suppliers = lookup::suppliers_by_id(
        conn,
        quotes
            .iter()
            .map(|q| q.supplier_id)
            .chain(rows.iter().filter_map(|r| r.selected_supplier_id)),
    )
    .await?;

    let mut quotes_by_request: HashMap<i32, Vec<PartQuote>> = HashMap::new();
    for quote in quotes {
        let supplier = suppliers.get(&quote.supplier_id);
        quotes_by_request
            .entry(quote.request_id)
            .or_default()
            .push(PartQuote {
                id: quote.id,
                request_id: quote.request_id,
                supplier_id: quote.supplier_id,
                supplier_name: supplier.map(|s| s.name.clone()),
                supplier_kind: supplier.map(|s| s.kind),
                price: quote.price,
                delivery_time: quote.delivery_time,
                quoted_at: quote.quoted_at.with_timezone(&Utc),
                valid_until: quote.valid_until.map(|at| at.with_timezone(&Utc)),
            });
    }

    Ok(rows
        .into_iter()
        .map(|r| PartRequest {
            id: r.id,
            diagnosis_id: r.diagnosis_id,
            part_id: r.part_id,
            part_name: part_names.get(&r.part_id).cloned(),
            quantity: r.quantity,
            status: r.status,
            requested_at: r.requested_at.with_timezone(&Utc),
            best_offer_price: r.best_offer_price,
            selected_supplier_id: r.selected_supplier_id,
            selected_supplier_name: r
                .selected_supplier_id
                .and_then(|id| suppliers.get(&id))
                .map(|s| s.name.clone()),
            delivery_time: r.delivery_time,
            quotes: quotes_by_request.remove(&r.id).unwrap_or_default(),
        })
        .collect())
}

fn part_from_entity(model: parts::Model) -> Part {
    Part {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        reference_price: model.reference_price,
        preferred_supplier_id: model.preferred_supplier_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn first_quote_is_always_best() {
        assert!(is_better_offer(None, dec!(120.00)));
    }

    #[test]
    fn only_cheaper_quotes_replace_the_best() {
        assert!(is_better_offer(Some(dec!(120.00)), dec!(99.90)));
        assert!(!is_better_offer(Some(dec!(120.00)), dec!(120.00)));
        assert!(!is_better_offer(Some(dec!(120.00)), dec!(150.00)));
    }
}

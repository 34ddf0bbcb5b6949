use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use validator::Validate;

use crate::{
    audit,
    dto::customers::{
        CreateCustomerRequest, CustomerHistory, CustomerList, CustomerWithVehicles,
        UpdateCustomerRequest,
    },
    entity::{
        Diagnoses, Vehicles,
        customers::{ActiveModel, Column, Entity as Customers, Model as CustomerModel},
        diagnoses, vehicles,
        enums::VehicleStatus,
    },
    error::{AppError, AppResult},
    models::{Customer, HistoryEntry},
    response::{ApiResponse, Meta},
    routes::params::{CustomerQuery, Pagination, search_term},
    services::{lookup, vehicle_service},
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    pagination: Pagination,
    query: CustomerQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    let (page, limit, offset) = pagination.normalize()?;
    let mut condition = Condition::all();

    if let Some(pattern) = search_term(query.search.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::FullName).ilike(pattern.clone()))
                .add(Expr::col(Column::NationalId).ilike(pattern.clone()))
                .add(Expr::col(Column::Phone).ilike(pattern.clone()))
                .add(Expr::col(Column::Email).ilike(pattern)),
        );
    }

    let finder = Customers::find()
        .filter(condition)
        .order_by_desc(Column::RegisteredAt)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = project_customers(state, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Customers", CustomerList { items }, Some(meta)))
}

pub async fn create_customer(
    state: &AppState,
    payload: CreateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let national_id = payload.national_id.trim().to_string();
    ensure_national_id_free(state, &national_id, None).await?;

    let customer = ActiveModel {
        id: NotSet,
        full_name: Set(payload.full_name),
        national_id: Set(national_id),
        phone: Set(payload.phone),
        email: Set(payload.email),
        address: Set(payload.address),
        contact_person: Set(payload.contact_person),
        registered_at: Set(Utc::now().into()),
        active: Set(true),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(customer_id = customer.id, "customer created");
    audit::record(
        &state.pool,
        "customer_create",
        "customers",
        serde_json::json!({ "customer_id": customer.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Customer created",
        customer_from_entity(customer, 0),
        Some(Meta::empty()),
    ))
}

pub async fn get_customer(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<CustomerWithVehicles>> {
    let customer = find_customer(state, id).await?;

    let vehicles = Vehicles::find()
        .filter(vehicles::Column::CustomerId.eq(id))
        .order_by_asc(vehicles::Column::Id)
        .all(&state.orm)
        .await?;
    let count = vehicles.len() as i64;
    let vehicles = vehicle_service::project_vehicles(&state.orm, vehicles).await?;

    let data = CustomerWithVehicles {
        customer: customer_from_entity(customer, count),
        vehicles,
    };
    Ok(ApiResponse::success("Customer", data, None))
}

pub async fn update_customer(
    state: &AppState,
    id: i32,
    payload: UpdateCustomerRequest,
) -> AppResult<ApiResponse<Customer>> {
    payload.validate()?;
    let existing = find_customer(state, id).await?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(national_id) = payload.national_id.map(|n| n.trim().to_string()) {
        if national_id != existing.national_id {
            ensure_national_id_free(state, &national_id, Some(id)).await?;
            active.national_id = Set(national_id);
        }
    }
    if let Some(full_name) = payload.full_name {
        active.full_name = Set(full_name);
    }
    if let Some(phone) = payload.phone {
        active.phone = Set(phone);
    }
    if let Some(email) = payload.email {
        active.email = Set(email);
    }
    if let Some(address) = payload.address {
        active.address = Set(address);
    }
    if let Some(contact_person) = payload.contact_person {
        active.contact_person = Set(contact_person);
    }

    let customer = active.update(&state.orm).await?;
    let count = Vehicles::find()
        .filter(vehicles::Column::CustomerId.eq(id))
        .count(&state.orm)
        .await? as i64;

    Ok(ApiResponse::success(
        "Updated",
        customer_from_entity(customer, count),
        Some(Meta::empty()),
    ))
}

/// Deactivates the customer. Refused while any of their vehicles is active.
pub async fn deactivate_customer(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_customer(state, id).await?;

    let active_vehicles = Vehicles::find()
        .filter(vehicles::Column::CustomerId.eq(id))
        .filter(vehicles::Column::Status.eq(VehicleStatus::Active))
        .count(&state.orm)
        .await?;
    if active_vehicles > 0 {
        return Err(AppError::Conflict(format!(
            "customer has {active_vehicles} active vehicle(s)"
        )));
    }

    let mut active: ActiveModel = existing.into();
    active.active = Set(false);
    active.update(&state.orm).await?;

    tracing::info!(customer_id = id, "customer deactivated");
    audit::record(
        &state.pool,
        "customer_deactivate",
        "customers",
        serde_json::json!({ "customer_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "id": id }),
        Some(Meta::empty()),
    ))
}

/// Every diagnosis on any of the customer's vehicles, newest first.
pub async fn customer_history(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<CustomerHistory>> {
    find_customer(state, id).await?;

    let vehicles = Vehicles::find()
        .filter(vehicles::Column::CustomerId.eq(id))
        .all(&state.orm)
        .await?;
    if vehicles.is_empty() {
        return Ok(ApiResponse::success(
            "History",
            CustomerHistory { items: Vec::new() },
            None,
        ));
    }

    let labels: std::collections::HashMap<i32, String> =
        vehicles.iter().map(|v| (v.id, v.label())).collect();

    let rows = Diagnoses::find()
        .filter(diagnoses::Column::VehicleId.is_in(labels.keys().copied().collect::<Vec<_>>()))
        .order_by_desc(diagnoses::Column::DiagnosedAt)
        .order_by_desc(diagnoses::Column::Id)
        .all(&state.orm)
        .await?;

    let technicians =
        lookup::technician_names(&state.orm, rows.iter().map(|d| d.technician_id)).await?;

    let items = rows
        .into_iter()
        .map(|d| HistoryEntry {
            diagnosis_id: d.id,
            vehicle: labels.get(&d.vehicle_id).cloned().unwrap_or_default(),
            diagnosed_at: d.diagnosed_at.with_timezone(&Utc),
            description: d.fault_description,
            status: d.status,
            estimated_cost: d.estimated_cost,
            technician: technicians.get(&d.technician_id).cloned(),
        })
        .collect();

    Ok(ApiResponse::success("History", CustomerHistory { items }, None))
}

async fn find_customer(state: &AppState, id: i32) -> AppResult<CustomerModel> {
    Customers::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound("Customer"))
}

async fn ensure_national_id_free(
    state: &AppState,
    national_id: &str,
    except: Option<i32>,
) -> AppResult<()> {
    let mut finder = Customers::find().filter(Column::NationalId.eq(national_id));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::Conflict(format!(
            "a customer with national id {national_id} already exists"
        )));
    }
    Ok(())
}

async fn project_customers(
    state: &AppState,
    rows: Vec<CustomerModel>,
) -> AppResult<Vec<Customer>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|c| c.id).collect();
    let counts = lookup::counts_by(
        &state.orm,
        Vehicles::find().filter(vehicles::Column::CustomerId.is_in(ids)),
        vehicles::Column::CustomerId,
    )
    .await?;

    Ok(rows
        .into_iter()
        .map(|c| {
            let count = counts.get(&c.id).copied().unwrap_or(0);
            customer_from_entity(c, count)
        })
        .collect())
}

fn customer_from_entity(model: CustomerModel, vehicles_count: i64) -> Customer {
    Customer {
        id: model.id,
        full_name: model.full_name,
        national_id: model.national_id,
        phone: model.phone,
        email: model.email,
        address: model.address,
        contact_person: model.contact_person,
        registered_at: model.registered_at.with_timezone(&Utc),
        active: model.active,
        vehicles_count,
    }
}

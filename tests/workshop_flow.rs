mod common;

use garage_api::{
    dto::{
        customers::CreateCustomerRequest,
        diagnoses::UpdateDiagnosisRequest,
        parts::{CreatePartRequest, CreatePartRequestRequest, CreateQuoteRequest},
        suppliers::CreateSupplierRequest,
    },
    entity::enums::{DiagnosisStatus, PartRequestStatus, SupplierKind, VehicleStatus},
    error::AppError,
    services::{customer_service, diagnosis_service, parts_service, supplier_service, vehicle_service},
    state::AppState,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

async fn supplier(state: &AppState, kind: SupplierKind) -> anyhow::Result<i32> {
    let tag = common::tag().to_lowercase();
    let supplier = supplier_service::create_supplier(
        state,
        CreateSupplierRequest {
            name: format!("Proveedor {tag}"),
            email: format!("supplier-{tag}@example.com"),
            phone: None,
            kind,
            avg_response_time: Some("2-4h".into()),
        },
    )
    .await?
    .data
    .expect("supplier");
    Ok(supplier.id)
}

fn quote(supplier_id: i32, price: Decimal, delivery: &str) -> CreateQuoteRequest {
    CreateQuoteRequest {
        supplier_id,
        price,
        delivery_time: Some(delivery.into()),
        valid_until: None,
    }
}

// Part request follows the cheapest quote; a dearer one later changes nothing.
#[tokio::test]
async fn quotes_track_the_best_offer() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let shop = common::workshop(&state).await?;
    let diagnosis_id = common::diagnosis(&state, &shop, "Batería descargada").await?;

    let new_parts = supplier(&state, SupplierKind::New).await?;
    let scrapyard = supplier(&state, SupplierKind::Used).await?;

    let part = parts_service::create_part(
        &state,
        CreatePartRequest {
            name: "Batería 12V".into(),
            description: None,
            category: Some("Eléctrico".into()),
            reference_price: Some(dec!(120)),
            preferred_supplier_id: Some(new_parts),
        },
    )
    .await?
    .data
    .expect("part");

    let request = parts_service::create_request(
        &state,
        CreatePartRequestRequest {
            diagnosis_id,
            part_id: part.id,
            quantity: 1,
        },
    )
    .await?
    .data
    .expect("part request");
    assert_eq!(request.status, PartRequestStatus::Requested);
    assert_eq!(request.best_offer_price, None);

    let quoted = parts_service::add_quote(&state, request.id, quote(new_parts, dec!(110), "2-4h"))
        .await?
        .data
        .expect("part request");
    assert_eq!(quoted.status, PartRequestStatus::Quoted);
    assert_eq!(quoted.best_offer_price, Some(dec!(110)));
    assert_eq!(quoted.selected_supplier_id, Some(new_parts));

    let cheaper = parts_service::add_quote(&state, request.id, quote(scrapyard, dec!(70), "4-8h"))
        .await?
        .data
        .expect("part request");
    assert_eq!(cheaper.best_offer_price, Some(dec!(70)));
    assert_eq!(cheaper.selected_supplier_id, Some(scrapyard));
    assert_eq!(cheaper.delivery_time.as_deref(), Some("4-8h"));

    let dearer = parts_service::add_quote(&state, request.id, quote(new_parts, dec!(95), "1-2h"))
        .await?
        .data
        .expect("part request");
    assert_eq!(dearer.best_offer_price, Some(dec!(70)));
    assert_eq!(dearer.selected_supplier_id, Some(scrapyard));
    assert_eq!(dearer.quotes.len(), 3);
    assert_eq!(dearer.quotes[0].price, dec!(70));

    let free = parts_service::add_quote(&state, request.id, quote(new_parts, Decimal::ZERO, "1h")).await;
    assert!(matches!(free, Err(AppError::BadRequest(_))));

    let missing = parts_service::add_quote(&state, i32::MAX, quote(new_parts, dec!(10), "1h")).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn customers_and_vehicles_guard_their_dependents() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let shop = common::workshop(&state).await?;

    let customer = customer_service::get_customer(&state, shop.customer_id)
        .await?
        .data
        .expect("customer");
    assert_eq!(customer.customer.vehicles_count, 1);
    let plate = &customer.vehicles[0].plate;
    assert_eq!(plate, &plate.to_uppercase());

    let duplicate = customer_service::create_customer(
        &state,
        CreateCustomerRequest {
            full_name: "Otro".into(),
            national_id: customer.customer.national_id.clone(),
            phone: "600000002".into(),
            email: "otro@example.com".into(),
            address: "Calle 2".into(),
            contact_person: "Otro".into(),
        },
    )
    .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Active vehicle blocks the customer.
    let refused = customer_service::deactivate_customer(&state, shop.customer_id).await;
    assert!(matches!(refused, Err(AppError::Conflict(_))));

    // Open diagnosis blocks the vehicle.
    let diagnosis_id = common::diagnosis(&state, &shop, "Vibración en el volante").await?;
    let refused = vehicle_service::deactivate_vehicle(&state, shop.vehicle_id).await;
    assert!(matches!(refused, Err(AppError::Conflict(_))));

    diagnosis_service::update_diagnosis(
        &state,
        diagnosis_id,
        UpdateDiagnosisRequest {
            status: Some(DiagnosisStatus::Completed),
            notes: Some("Equilibrado de ruedas".into()),
        },
    )
    .await?;

    vehicle_service::deactivate_vehicle(&state, shop.vehicle_id).await?;
    let vehicle = vehicle_service::get_vehicle(&state, shop.vehicle_id)
        .await?
        .data
        .expect("vehicle");
    assert_eq!(vehicle.vehicle.status, VehicleStatus::Inactive);
    assert_eq!(vehicle.diagnoses.len(), 1);
    assert_eq!(vehicle.diagnoses[0].status, DiagnosisStatus::Completed);

    customer_service::deactivate_customer(&state, shop.customer_id).await?;
    let customer = customer_service::get_customer(&state, shop.customer_id)
        .await?
        .data
        .expect("customer");
    assert!(!customer.customer.active);

    Ok(())
}

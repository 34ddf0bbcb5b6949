use garage_api::{
    billing::BillingRates,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        customers::CreateCustomerRequest, diagnoses::CreateDiagnosisRequest,
        technicians::CreateTechnicianRequest, vehicles::CreateVehicleRequest,
    },
    entity::enums::{DiagnosisStatus, Priority, VehicleStatus},
    services::{customer_service, diagnosis_service, technician_service, vehicle_service},
    state::AppState,
};
use rust_decimal::Decimal;
use uuid::Uuid;

pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests.");
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;
    Ok(AppState {
        pool,
        orm,
        billing: BillingRates::default(),
    })
}

/// Short unique suffix so runs against a shared database never collide.
pub fn tag() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}

pub struct Workshop {
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub technician_id: i32,
}

pub async fn workshop(state: &AppState) -> anyhow::Result<Workshop> {
    let tag = tag();

    let customer = customer_service::create_customer(
        state,
        CreateCustomerRequest {
            full_name: format!("Test Customer {tag}"),
            national_id: format!("T{tag}"),
            phone: "600000000".into(),
            email: format!("customer-{}@example.com", tag.to_lowercase()),
            address: "Calle Prueba 1".into(),
            contact_person: "Test".into(),
        },
    )
    .await?
    .data
    .expect("customer");

    let vehicle = vehicle_service::create_vehicle(
        state,
        CreateVehicleRequest {
            customer_id: customer.id,
            make: "Seat".into(),
            model: "Ibiza".into(),
            year: 2015,
            plate: format!("p{tag}"),
            vin: format!("VIN{tag}"),
            mileage: 120_000,
            status: VehicleStatus::Active,
        },
    )
    .await?
    .data
    .expect("vehicle");

    let technician = technician_service::create_technician(
        state,
        CreateTechnicianRequest {
            name: format!("Tech {tag}"),
            phone: "600000001".into(),
            email: format!("tech-{}@example.com", tag.to_lowercase()),
            specialties: vec!["Frenos".into()],
            hourly_rate: Decimal::from(30),
        },
    )
    .await?
    .data
    .expect("technician");

    Ok(Workshop {
        customer_id: customer.id,
        vehicle_id: vehicle.id,
        technician_id: technician.id,
    })
}

pub async fn diagnosis(state: &AppState, shop: &Workshop, fault: &str) -> anyhow::Result<i32> {
    let diagnosis = diagnosis_service::create_diagnosis(
        state,
        CreateDiagnosisRequest {
            vehicle_id: shop.vehicle_id,
            technician_id: shop.technician_id,
            fault_description: fault.into(),
            diagnosed_at: None,
            status: DiagnosisStatus::Pending,
            priority: Priority::Medium,
            estimated_time: Some("2-3h".into()),
            notes: None,
            estimated_cost: Decimal::from(150),
        },
    )
    .await?
    .data
    .expect("diagnosis");
    Ok(diagnosis.id)
}

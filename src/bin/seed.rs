//! Loads a small sample workshop. Does nothing when customers already exist.

use anyhow::Context;
use chrono::{DateTime, Duration, Timelike, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set, TransactionTrait,
};

use garage_api::{
    billing::{BillingRates, InvoiceDraft, LaborLine, PartCondition, PartLine, assign_invoice_number},
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    entity::{
        Customers, appointments, customers, diagnoses,
        enums::{
            AppointmentKind, AppointmentStatus, DiagnosisStatus, InvoiceStatus, PartRequestStatus,
            Priority, SupplierKind, VehicleStatus,
        },
        invoices, part_requests, parts, suppliers, technicians, vehicles,
    },
};

const TECHNICIANS: [(&str, &str, &str, [&str; 2], i64); 3] = [
    ("Carlos Rodríguez", "666123456", "carlos@taller.com", ["Motor", "Transmisión"], 35),
    ("Ana García", "666234567", "ana@taller.com", ["Frenos", "Suspensión"], 30),
    ("Miguel López", "666345678", "miguel@taller.com", ["Eléctrico", "Aire Acondicionado"], 32),
];

const SUPPLIERS: [(&str, &str, &str, SupplierKind, &str); 3] = [
    ("Repuestos Nuevos S.L.", "ventas@repuestosnuevos.com", "912345678", SupplierKind::New, "2-4h"),
    ("Desguace El Rayo", "info@desguaceelrayo.com", "913456789", SupplierKind::Used, "4-8h"),
    ("AutoPartes Premium", "pedidos@autopartespremium.com", "914567890", SupplierKind::New, "1-2h"),
];

const PARTS: [(&str, &str, i64); 8] = [
    ("Pastillas de freno delanteras", "Frenos", 45),
    ("Filtro de aceite", "Motor", 12),
    ("Amortiguador delantero", "Suspensión", 85),
    ("Batería 12V 60Ah", "Eléctrico", 120),
    ("Correa de distribución", "Motor", 35),
    ("Discos de freno", "Frenos", 65),
    ("Bujías", "Motor", 8),
    ("Filtro de aire", "Motor", 15),
];

const CUSTOMERS: [(&str, &str, &str, &str, &str, &str); 5] = [
    ("Juan Pérez García", "12345678A", "666111222", "juan.perez@email.com", "Calle Mayor, 123, Madrid", "Juan Pérez"),
    ("María González López", "23456789B", "666222333", "maria.gonzalez@email.com", "Avenida de la Paz, 45, Madrid", "María González"),
    ("Carlos Martín Ruiz", "34567890C", "666333444", "carlos.martin@email.com", "Plaza España, 12, Madrid", "Carlos Martín"),
    ("Ana Fernández Silva", "45678901D", "666444555", "ana.fernandez@email.com", "Calle Alcalá, 200, Madrid", "Ana Fernández"),
    ("Luis Sánchez Torres", "56789012E", "666555666", "luis.sanchez@email.com", "Gran Vía, 78, Madrid", "Luis Sánchez"),
];

const VEHICLES: [(&str, &str, i32, &str, &str, i32); 8] = [
    ("Toyota", "Corolla", 2018, "1234ABC", "JT123456789012345", 85000),
    ("Volkswagen", "Golf", 2019, "2345BCD", "WV234567890123456", 72000),
    ("Ford", "Focus", 2017, "3456CDE", "FD345678901234567", 95000),
    ("Seat", "León", 2020, "4567DEF", "ST456789012345678", 45000),
    ("Renault", "Clio", 2016, "5678EFG", "RN567890123456789", 110000),
    ("BMW", "Serie 3", 2019, "6789FGH", "BM678901234567890", 68000),
    ("Audi", "A4", 2018, "7890GHI", "AU789012345678901", 78000),
    ("Mercedes", "Clase C", 2020, "8901HIJ", "MB890123456789012", 35000),
];

const FAULTS: [&str; 10] = [
    "Ruido extraño en el motor al acelerar",
    "Frenos que chirrían al frenar",
    "Problema con el aire acondicionado",
    "Batería que se descarga rápidamente",
    "Vibración en el volante a alta velocidad",
    "Pérdida de potencia en subidas",
    "Luces que parpadean intermitentemente",
    "Problema con la transmisión automática",
    "Escape que hace ruido excesivo",
    "Sistema de dirección asistida con problemas",
];

const DIAGNOSIS_STATUSES: [DiagnosisStatus; 5] = [
    DiagnosisStatus::Pending,
    DiagnosisStatus::InProgress,
    DiagnosisStatus::Completed,
    DiagnosisStatus::Pending,
    DiagnosisStatus::InProgress,
];

const PRIORITIES: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];
const ESTIMATES: [&str; 4] = ["2-3h", "4-6h", "1 día", "2-3 días"];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    if Customers::find().count(&orm).await? > 0 {
        println!("Customers already present, skipping seed");
        return Ok(());
    }

    let now = Utc::now();
    let technician_ids = seed_technicians(&orm, now).await?;
    let supplier_ids = seed_suppliers(&orm, now).await?;
    let part_ids = seed_parts(&orm, &supplier_ids).await?;
    let customer_ids = seed_customers(&orm, now).await?;
    let vehicle_ids = seed_vehicles(&orm, &customer_ids, now).await?;
    let diagnoses = seed_diagnoses(&orm, &vehicle_ids, &technician_ids, now).await?;
    seed_part_requests(&orm, &diagnoses, &part_ids, now).await?;
    seed_appointments(&orm, &diagnoses, &technician_ids, now).await?;
    let invoices = seed_invoices(&orm, &diagnoses, &config.billing, now).await?;

    println!("Seed completed:");
    println!("- {} customers", customer_ids.len());
    println!("- {} vehicles", vehicle_ids.len());
    println!("- {} technicians", technician_ids.len());
    println!("- {} diagnoses", diagnoses.len());
    println!("- {} parts", part_ids.len());
    println!("- {} suppliers", supplier_ids.len());
    println!("- {invoices} invoices");
    Ok(())
}

async fn seed_technicians(orm: &DatabaseConnection, now: DateTime<Utc>) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::new();
    for (name, phone, email, specialties, rate) in TECHNICIANS {
        let technician = technicians::ActiveModel {
            id: NotSet,
            name: Set(name.into()),
            phone: Set(phone.into()),
            email: Set(email.into()),
            specialties: Set(serde_json::json!(specialties)),
            hourly_rate: Set(Decimal::from(rate)),
            active: Set(true),
            registered_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
        ids.push(technician.id);
    }
    Ok(ids)
}

async fn seed_suppliers(orm: &DatabaseConnection, now: DateTime<Utc>) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::new();
    for (name, email, phone, kind, response) in SUPPLIERS {
        let supplier = suppliers::ActiveModel {
            id: NotSet,
            name: Set(name.into()),
            email: Set(email.into()),
            phone: Set(Some(phone.into())),
            kind: Set(kind),
            active: Set(true),
            avg_response_time: Set(Some(response.into())),
            registered_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
        ids.push(supplier.id);
    }
    Ok(ids)
}

async fn seed_parts(orm: &DatabaseConnection, supplier_ids: &[i32]) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::new();
    for (i, (name, category, price)) in PARTS.into_iter().enumerate() {
        let part = parts::ActiveModel {
            id: NotSet,
            name: Set(name.into()),
            description: Set(None),
            category: Set(Some(category.into())),
            reference_price: Set(Some(Decimal::from(price))),
            preferred_supplier_id: Set(supplier_ids.get(i % supplier_ids.len()).copied()),
        }
        .insert(orm)
        .await?;
        ids.push(part.id);
    }
    Ok(ids)
}

async fn seed_customers(orm: &DatabaseConnection, now: DateTime<Utc>) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::new();
    for (full_name, national_id, phone, email, address, contact) in CUSTOMERS {
        let customer = customers::ActiveModel {
            id: NotSet,
            full_name: Set(full_name.into()),
            national_id: Set(national_id.into()),
            phone: Set(phone.into()),
            email: Set(email.into()),
            address: Set(address.into()),
            contact_person: Set(contact.into()),
            registered_at: Set(now.into()),
            active: Set(true),
        }
        .insert(orm)
        .await?;
        ids.push(customer.id);
    }
    Ok(ids)
}

async fn seed_vehicles(
    orm: &DatabaseConnection,
    customer_ids: &[i32],
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<i32>> {
    let mut ids = Vec::new();
    for (i, (make, model, year, plate, vin, mileage)) in VEHICLES.into_iter().enumerate() {
        let status = if i % 3 == 1 { VehicleStatus::InShop } else { VehicleStatus::Active };
        let vehicle = vehicles::ActiveModel {
            id: NotSet,
            customer_id: Set(customer_ids[i % customer_ids.len()]),
            make: Set(make.into()),
            model: Set(model.into()),
            year: Set(year),
            plate: Set(plate.into()),
            vin: Set(vin.into()),
            mileage: Set(mileage),
            registered_at: Set(now.into()),
            status: Set(status),
        }
        .insert(orm)
        .await?;
        ids.push(vehicle.id);
    }
    Ok(ids)
}

async fn seed_diagnoses(
    orm: &DatabaseConnection,
    vehicle_ids: &[i32],
    technician_ids: &[i32],
    now: DateTime<Utc>,
) -> anyhow::Result<Vec<diagnoses::Model>> {
    let mut rows = Vec::new();
    for i in 0..15_usize {
        let diagnosis = diagnoses::ActiveModel {
            id: NotSet,
            vehicle_id: Set(vehicle_ids[(i * 3) % vehicle_ids.len()]),
            technician_id: Set(technician_ids[i % technician_ids.len()]),
            fault_description: Set(FAULTS[i % FAULTS.len()].into()),
            diagnosed_at: Set((now - Duration::days((i * 2) as i64)).into()),
            status: Set(DIAGNOSIS_STATUSES[i % DIAGNOSIS_STATUSES.len()]),
            priority: Set(PRIORITIES[i % PRIORITIES.len()]),
            estimated_time: Set(Some(ESTIMATES[i % ESTIMATES.len()].into())),
            notes: Set(None),
            estimated_cost: Set(Decimal::from(150 + (i as i64 * 45) % 650)),
        }
        .insert(orm)
        .await?;
        rows.push(diagnosis);
    }
    Ok(rows)
}

async fn seed_part_requests(
    orm: &DatabaseConnection,
    diagnoses: &[diagnoses::Model],
    part_ids: &[i32],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    const STATUSES: [PartRequestStatus; 4] = [
        PartRequestStatus::Requested,
        PartRequestStatus::Quoted,
        PartRequestStatus::Ordered,
        PartRequestStatus::Received,
    ];
    for i in 0..8_usize {
        part_requests::ActiveModel {
            id: NotSet,
            diagnosis_id: Set(diagnoses[(i * 2) % diagnoses.len()].id),
            part_id: Set(part_ids[i % part_ids.len()]),
            quantity: Set((i % 3 + 1) as i32),
            status: Set(STATUSES[i % STATUSES.len()]),
            requested_at: Set((now - Duration::days(i as i64)).into()),
            best_offer_price: Set(None),
            selected_supplier_id: Set(None),
            delivery_time: Set(None),
        }
        .insert(orm)
        .await?;
    }
    Ok(())
}

async fn seed_appointments(
    orm: &DatabaseConnection,
    diagnoses: &[diagnoses::Model],
    technician_ids: &[i32],
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    const DURATIONS: [i32; 5] = [120, 180, 240, 360, 480];
    const STATUSES: [AppointmentStatus; 3] = [
        AppointmentStatus::Scheduled,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ];
    const KINDS: [AppointmentKind; 3] = [
        AppointmentKind::Repair,
        AppointmentKind::Maintenance,
        AppointmentKind::Diagnosis,
    ];

    for i in 0..10_usize {
        let day = now + Duration::days(i as i64 * 2 - 5);
        let scheduled_at = day
            .with_hour(8 + (i as u32 % 10))
            .and_then(|at| at.with_minute(0))
            .and_then(|at| at.with_second(0))
            .and_then(|at| at.with_nanosecond(0))
            .context("building appointment slot")?;

        appointments::ActiveModel {
            id: NotSet,
            diagnosis_id: Set(diagnoses[i % diagnoses.len()].id),
            technician_id: Set(technician_ids[i % technician_ids.len()]),
            scheduled_at: Set(scheduled_at.into()),
            estimated_duration: Set(DURATIONS[i % DURATIONS.len()]),
            status: Set(STATUSES[i % STATUSES.len()]),
            kind: Set(KINDS[i % KINDS.len()]),
            notes: Set(None),
            created_at: Set(now.into()),
        }
        .insert(orm)
        .await?;
    }
    Ok(())
}

/// One invoice per completed diagnosis, priced and numbered like any other.
async fn seed_invoices(
    orm: &DatabaseConnection,
    diagnoses: &[diagnoses::Model],
    rates: &BillingRates,
    now: DateTime<Utc>,
) -> anyhow::Result<usize> {
    const STATUSES: [InvoiceStatus; 3] = [InvoiceStatus::Draft, InvoiceStatus::Sent, InvoiceStatus::Paid];

    let completed = diagnoses
        .iter()
        .filter(|d| d.status == DiagnosisStatus::Completed);

    let mut count = 0;
    for (i, diagnosis) in completed.enumerate() {
        let parts = vec![
            PartLine::new("Filtro de aceite", Decimal::from(12 + i as i64 * 10), PartCondition::New),
            PartLine::new("Discos de freno", Decimal::from(40 + i as i64 * 5), PartCondition::Used),
        ];
        let labor = vec![LaborLine::new(
            diagnosis.fault_description.clone(),
            Decimal::from(90 + i as i64 * 35),
        )];

        let mut draft = InvoiceDraft::new(now - Duration::days(i as i64 * 9), parts, labor);
        draft.compute_totals(rates);

        let txn = orm.begin().await?;
        assign_invoice_number(&txn, &mut draft)
            .await
            .context("numbering invoice")?;
        invoices::ActiveModel {
            id: NotSet,
            invoice_number: Set(draft.invoice_number.clone().context("invoice left unnumbered")?),
            diagnosis_id: Set(diagnosis.id),
            issue_date: Set(draft.issue_date.into()),
            due_date: Set(draft.due_date.map(Into::into)),
            status: Set(STATUSES[i % STATUSES.len()]),
            parts_subtotal: Set(draft.totals.parts_subtotal),
            parts_markup: Set(draft.totals.parts_markup),
            labor_subtotal: Set(draft.totals.labor_subtotal),
            tax: Set(draft.totals.tax),
            total: Set(draft.totals.total),
            parts_detail: Set(Some(serde_json::to_value(&draft.parts)?)),
            labor_detail: Set(Some(serde_json::to_value(&draft.labor)?)),
            pdf_path: Set(None),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;
        count += 1;
    }
    Ok(count)
}

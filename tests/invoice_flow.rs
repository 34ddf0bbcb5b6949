mod common;

use chrono::Utc;
use garage_api::{
    billing::{
        InvoiceDraft, LaborLine, PartCondition, PartLine, assign_invoice_number,
        parse_invoice_number,
    },
    dto::invoices::{CreateInvoiceRequest, UpdateInvoiceDetailRequest, UpdateInvoiceStatusRequest},
    entity::{enums::InvoiceStatus, invoices},
    error::AppError,
    routes::params::{Pagination, StatusQuery},
    services::invoice_service,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseTransaction, Set, Statement, TransactionTrait,
};

fn invoice_request(diagnosis_id: i32) -> CreateInvoiceRequest {
    CreateInvoiceRequest {
        diagnosis_id,
        parts_detail: vec![
            PartLine::new("Pastillas de freno", dec!(100), PartCondition::New),
            PartLine::new("Disco usado", dec!(50), PartCondition::Used),
        ],
        labor_detail: vec![LaborLine::new("Cambio de frenos", dec!(200))],
        due_date: None,
        status: InvoiceStatus::Draft,
        pdf_path: None,
    }
}

// Diagnosis -> invoice -> second invoice -> duplicate refused -> status and detail edits.
#[tokio::test]
async fn invoice_lifecycle() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let shop = common::workshop(&state).await?;

    let first_diagnosis = common::diagnosis(&state, &shop, "Frenos que chirrían").await?;
    let second_diagnosis = common::diagnosis(&state, &shop, "Ruido en el motor").await?;

    let first = invoice_service::create_invoice(&state, invoice_request(first_diagnosis))
        .await?
        .data
        .expect("invoice");
    assert_eq!(first.parts_subtotal, dec!(150));
    assert_eq!(first.parts_markup, dec!(35));
    assert_eq!(first.labor_subtotal, dec!(200));
    assert_eq!(first.tax, dec!(80.85));
    assert_eq!(first.total, dec!(465.85));
    assert_eq!(first.parts_detail[0].final_price, Some(dec!(120)));
    assert_eq!(first.parts_detail[1].final_price, Some(dec!(65)));
    assert_eq!(
        first.due_date.map(|due| (due - first.issue_date).num_days()),
        Some(30)
    );
    let customer = first.customer.as_ref().expect("customer contact");
    assert!(customer.full_name.starts_with("Test Customer"));

    let second = invoice_service::create_invoice(&state, invoice_request(second_diagnosis))
        .await?
        .data
        .expect("invoice");
    let first_number = parse_invoice_number(&first.invoice_number).expect("FT number");
    let second_number = parse_invoice_number(&second.invoice_number).expect("FT number");
    assert!(second_number > first_number);
    assert!(first.invoice_number.starts_with("FT"));

    let duplicate = invoice_service::create_invoice(&state, invoice_request(first_diagnosis)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let sent = invoice_service::update_invoice_status(
        &state,
        first.id,
        UpdateInvoiceStatusRequest {
            status: InvoiceStatus::Sent,
        },
    )
    .await?
    .data
    .expect("invoice");
    assert_eq!(sent.status, InvoiceStatus::Sent);

    let edited = invoice_service::update_invoice_detail(
        &state,
        first.id,
        UpdateInvoiceDetailRequest {
            parts_detail: vec![],
            labor_detail: vec![LaborLine::new("Revisión", dec!(100))],
        },
    )
    .await?
    .data
    .expect("invoice");
    assert_eq!(edited.invoice_number, first.invoice_number);
    assert_eq!(edited.issue_date, first.issue_date);
    assert_eq!(edited.total, dec!(121));
    assert_eq!(edited.status, InvoiceStatus::Sent);

    let listed = invoice_service::list_invoices(
        &state,
        Pagination::default(),
        StatusQuery {
            status: Some("sent".into()),
        },
    )
    .await?
    .data
    .expect("invoices");
    assert!(listed.items.iter().all(|i| i.status == InvoiceStatus::Sent));

    Ok(())
}

#[tokio::test]
async fn invoice_for_unknown_diagnosis_is_not_found() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let result = invoice_service::create_invoice(&state, invoice_request(i32::MAX)).await;
    assert!(matches!(result, Err(AppError::NotFound("Diagnosis"))));
    Ok(())
}

#[tokio::test]
async fn negative_prices_are_rejected_before_touching_the_database() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let mut request = invoice_request(i32::MAX);
    request.parts_detail[0].base_price = dec!(-1);
    let result = invoice_service::create_invoice(&state, request).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));
    Ok(())
}

async fn store_numbered(
    txn: &DatabaseTransaction,
    diagnosis_id: i32,
    invoice_number: String,
) -> anyhow::Result<invoices::Model> {
    let invoice = invoices::ActiveModel {
        id: NotSet,
        invoice_number: Set(invoice_number),
        diagnosis_id: Set(diagnosis_id),
        issue_date: Set(Utc::now().into()),
        due_date: Set(None),
        status: Set(InvoiceStatus::Draft),
        parts_subtotal: Set(Decimal::ZERO),
        parts_markup: Set(Decimal::ZERO),
        labor_subtotal: Set(Decimal::ZERO),
        tax: Set(Decimal::ZERO),
        total: Set(Decimal::ZERO),
        parts_detail: Set(None),
        labor_detail: Set(None),
        pdf_path: Set(None),
    }
    .insert(txn)
    .await?;
    Ok(invoice)
}

async fn next_number(txn: &DatabaseTransaction, diagnosis_id: i32) -> anyhow::Result<String> {
    let mut draft = InvoiceDraft::new(Utc::now(), Vec::new(), Vec::new());
    assign_invoice_number(txn, &mut draft).await?;
    let number = draft.invoice_number.expect("assigned number");
    store_numbered(txn, diagnosis_id, number.clone()).await?;
    Ok(number)
}

// An unseeded counter starts from the newest invoice; an unparsable number
// there restarts the sequence. Runs in a transaction that is rolled back.
#[tokio::test]
async fn unseeded_counter_restarts_after_unparsable_number() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;
    let shop = common::workshop(&state).await?;
    let legacy = common::diagnosis(&state, &shop, "Factura antigua").await?;
    let first = common::diagnosis(&state, &shop, "Cambio de aceite").await?;
    let second = common::diagnosis(&state, &shop, "Cambio de correa").await?;

    let txn = state.orm.begin().await?;
    let backend = txn.get_database_backend();

    // Taking the counter row first keeps concurrent creators out until rollback.
    txn.execute(Statement::from_string(
        backend,
        "UPDATE invoice_counters SET last_value = NULL WHERE name = 'invoice'".to_owned(),
    ))
    .await?;
    txn.execute(Statement::from_string(backend, "DELETE FROM invoices".to_owned()))
        .await?;

    assert_eq!(next_number(&txn, legacy).await?, "FT001");

    txn.execute(Statement::from_string(
        backend,
        "UPDATE invoice_counters SET last_value = NULL WHERE name = 'invoice'".to_owned(),
    ))
    .await?;
    txn.execute(Statement::from_string(backend, "DELETE FROM invoices".to_owned()))
        .await?;
    store_numbered(&txn, legacy, "INVALID".into()).await?;

    assert_eq!(next_number(&txn, first).await?, "FT001");
    assert_eq!(next_number(&txn, second).await?, "FT002");

    txn.rollback().await?;
    Ok(())
}

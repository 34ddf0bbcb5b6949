use anyhow::anyhow;
use sea_orm::sea_query::LockType;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, QueryOrder, QuerySelect, Set};

use super::calculator::InvoiceDraft;
use crate::{
    entity::{
        invoice_counters::{ActiveModel as CounterActive, Entity as InvoiceCounters},
        invoices::{Column as InvoiceCol, Entity as Invoices},
    },
    error::{AppError, AppResult},
};

pub const INVOICE_PREFIX: &str = "FT";

/// Counter row that backs invoice numbering.
pub const INVOICE_COUNTER: &str = "invoice";

/// `FT` followed by the number, zero-padded to at least three digits.
pub fn format_invoice_number(number: u64) -> String {
    format!("{INVOICE_PREFIX}{number:03}")
}

pub fn parse_invoice_number(value: &str) -> Option<u64> {
    value.trim().strip_prefix(INVOICE_PREFIX)?.parse().ok()
}

/// Numeric part of the last assigned number, or 0 when there is none or it
/// does not follow the `FT<digits>` format.
pub fn last_assigned(previous: Option<&str>) -> u64 {
    previous.and_then(parse_invoice_number).unwrap_or(0)
}

pub fn next_after(previous: Option<&str>) -> u64 {
    last_assigned(previous).saturating_add(1)
}

/// Gives the draft the next invoice number unless it already has one.
///
/// Must run inside the transaction that inserts the invoice: the counter row
/// stays locked until that transaction ends, so concurrent creations queue
/// up instead of reading the same value.
pub async fn assign_invoice_number<C>(conn: &C, draft: &mut InvoiceDraft) -> AppResult<()>
where
    C: ConnectionTrait,
{
    if draft.invoice_number.is_some() {
        return Ok(());
    }

    let number = reserve_next(conn).await?;
    draft.invoice_number = Some(format_invoice_number(number));
    Ok(())
}

async fn reserve_next<C>(conn: &C) -> AppResult<u64>
where
    C: ConnectionTrait,
{
    let counter = InvoiceCounters::find_by_id(INVOICE_COUNTER.to_string())
        .lock(LockType::Update)
        .one(conn)
        .await?;

    let last = match counter.as_ref().and_then(|c| c.last_value) {
        Some(value) => stored_last(value)?,
        None => seed_from_latest_invoice(conn).await?,
    };
    let next = last.saturating_add(1);
    let stored = i64::try_from(next)
        .map_err(|_| AppError::Internal(anyhow!("invoice counter overflow at {next}")))?;

    match counter {
        Some(model) => {
            let mut active: CounterActive = model.into();
            active.last_value = Set(Some(stored));
            active.update(conn).await?;
        }
        None => {
            tracing::warn!("invoice counter row missing, recreating it");
            CounterActive {
                name: Set(INVOICE_COUNTER.to_string()),
                last_value: Set(Some(stored)),
            }
            .insert(conn)
            .await?;
        }
    }

    tracing::debug!(next, "reserved invoice number");
    Ok(next)
}

/// A negative stored value means the row was edited by hand; numbering stops
/// rather than restarting over numbers already issued.
fn stored_last(value: i64) -> AppResult<u64> {
    u64::try_from(value)
        .map_err(|_| AppError::Internal(anyhow!("invoice counter holds negative value {value}")))
}

/// The counter starts from whatever the newest invoice (highest id) carries.
async fn seed_from_latest_invoice<C>(conn: &C) -> AppResult<u64>
where
    C: ConnectionTrait,
{
    let latest = Invoices::find()
        .order_by_desc(InvoiceCol::Id)
        .one(conn)
        .await?;
    let previous = latest.as_ref().map(|invoice| invoice.invoice_number.as_str());
    let last = last_assigned(previous);

    tracing::info!(?previous, last, "seeding invoice counter");
    Ok(last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn formats_with_three_digit_padding() {
        assert_eq!(format_invoice_number(1), "FT001");
        assert_eq!(format_invoice_number(42), "FT042");
        assert_eq!(format_invoice_number(999), "FT999");
        assert_eq!(format_invoice_number(1000), "FT1000");
    }

    #[test]
    fn parses_prefixed_numbers() {
        assert_eq!(parse_invoice_number("FT001"), Some(1));
        assert_eq!(parse_invoice_number("FT1234"), Some(1234));
        assert_eq!(parse_invoice_number("INVALID"), None);
        assert_eq!(parse_invoice_number("FT"), None);
        assert_eq!(parse_invoice_number("FTabc"), None);
    }

    #[test]
    fn first_invoice_is_ft001() {
        assert_eq!(format_invoice_number(next_after(None)), "FT001");
    }

    #[test]
    fn unparsable_previous_restarts_at_one() {
        assert_eq!(format_invoice_number(next_after(Some("INVALID"))), "FT001");
    }

    #[test]
    fn sequence_is_monotonic() {
        let mut previous: Option<String> = None;
        let mut issued = Vec::new();
        for _ in 0..5 {
            let number = format_invoice_number(next_after(previous.as_deref()));
            issued.push(number.clone());
            previous = Some(number);
        }
        assert_eq!(issued, ["FT001", "FT002", "FT003", "FT004", "FT005"]);
    }

    #[test]
    fn negative_counter_is_an_error() {
        assert_eq!(stored_last(0).unwrap(), 0);
        assert_eq!(stored_last(41).unwrap(), 41);
        assert!(matches!(stored_last(-3), Err(AppError::Internal(_))));
    }

    #[tokio::test]
    async fn numbered_draft_is_left_alone() {
        // Returns before touching the connection, so a disconnected one is enough.
        let conn = sea_orm::DatabaseConnection::Disconnected;
        let mut draft = InvoiceDraft::new(Utc::now(), Vec::new(), Vec::new());
        draft.invoice_number = Some("FT007".into());

        assign_invoice_number(&conn, &mut draft).await.unwrap();
        assign_invoice_number(&conn, &mut draft).await.unwrap();

        assert_eq!(draft.invoice_number.as_deref(), Some("FT007"));
    }
}

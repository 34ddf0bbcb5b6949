use sea_orm::ActiveEnum;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

pub const DEFAULT_PER_PAGE: i64 = 50;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Default, Clone, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, default 1.
    pub page: Option<i64>,
    /// Items per page, default 50, at most 100.
    pub per_page: Option<i64>,
}

impl Pagination {
    /// `(page, per_page, offset)`. A page whose offset does not fit is a bad request.
    pub fn normalize(&self) -> AppResult<(i64, i64, i64)> {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);
        let offset = (page - 1)
            .checked_mul(per_page)
            .ok_or_else(|| AppError::BadRequest(format!("page {page} is out of range")))?;
        Ok((page, per_page, offset))
    }
}

/// Parses a `status` query value into one of the stored status enums.
///
/// Empty and `all` mean no filter.
pub fn status_filter<T>(raw: Option<&str>) -> AppResult<Option<T>>
where
    T: ActiveEnum<Value = String>,
{
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if raw.eq_ignore_ascii_case("all") {
        return Ok(None);
    }
    T::try_from_value(&raw.to_ascii_lowercase())
        .map(Some)
        .map_err(|_| AppError::BadRequest(format!("unknown status '{raw}'")))
}

/// Non-empty, trimmed search term as a `LIKE` pattern. Wildcards typed by
/// the user are escaped and match literally.
pub fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(|s| {
        let mut pattern = String::with_capacity(s.len() + 2);
        pattern.push('%');
        for c in s.chars() {
            if matches!(c, '%' | '_' | '\\') {
                pattern.push('\\');
            }
            pattern.push(c);
        }
        pattern.push('%');
        pattern
    })
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Matches name, national id, phone or email.
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VehicleQuery {
    /// Matches plate, make, model or VIN.
    pub search: Option<String>,
    pub customer_id: Option<i32>,
    /// `active`, `in_shop`, `inactive` or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DiagnosisQuery {
    /// Matches the fault description or the vehicle plate.
    pub search: Option<String>,
    /// `pending`, `in_progress`, `completed`, `cancelled` or `all`.
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentQuery {
    pub status: Option<String>,
    pub technician_id: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::enums::{DiagnosisStatus, InvoiceStatus};

    #[test]
    fn pagination_defaults_and_clamps() {
        assert_eq!(Pagination::default().normalize().unwrap(), (1, 50, 0));

        let p = Pagination { page: Some(3), per_page: Some(10) };
        assert_eq!(p.normalize().unwrap(), (3, 10, 20));

        let p = Pagination { page: Some(0), per_page: Some(500) };
        assert_eq!(p.normalize().unwrap(), (1, 100, 0));

        let p = Pagination { page: Some(-4), per_page: Some(0) };
        assert_eq!(p.normalize().unwrap(), (1, 1, 0));
    }

    #[test]
    fn huge_page_is_rejected_instead_of_overflowing() {
        let p = Pagination { page: Some(i64::MAX), per_page: Some(100) };
        assert!(matches!(p.normalize(), Err(AppError::BadRequest(_))));

        let p = Pagination { page: Some(i64::MAX), per_page: Some(1) };
        assert_eq!(p.normalize().unwrap(), (i64::MAX, 1, i64::MAX - 1));
    }

    #[test]
    fn all_and_blank_status_mean_no_filter() {
        assert_eq!(status_filter::<DiagnosisStatus>(None).unwrap(), None);
        assert_eq!(status_filter::<DiagnosisStatus>(Some("all")).unwrap(), None);
        assert_eq!(status_filter::<DiagnosisStatus>(Some("  ")).unwrap(), None);
    }

    #[test]
    fn parses_known_status() {
        assert_eq!(
            status_filter::<DiagnosisStatus>(Some("in_progress")).unwrap(),
            Some(DiagnosisStatus::InProgress)
        );
        assert_eq!(
            status_filter::<InvoiceStatus>(Some("PAID")).unwrap(),
            Some(InvoiceStatus::Paid)
        );
    }

    #[test]
    fn unknown_status_is_rejected() {
        let err = status_filter::<InvoiceStatus>(Some("refunded")).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn search_term_wraps_in_wildcards() {
        assert_eq!(search_term(Some(" golf ")).as_deref(), Some("%golf%"));
        assert_eq!(search_term(Some("")), None);
        assert_eq!(search_term(None), None);
    }

    #[test]
    fn search_term_escapes_like_wildcards() {
        assert_eq!(search_term(Some("_")).as_deref(), Some("%\\_%"));
        assert_eq!(search_term(Some("50%")).as_deref(), Some("%50\\%%"));
        assert_eq!(search_term(Some(r"a\b")).as_deref(), Some(r"%a\\b%"));
    }
}

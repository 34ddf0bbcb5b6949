use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::line_items::{LaborLine, PartCondition, PartLine};

/// Days between issue and due date when no due date is given.
pub const PAYMENT_TERM_DAYS: i64 = 30;

/// Markup and tax percentages applied when totalling an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BillingRates {
    pub new_parts_markup: Decimal,
    pub used_parts_markup: Decimal,
    pub tax_percent: Decimal,
}

impl Default for BillingRates {
    fn default() -> Self {
        Self {
            new_parts_markup: Decimal::from(20),
            used_parts_markup: Decimal::from(30),
            tax_percent: Decimal::from(21),
        }
    }
}

impl BillingRates {
    pub fn markup_for(&self, condition: PartCondition) -> Decimal {
        match condition {
            PartCondition::Used => self.used_parts_markup,
            PartCondition::New => self.new_parts_markup,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InvoiceTotals {
    pub parts_subtotal: Decimal,
    pub parts_markup: Decimal,
    pub labor_subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl InvoiceTotals {
    pub fn pre_tax(&self) -> Decimal {
        self.parts_subtotal + self.parts_markup + self.labor_subtotal
    }
}

/// The billable part of an invoice, detached from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub invoice_number: Option<String>,
    pub issue_date: DateTime<Utc>,
    pub due_date: Option<DateTime<Utc>>,
    pub parts: Vec<PartLine>,
    pub labor: Vec<LaborLine>,
    pub totals: InvoiceTotals,
}

impl InvoiceDraft {
    pub fn new(issue_date: DateTime<Utc>, parts: Vec<PartLine>, labor: Vec<LaborLine>) -> Self {
        Self {
            invoice_number: None,
            issue_date,
            due_date: None,
            parts,
            labor,
            totals: InvoiceTotals::default(),
        }
    }

    /// Prices every part with its markup, then overwrites the totals.
    ///
    /// Each part line gains `markup` (the percentage used) and
    /// `final_price`. Tax is charged on parts, markup and labor together.
    /// A missing due date becomes `issue_date + PAYMENT_TERM_DAYS`.
    pub fn compute_totals(&mut self, rates: &BillingRates) {
        let mut parts_subtotal = Decimal::ZERO;
        let mut parts_markup = Decimal::ZERO;

        for part in &mut self.parts {
            let percent = rates.markup_for(part.condition);
            let markup_amount = part.base_price * percent / Decimal::ONE_HUNDRED;

            part.markup = Some(percent);
            part.final_price = Some(part.base_price + markup_amount);

            parts_subtotal += part.base_price;
            parts_markup += markup_amount;
        }

        let labor_subtotal: Decimal = self.labor.iter().map(|line| line.total).sum();

        let pre_tax = parts_subtotal + parts_markup + labor_subtotal;
        let tax = pre_tax * rates.tax_percent / Decimal::ONE_HUNDRED;

        self.totals = InvoiceTotals {
            parts_subtotal,
            parts_markup,
            labor_subtotal,
            tax,
            total: pre_tax + tax,
        };

        if self.due_date.is_none() {
            self.due_date = Some(self.issue_date + Duration::days(PAYMENT_TERM_DAYS));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn issue_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
    }

    #[test]
    fn mixed_parts_and_labor() {
        let mut draft = InvoiceDraft::new(
            issue_date(),
            vec![
                PartLine::new("Brake pads", dec!(100), PartCondition::New),
                PartLine::new("Alternator", dec!(50), PartCondition::Used),
            ],
            vec![LaborLine::new("Fitting", dec!(200))],
        );

        draft.compute_totals(&BillingRates::default());

        assert_eq!(draft.totals.parts_subtotal, dec!(150));
        assert_eq!(draft.totals.parts_markup, dec!(35));
        assert_eq!(draft.totals.labor_subtotal, dec!(200));
        assert_eq!(draft.totals.pre_tax(), dec!(385));
        assert_eq!(draft.totals.tax, dec!(80.85));
        assert_eq!(draft.totals.total, dec!(465.85));

        assert_eq!(draft.parts[0].markup, Some(dec!(20)));
        assert_eq!(draft.parts[0].final_price, Some(dec!(120)));
        assert_eq!(draft.parts[1].markup, Some(dec!(30)));
        assert_eq!(draft.parts[1].final_price, Some(dec!(65)));
    }

    #[test]
    fn empty_detail_yields_zero_and_default_due_date() {
        let mut draft = InvoiceDraft::new(issue_date(), Vec::new(), Vec::new());
        draft.compute_totals(&BillingRates::default());

        assert_eq!(draft.totals, InvoiceTotals::default());
        assert_eq!(draft.due_date, Some(issue_date() + Duration::days(30)));
    }

    #[test]
    fn explicit_due_date_is_kept() {
        let due = issue_date() + Duration::days(7);
        let mut draft = InvoiceDraft::new(issue_date(), Vec::new(), Vec::new());
        draft.due_date = Some(due);
        draft.compute_totals(&BillingRates::default());
        assert_eq!(draft.due_date, Some(due));
    }

    #[test]
    fn recomputing_overwrites_previous_enrichment() {
        let mut draft = InvoiceDraft::new(
            issue_date(),
            vec![PartLine::new("Filter", dec!(10), PartCondition::New)],
            Vec::new(),
        );
        draft.compute_totals(&BillingRates::default());

        let rates = BillingRates {
            new_parts_markup: dec!(50),
            ..BillingRates::default()
        };
        draft.compute_totals(&rates);

        assert_eq!(draft.parts[0].markup, Some(dec!(50)));
        assert_eq!(draft.parts[0].final_price, Some(dec!(15)));
        assert_eq!(draft.totals.parts_markup, dec!(5));
    }

    fn part_strategy() -> impl Strategy<Value = PartLine> {
        (0i64..1_000_000, any::<bool>()).prop_map(|(cents, used)| {
            let condition = if used { PartCondition::Used } else { PartCondition::New };
            PartLine::new("part", Decimal::new(cents, 2), condition)
        })
    }

    fn labor_strategy() -> impl Strategy<Value = LaborLine> {
        (0i64..1_000_000).prop_map(|cents| LaborLine::new("labor", Decimal::new(cents, 2)))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        #[test]
        fn totals_are_consistent(
            parts in prop::collection::vec(part_strategy(), 0..12),
            labor in prop::collection::vec(labor_strategy(), 0..6),
        ) {
            let mut draft = InvoiceDraft::new(issue_date(), parts, labor);
            draft.compute_totals(&BillingRates::default());
            let t = draft.totals;

            prop_assert_eq!(t.total, t.parts_subtotal + t.parts_markup + t.labor_subtotal + t.tax);
            prop_assert_eq!(t.tax, t.pre_tax() * dec!(0.21));

            for part in &draft.parts {
                let expected = if part.condition == PartCondition::Used { dec!(30) } else { dec!(20) };
                prop_assert_eq!(part.markup, Some(expected));
                prop_assert_eq!(
                    part.final_price,
                    Some(part.base_price * (Decimal::ONE + expected / Decimal::ONE_HUNDRED))
                );
            }
        }
    }
}

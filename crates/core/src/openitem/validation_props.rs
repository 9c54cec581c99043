//! Property-based tests for pre-save validation.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use arvo_shared::types::Currency;

use super::types::{DocumentType, Field, OpenItemDraft};
use super::validation::{validate_new_draft, ValidationErrorKind};

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn nonzero_amount_strategy() -> impl Strategy<Value = Decimal> {
    amount_strategy().prop_filter("amount must be non-zero", |d| !d.is_zero())
}

fn tax_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn base_draft() -> OpenItemDraft {
    let mut draft = OpenItemDraft::new(DocumentType::CreditMemo, Currency::Usd);
    draft.doc_number = "CM-0001".into();
    draft.doc_date = NaiveDate::from_ymd_opt(2024, 1, 1);
    draft.due_date = NaiveDate::from_ymd_opt(2024, 1, 31);
    draft
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// A draft whose tax fits inside |amount| always passes the tax rule.
    #[test]
    fn prop_tax_within_amount_accepted(amount in nonzero_amount_strategy()) {
        let mut draft = base_draft();
        draft.amount = amount;
        draft.tax_total = amount.abs();
        prop_assert!(validate_new_draft(&draft).is_ok());
    }

    /// A tax total strictly above |amount| is always rejected, and the
    /// rejection names the tax field.
    #[test]
    fn prop_tax_above_amount_rejected(
        amount in nonzero_amount_strategy(),
        excess in 1i64..100_000i64,
    ) {
        let mut draft = base_draft();
        draft.amount = amount;
        draft.tax_total = amount.abs() + Decimal::new(excess, 2);
        let err = validate_new_draft(&draft).unwrap_err();
        prop_assert_eq!(err.field, Field::TaxTotal);
        let kind_matches = matches!(err.kind, ValidationErrorKind::TaxExceedsAmount { .. });
        prop_assert!(kind_matches);
    }

    /// Zero amounts are rejected regardless of tax.
    #[test]
    fn prop_zero_amount_rejected(tax in tax_strategy()) {
        let mut draft = base_draft();
        draft.amount = Decimal::ZERO;
        draft.tax_total = tax;
        let err = validate_new_draft(&draft).unwrap_err();
        prop_assert_eq!(err.field, Field::Amount);
    }

    /// Missing dates dominate every later rule.
    #[test]
    fn prop_missing_doc_date_reported_first(
        amount in amount_strategy(),
        tax in tax_strategy(),
    ) {
        let mut draft = base_draft();
        draft.doc_date = None;
        draft.amount = amount;
        draft.tax_total = tax;
        let err = validate_new_draft(&draft).unwrap_err();
        prop_assert_eq!(err.field, Field::DocumentDate);
    }
}

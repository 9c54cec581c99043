//! Pure posting rules for open item entry sessions.
//!
//! This service contains the mode and draft rules the posting workflow
//! enforces before touching persistence. It has no database dependencies.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use arvo_shared::types::{Currency, OpenItemId, TaxTypeId};

use super::error::OpenItemError;
use super::types::{EntryMode, Field, OpenItemDraft};
use super::validation::validate_new_draft;

/// Order linkage kinds the tax sub-dialog understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxOrderKind {
    /// Accounts-receivable open item.
    Receivable,
}

impl TaxOrderKind {
    /// Wire code for the linkage kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Receivable => "AR",
        }
    }
}

/// Display modes the tax sub-dialog understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxDisplayType {
    /// Manual tax adjustment entry.
    Adjustment,
}

/// Context handed to the external tax sub-dialog.
///
/// The dialog persists tax lines itself and returns nothing; callers re-sum
/// the lines afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxDetailContext {
    /// Currency the tax amounts are entered in.
    pub currency: Currency,
    /// Effective date for rate lookups.
    pub effective_date: NaiveDate,
    /// Adjustment taxpayer type, when configured.
    pub tax_type_id: Option<TaxTypeId>,
    /// Kind of document the lines attach to.
    pub order_kind: TaxOrderKind,
    /// The document the lines attach to.
    pub order_id: OpenItemId,
    /// Display mode for the dialog.
    pub display_type: TaxDisplayType,
    /// Document subtotal the tax is computed against.
    pub subtotal: Decimal,
    /// True outside New mode; the dialog must not modify lines.
    pub read_only: bool,
}

/// Pure rules for open item entry sessions.
pub struct OpenItemService;

impl OpenItemService {
    /// Rejects edits to fields the mode keeps read-only.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode does not allow the field.
    pub fn ensure_editable(mode: EntryMode, field: Field) -> Result<(), OpenItemError> {
        if mode.can_edit(field) {
            Ok(())
        } else {
            Err(OpenItemError::FieldReadOnly(field, mode))
        }
    }

    /// Validates a session ahead of a save.
    ///
    /// View mode cannot save. New mode must carry a creatable memo type and
    /// pass the ordered pre-save validation. Edit mode performs no header
    /// validation here; the caller owns the rebalance confirmation.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule.
    pub fn validate_for_posting(mode: EntryMode, draft: &OpenItemDraft) -> Result<(), OpenItemError> {
        match mode {
            EntryMode::View => Err(OpenItemError::ReadOnlyMode),
            EntryMode::New => {
                if draft.doc_type.memo_kind().is_none() {
                    return Err(OpenItemError::NotCreatable(draft.doc_type));
                }
                validate_new_draft(draft)?;
                Ok(())
            }
            EntryMode::Edit => Ok(()),
        }
    }

    /// True when saving the new amount requires the out-of-balance warning.
    ///
    /// Changing the open amount of a posted document leaves the subsidiary
    /// ledger out of balance until a manual G/L distribution is entered, so
    /// the caller must confirm before the update is issued.
    #[must_use]
    pub fn requires_rebalance_confirmation(original: Decimal, current: Decimal) -> bool {
        original != current
    }

    /// True when the due date should be derived from terms and document date.
    ///
    /// The due date is only filled in when terms and document date are both
    /// known and the user has not entered one already.
    #[must_use]
    pub fn should_populate_due_date(draft: &OpenItemDraft) -> bool {
        draft.terms_id.is_some() && draft.doc_date.is_some() && draft.due_date.is_none()
    }

    /// Builds the tax sub-dialog context for a session.
    ///
    /// # Errors
    ///
    /// Returns `TaxDetailNeedsDates` when the document or due date is missing.
    pub fn tax_detail_context(
        draft: &OpenItemDraft,
        open_item_id: OpenItemId,
        tax_type_id: Option<TaxTypeId>,
        mode: EntryMode,
    ) -> Result<TaxDetailContext, OpenItemError> {
        let Some(effective_date) = draft.doc_date else {
            return Err(OpenItemError::TaxDetailNeedsDates);
        };
        if draft.due_date.is_none() {
            return Err(OpenItemError::TaxDetailNeedsDates);
        }

        Ok(TaxDetailContext {
            currency: draft.currency,
            effective_date,
            tax_type_id,
            order_kind: TaxOrderKind::Receivable,
            order_id: open_item_id,
            display_type: TaxDisplayType::Adjustment,
            subtotal: draft.amount,
            read_only: mode != EntryMode::New,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openitem::types::DocumentType;
    use rust_decimal_macros::dec;

    fn draft(doc_type: DocumentType) -> OpenItemDraft {
        let mut draft = OpenItemDraft::new(doc_type, Currency::Usd);
        draft.doc_number = "CM-0001".into();
        draft.doc_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.due_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        draft.amount = dec!(100.00);
        draft
    }

    #[test]
    fn test_ensure_editable() {
        assert!(OpenItemService::ensure_editable(EntryMode::New, Field::Amount).is_ok());
        assert!(matches!(
            OpenItemService::ensure_editable(EntryMode::Edit, Field::Customer),
            Err(OpenItemError::FieldReadOnly(Field::Customer, EntryMode::Edit))
        ));
        assert!(matches!(
            OpenItemService::ensure_editable(EntryMode::View, Field::Notes),
            Err(OpenItemError::FieldReadOnly(_, _))
        ));
    }

    #[test]
    fn test_view_mode_cannot_post() {
        let d = draft(DocumentType::CreditMemo);
        assert!(matches!(
            OpenItemService::validate_for_posting(EntryMode::View, &d),
            Err(OpenItemError::ReadOnlyMode)
        ));
    }

    #[test]
    fn test_new_mode_requires_memo_type() {
        let d = draft(DocumentType::Invoice);
        assert!(matches!(
            OpenItemService::validate_for_posting(EntryMode::New, &d),
            Err(OpenItemError::NotCreatable(DocumentType::Invoice))
        ));
    }

    #[test]
    fn test_new_mode_runs_validation() {
        let mut d = draft(DocumentType::DebitMemo);
        d.amount = Decimal::ZERO;
        assert!(matches!(
            OpenItemService::validate_for_posting(EntryMode::New, &d),
            Err(OpenItemError::Validation(_))
        ));

        let d = draft(DocumentType::DebitMemo);
        assert!(OpenItemService::validate_for_posting(EntryMode::New, &d).is_ok());
    }

    #[test]
    fn test_rebalance_confirmation() {
        assert!(OpenItemService::requires_rebalance_confirmation(
            dec!(100.00),
            dec!(80.00)
        ));
        assert!(!OpenItemService::requires_rebalance_confirmation(
            dec!(100.00),
            dec!(100.00)
        ));
    }

    #[test]
    fn test_due_date_population_rule() {
        let mut d = draft(DocumentType::CreditMemo);
        d.terms_id = Some(arvo_shared::types::TermsId::from_raw(1));
        d.due_date = None;
        assert!(OpenItemService::should_populate_due_date(&d));

        // Already entered: leave it alone.
        d.due_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        assert!(!OpenItemService::should_populate_due_date(&d));

        // No terms: nothing to derive from.
        d.due_date = None;
        d.terms_id = None;
        assert!(!OpenItemService::should_populate_due_date(&d));
    }

    #[test]
    fn test_tax_detail_context() {
        let d = draft(DocumentType::CreditMemo);
        let ctx = OpenItemService::tax_detail_context(
            &d,
            OpenItemId::from_raw(55),
            Some(TaxTypeId::from_raw(2)),
            EntryMode::New,
        )
        .unwrap();
        assert_eq!(ctx.order_id, OpenItemId::from_raw(55));
        assert_eq!(ctx.order_kind.as_str(), "AR");
        assert_eq!(ctx.subtotal, dec!(100.00));
        assert!(!ctx.read_only);

        let ctx = OpenItemService::tax_detail_context(&d, OpenItemId::from_raw(55), None, EntryMode::Edit)
            .unwrap();
        assert!(ctx.read_only);
    }

    #[test]
    fn test_tax_detail_requires_dates() {
        let mut d = draft(DocumentType::CreditMemo);
        d.due_date = None;
        assert!(matches!(
            OpenItemService::tax_detail_context(&d, OpenItemId::from_raw(1), None, EntryMode::New),
            Err(OpenItemError::TaxDetailNeedsDates)
        ));

        d.due_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        d.doc_date = None;
        assert!(matches!(
            OpenItemService::tax_detail_context(&d, OpenItemId::from_raw(1), None, EntryMode::New),
            Err(OpenItemError::TaxDetailNeedsDates)
        ));
    }
}

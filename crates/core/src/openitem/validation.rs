//! Pre-save validation for new documents.
//!
//! Rules run in a fixed order and the first failure wins, carrying the field
//! the caller should focus. All rules run before any I/O.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{Field, OpenItemDraft, PrepaidRouting};

/// A validation failure with the field it should focus.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ValidationError {
    /// The field to focus.
    pub field: Field,
    /// What went wrong.
    pub kind: ValidationErrorKind,
}

/// The individual validation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationErrorKind {
    /// The document date has not been entered.
    #[error("a document date is required before the document can be saved")]
    MissingDocumentDate,

    /// The due date has not been entered.
    #[error("a due date is required before the document can be saved")]
    MissingDueDate,

    /// The amount is zero.
    #[error("an amount is required before the document can be saved")]
    ZeroAmount,

    /// The tax total exceeds the document amount.
    #[error("the tax amount ({tax}) may not be greater than the document amount ({amount})")]
    TaxExceedsAmount {
        /// Tax total on the draft.
        tax: Decimal,
        /// Absolute document amount.
        amount: Decimal,
    },

    /// Alternate sales-category routing is selected but does not name a valid category.
    #[error("a valid alternate sales category is required")]
    UnresolvedSalesCategory,

    /// Alternate account routing is selected but does not name a valid account.
    #[error("a valid alternate prepaid account is required")]
    UnresolvedAccount,
}

/// Validates a draft ahead of a New-mode save.
///
/// Evaluation order: document date, due date, amount, tax bound, then the
/// alternate prepaid routing.
///
/// # Errors
///
/// Returns the first failing rule together with the field to focus.
pub fn validate_new_draft(draft: &OpenItemDraft) -> Result<(), ValidationError> {
    if draft.doc_date.is_none() {
        return Err(ValidationError {
            field: Field::DocumentDate,
            kind: ValidationErrorKind::MissingDocumentDate,
        });
    }

    if draft.due_date.is_none() {
        return Err(ValidationError {
            field: Field::DueDate,
            kind: ValidationErrorKind::MissingDueDate,
        });
    }

    if draft.amount.is_zero() {
        return Err(ValidationError {
            field: Field::Amount,
            kind: ValidationErrorKind::ZeroAmount,
        });
    }

    if draft.tax_total > draft.amount.abs() {
        return Err(ValidationError {
            field: Field::TaxTotal,
            kind: ValidationErrorKind::TaxExceedsAmount {
                tax: draft.tax_total,
                amount: draft.amount.abs(),
            },
        });
    }

    match draft.prepaid {
        PrepaidRouting::None => {}
        PrepaidRouting::SalesCategory(id) => {
            if id.into_inner() <= 0 {
                return Err(ValidationError {
                    field: Field::PrepaidRouting,
                    kind: ValidationErrorKind::UnresolvedSalesCategory,
                });
            }
        }
        PrepaidRouting::Account(id) => {
            if id.into_inner() <= 0 {
                return Err(ValidationError {
                    field: Field::PrepaidRouting,
                    kind: ValidationErrorKind::UnresolvedAccount,
                });
            }
        }
    }

    Ok(())
}

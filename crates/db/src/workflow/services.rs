//! External service seams consumed by the posting workflow.
//!
//! Each collaborator is a trait so the workflow can be exercised without the
//! real backing services. Database-backed implementations live in the
//! repositories; the defaults here are the static pieces.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use arvo_core::openitem::{MemoKind, TaxDetailContext};
use arvo_shared::types::{OpenItemId, TermsId};

use crate::repositories::open_item::{
    CREATE_CREDIT_MEMO, CREATE_DEBIT_MEMO, RESULT_DUPLICATE_NUMBER, RESULT_INACTIVE_CUSTOMER,
    RESULT_UNKNOWN_CUSTOMER,
};
use crate::repositories::{MemoNumberRepository, TermsRepository};

/// Report rendered after a print-on-post save.
pub const OPEN_ITEM_REPORT: &str = "AROpenItem";

/// Error from the numbering authority.
#[derive(Debug, Error)]
#[error("memo numbering failed: {0}")]
pub struct NumberingError(pub String);

/// Error from due-date computation.
#[derive(Debug, Error)]
#[error("due date computation failed: {0}")]
pub struct DueDateError(pub String);

/// Error from report generation.
#[derive(Debug, Error)]
#[error("report generation failed: {0}")]
pub struct ReportError(pub String);

/// Error from the tax sub-dialog.
#[derive(Debug, Error)]
#[error("tax detail entry failed: {0}")]
pub struct TaxEditError(pub String);

/// Reserves and releases formatted memo numbers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NumberingAuthority: Send + Sync {
    /// Atomically allocates a fresh memo number of the given kind.
    async fn reserve(&self, kind: MemoKind) -> Result<String, NumberingError>;

    /// Returns an unused number to the pool. Idempotent.
    async fn release(&self, kind: MemoKind, number: &str) -> Result<(), NumberingError>;
}

#[async_trait]
impl NumberingAuthority for MemoNumberRepository {
    async fn reserve(&self, kind: MemoKind) -> Result<String, NumberingError> {
        MemoNumberRepository::reserve(self, kind)
            .await
            .map_err(|err| NumberingError(err.to_string()))
    }

    async fn release(&self, kind: MemoKind, number: &str) -> Result<(), NumberingError> {
        MemoNumberRepository::release(self, kind, number)
            .await
            .map_err(|err| NumberingError(err.to_string()))
    }
}

/// Derives due dates from billing terms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DueDateCalculator: Send + Sync {
    /// Computes the due date for a document dated `doc_date` under the given
    /// terms; `None` when the terms record does not exist.
    async fn compute(
        &self,
        terms_id: TermsId,
        doc_date: NaiveDate,
    ) -> Result<Option<NaiveDate>, DueDateError>;
}

#[async_trait]
impl DueDateCalculator for TermsRepository {
    async fn compute(
        &self,
        terms_id: TermsId,
        doc_date: NaiveDate,
    ) -> Result<Option<NaiveDate>, DueDateError> {
        self.due_date(terms_id, doc_date)
            .await
            .map_err(|err| DueDateError(err.to_string()))
    }
}

/// Maps negative result codes from the creation routines to message text.
#[cfg_attr(test, mockall::automock)]
pub trait ErrorCodeLookup: Send + Sync {
    /// Describes a result code produced by the named routine.
    fn describe(&self, routine: &str, code: i32) -> String;
}

/// Static result-code table for the creation routines.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticErrorCodes;

impl ErrorCodeLookup for StaticErrorCodes {
    fn describe(&self, routine: &str, code: i32) -> String {
        match (routine, code) {
            (CREATE_CREDIT_MEMO | CREATE_DEBIT_MEMO, RESULT_UNKNOWN_CUSTOMER) => {
                "the customer does not exist".to_string()
            }
            (CREATE_CREDIT_MEMO | CREATE_DEBIT_MEMO, RESULT_INACTIVE_CUSTOMER) => {
                "the customer is inactive and cannot accept new postings".to_string()
            }
            (CREATE_CREDIT_MEMO | CREATE_DEBIT_MEMO, RESULT_DUPLICATE_NUMBER) => {
                "a posted document already uses this document number".to_string()
            }
            _ => format!("{routine} failed with result code {code}"),
        }
    }
}

/// Parameters passed to the report generator on print-on-post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportParams {
    /// The just-posted document.
    pub open_item_id: OpenItemId,
    /// True for debit-side document types; selects the report variant.
    pub debit_side: bool,
}

/// Renders printable reports.
#[cfg_attr(test, mockall::automock)]
pub trait ReportGenerator: Send + Sync {
    /// Renders the named report with the given parameters.
    fn render(&self, report: &str, params: &ReportParams) -> Result<(), ReportError>;
}

/// Report generator that only logs; for deployments without a print service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogOnlyReports;

impl ReportGenerator for LogOnlyReports {
    fn render(&self, report: &str, params: &ReportParams) -> Result<(), ReportError> {
        info!(
            report,
            open_item_id = params.open_item_id.into_inner(),
            debit_side = params.debit_side,
            "report requested"
        );
        Ok(())
    }
}

/// The external tax sub-dialog.
///
/// The dialog persists tax lines itself and returns nothing; the workflow
/// re-sums the lines afterwards.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaxDetailEditor: Send + Sync {
    /// Opens the dialog with the given context.
    async fn edit(&self, context: &TaxDetailContext) -> Result<(), TaxEditError>;
}

//! The open item entry/posting state machine.
//!
//! A session is opened in exactly one of three modes from a parameter bag,
//! stages its edits in memory, and persists atomically at save time. New
//! mode reserves a memo number up front and releases it on cancel; tax entry
//! before the save goes through a provisional parent row that the real save
//! supersedes.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};
use tracing::{debug, error, warn};

use arvo_core::currency::CurrencyExchange;
use arvo_core::openitem::{
    ApplicationEntry, DocumentType, EntryMode, Field, OpenItemDraft, OpenItemError, OpenItemService,
    OpenItemView, PrepaidRouting,
};
use arvo_shared::types::{
    CustomerId, OpenItemId, ReasonCodeId, SalesRepId, TaxTypeId, TermsId,
};

use crate::repositories::tax::ProvisionalParentInput;
use crate::repositories::{
    ApplicationError, ApplicationRepository, CreateMemoInput, CustomerError, CustomerRepository,
    OpenItemRepoError, OpenItemRepository, TaxError, TaxLineRepository, UpdateOpenItemInput,
};

use super::services::{
    DueDateCalculator, ErrorCodeLookup, NumberingAuthority, NumberingError, ReportGenerator,
    ReportParams, TaxDetailEditor, TaxEditError, OPEN_ITEM_REPORT,
};

/// Initialization parameter bag, as handed over by the hosting shell.
#[derive(Debug, Clone, Default)]
pub struct WorkflowParams {
    /// Lifecycle mode; required.
    pub mode: Option<EntryMode>,
    /// Document type; required for New mode, cross-checked otherwise.
    pub doc_type: Option<DocumentType>,
    /// Customer preselection for New mode.
    pub customer_id: Option<CustomerId>,
    /// Existing document for Edit/View modes.
    pub open_item_id: Option<OpenItemId>,
}

/// External collaborators of a posting session.
#[derive(Clone)]
pub struct WorkflowServices {
    /// Memo number reservation and release.
    pub numbering: Arc<dyn NumberingAuthority>,
    /// Due-date derivation from terms.
    pub due_dates: Arc<dyn DueDateCalculator>,
    /// Result-code text lookup.
    pub error_codes: Arc<dyn ErrorCodeLookup>,
    /// Print-on-post report rendering.
    pub reports: Arc<dyn ReportGenerator>,
    /// Conversion into the reporting currency.
    pub exchange: Arc<dyn CurrencyExchange>,
    /// Taxpayer type handed to the tax sub-dialog, when configured.
    pub adjustment_tax_type: Option<TaxTypeId>,
}

/// Outcome of a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// New mode: the document was posted and the session reset for the next
    /// memo.
    Posted {
        /// The assigned document id.
        id: OpenItemId,
    },
    /// Edit mode: the header update was written; the session is done.
    Saved {
        /// The updated document id.
        id: OpenItemId,
    },
    /// Edit mode: the amount changed and the caller has not confirmed the
    /// out-of-balance warning. Nothing was written; the session stays open.
    RebalanceConfirmationRequired,
}

/// Outcome of closing a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// At least one document was posted during the session.
    Posted(OpenItemId),
    /// The session ended without posting.
    Cancelled,
}

/// Errors raised by the posting workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    /// A required initialization parameter is missing or contradictory.
    #[error("undefined or missing initialization parameter: {0}")]
    UndefinedParameter(&'static str),

    /// A mode or validation rule rejected the request before any I/O.
    #[error(transparent)]
    Domain(#[from] OpenItemError),

    /// A creation routine rejected the request with a result code.
    #[error("{routine} rejected the document (code {code}): {message}")]
    Rejected {
        /// The routine that produced the code.
        routine: String,
        /// The negative result code.
        code: i32,
        /// Text mapped through the error-code lookup.
        message: String,
    },

    /// The requested document does not exist.
    #[error("open item not found: {0}")]
    NotFound(i64),

    /// The numbering authority failed.
    #[error(transparent)]
    Numbering(#[from] NumberingError),

    /// The tax sub-dialog failed.
    #[error(transparent)]
    TaxEdit(#[from] TaxEditError),

    /// Stored data the workflow cannot interpret.
    #[error("invalid stored data: {0}")]
    Corrupt(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One entry/posting session over an AR open item.
pub struct PostingWorkflow {
    db: DatabaseConnection,
    services: WorkflowServices,
    open_items: OpenItemRepository,
    tax_lines: TaxLineRepository,
    application_repo: ApplicationRepository,
    customers: CustomerRepository,
    mode: EntryMode,
    draft: OpenItemDraft,
    /// Assigned or provisionally reserved row id.
    open_item_id: Option<OpenItemId>,
    /// True while the row behind `open_item_id` is an unposted placeholder.
    provisional: bool,
    /// Amount as originally loaded; drives the rebalance confirmation.
    original_amount: Decimal,
    last_posted: Option<OpenItemId>,
    print_on_post: bool,
    applications: Vec<ApplicationEntry>,
    view: Option<OpenItemView>,
}

impl PostingWorkflow {
    /// Opens a session from the initialization parameter bag.
    ///
    /// New mode requires a creatable memo type and reserves its document
    /// number immediately; Edit/View modes require an existing document and
    /// populate the draft and application list from it.
    ///
    /// # Errors
    ///
    /// Returns `UndefinedParameter` for a missing or contradictory bag, or
    /// the underlying service/database error.
    pub async fn open(
        db: DatabaseConnection,
        services: WorkflowServices,
        params: WorkflowParams,
    ) -> Result<Self, WorkflowError> {
        let mode = params
            .mode
            .ok_or(WorkflowError::UndefinedParameter("mode"))?;

        let mut workflow = Self {
            open_items: OpenItemRepository::new(db.clone()),
            tax_lines: TaxLineRepository::new(db.clone()),
            application_repo: ApplicationRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            db,
            mode,
            draft: OpenItemDraft::new(
                params.doc_type.unwrap_or(DocumentType::CreditMemo),
                services.exchange.base_currency(),
            ),
            open_item_id: None,
            provisional: false,
            original_amount: Decimal::ZERO,
            last_posted: None,
            print_on_post: false,
            applications: Vec::new(),
            view: None,
            services,
        };

        match mode {
            EntryMode::New => {
                let doc_type = params
                    .doc_type
                    .ok_or(WorkflowError::UndefinedParameter("doc_type"))?;
                let kind = doc_type
                    .memo_kind()
                    .ok_or(WorkflowError::UndefinedParameter("doc_type"))?;
                workflow.draft.doc_number = workflow.services.numbering.reserve(kind).await?;
                debug!(number = %workflow.draft.doc_number, "opened new memo session");

                if let Some(customer_id) = params.customer_id {
                    workflow.set_customer(customer_id).await?;
                }
            }
            EntryMode::Edit | EntryMode::View => {
                let id = params
                    .open_item_id
                    .ok_or(WorkflowError::UndefinedParameter("open_item_id"))?;
                workflow.populate(id).await?;
                if let Some(doc_type) = params.doc_type {
                    if doc_type != workflow.draft.doc_type {
                        return Err(WorkflowError::UndefinedParameter("doc_type"));
                    }
                }
            }
        }

        Ok(workflow)
    }

    /// The session mode.
    #[must_use]
    pub const fn mode(&self) -> EntryMode {
        self.mode
    }

    /// The staged draft.
    #[must_use]
    pub const fn draft(&self) -> &OpenItemDraft {
        &self.draft
    }

    /// The reserved or loaded document number.
    #[must_use]
    pub fn doc_number(&self) -> &str {
        &self.draft.doc_number
    }

    /// The loaded view, in Edit/View modes.
    #[must_use]
    pub const fn view(&self) -> Option<&OpenItemView> {
        self.view.as_ref()
    }

    /// The classified application rows, in Edit/View modes.
    #[must_use]
    pub fn applications(&self) -> &[ApplicationEntry] {
        &self.applications
    }

    /// The most recently posted document id, if any.
    #[must_use]
    pub const fn last_posted(&self) -> Option<OpenItemId> {
        self.last_posted
    }

    /// Selects the customer and pulls in their defaults (New mode only).
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` outside New mode, or the database error.
    pub async fn set_customer(&mut self, customer_id: CustomerId) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::Customer)?;
        self.draft.customer_id = Some(customer_id);

        if let Some(defaults) = self
            .customers
            .defaults(customer_id)
            .await
            .map_err(map_customer_err)?
        {
            self.draft.terms_id = defaults.terms_id;
            self.draft.sales_rep_id = defaults.sales_rep_id;
            self.draft.currency = defaults.currency;
            self.maybe_populate_due_date().await?;
        }
        Ok(())
    }

    /// Sets the document date and derives the due date when possible.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub async fn set_document_date(&mut self, date: NaiveDate) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::DocumentDate)?;
        self.draft.doc_date = Some(date);
        self.maybe_populate_due_date().await
    }

    /// Sets the due date.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_due_date(&mut self, date: NaiveDate) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::DueDate)?;
        self.draft.due_date = Some(date);
        Ok(())
    }

    /// Sets the billing terms and derives the due date when possible.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub async fn set_terms(&mut self, terms_id: Option<TermsId>) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::Terms)?;
        self.draft.terms_id = terms_id;
        self.maybe_populate_due_date().await
    }

    /// Sets the document amount.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::Amount)?;
        self.draft.amount = amount;
        Ok(())
    }

    /// Sets the order number reference.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_order_number(&mut self, order_number: Option<String>) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::OrderNumber)?;
        self.draft.order_number = order_number;
        Ok(())
    }

    /// Sets the sales representative.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_sales_rep(&mut self, sales_rep_id: Option<SalesRepId>) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::SalesRep)?;
        self.draft.sales_rep_id = sales_rep_id;
        Ok(())
    }

    /// Sets the reason code.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_reason_code(
        &mut self,
        reason_code_id: Option<ReasonCodeId>,
    ) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::ReasonCode)?;
        self.draft.reason_code_id = reason_code_id;
        Ok(())
    }

    /// Sets the commission due.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_commission_due(&mut self, commission_due: Decimal) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::CommissionDue)?;
        self.draft.commission_due = commission_due;
        Ok(())
    }

    /// Sets the alternate prepaid routing.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_prepaid_routing(&mut self, prepaid: PrepaidRouting) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::PrepaidRouting)?;
        self.draft.prepaid = prepaid;
        Ok(())
    }

    /// Sets the notes.
    ///
    /// # Errors
    ///
    /// Returns `FieldReadOnly` when the mode forbids the edit.
    pub fn set_notes(&mut self, notes: String) -> Result<(), WorkflowError> {
        OpenItemService::ensure_editable(self.mode, Field::Notes)?;
        self.draft.notes = notes;
        Ok(())
    }

    /// Requests the printable document after a successful post.
    pub fn set_print_on_post(&mut self, print_on_post: bool) {
        self.print_on_post = print_on_post;
    }

    /// Saves the session.
    ///
    /// New mode validates and posts atomically; Edit mode updates the header
    /// fields, first demanding `confirm_rebalance` when the amount changed
    /// from its loaded value; View mode always fails.
    ///
    /// # Errors
    ///
    /// Validation failures surface before any persistence; persistence and
    /// domain rejections roll the transaction back (and reset a New-mode
    /// form).
    pub async fn save(&mut self, confirm_rebalance: bool) -> Result<SaveOutcome, WorkflowError> {
        OpenItemService::validate_for_posting(self.mode, &self.draft)?;

        match self.mode {
            EntryMode::New => self.post_new().await,
            EntryMode::Edit => self.save_edit(confirm_rebalance).await,
            EntryMode::View => Err(OpenItemError::ReadOnlyMode.into()),
        }
    }

    async fn post_new(&mut self) -> Result<SaveOutcome, WorkflowError> {
        // The creation routine rejects a missing customer with its own
        // result code; mirror the dialog by passing the sentinel through.
        let customer_id = self.draft.customer_id.unwrap_or(CustomerId::from_raw(-1));
        let input = CreateMemoInput {
            reserved_id: self.open_item_id.map(OpenItemId::into_inner),
            customer_id,
            doc_number: self.draft.doc_number.clone(),
            order_number: self.draft.order_number.clone(),
            doc_date: required_date(self.draft.doc_date)?,
            due_date: required_date(self.draft.due_date)?,
            amount: self.draft.amount,
            currency: self.draft.currency,
            commission_due: self.draft.commission_due,
            terms_id: self.draft.terms_id,
            sales_rep_id: self.draft.sales_rep_id,
            reason_code_id: self.draft.reason_code_id,
            prepaid: self.draft.prepaid,
            notes: non_empty(&self.draft.notes),
        };

        let txn = self.db.begin().await?;
        let created = match self.draft.doc_type {
            DocumentType::CreditMemo => self.open_items.create_credit_memo(&txn, &input).await,
            DocumentType::DebitMemo => self.open_items.create_debit_memo(&txn, &input).await,
            other => {
                txn.rollback().await?;
                return Err(OpenItemError::NotCreatable(other).into());
            }
        };

        match created {
            Ok(id) => {
                txn.commit().await?;
                self.last_posted = Some(id);
                debug!(id = id.into_inner(), number = %self.draft.doc_number, "posted open item");

                if self.print_on_post {
                    let params = ReportParams {
                        open_item_id: id,
                        debit_side: self.draft.doc_type.is_debit_side(),
                    };
                    if let Err(err) = self.services.reports.render(OPEN_ITEM_REPORT, &params) {
                        // The document is posted; a failed print is reported,
                        // not rolled back.
                        error!(error = %err, id = id.into_inner(), "print on post failed");
                    }
                }

                self.reset_for_next().await?;
                Ok(SaveOutcome::Posted { id })
            }
            Err(err) => {
                let mapped = self.map_open_item_err(err);
                txn.rollback().await?;
                error!(error = %mapped, number = %self.draft.doc_number, "posting failed; rolled back");
                self.reset_after_failure();
                Err(mapped)
            }
        }
    }

    async fn save_edit(&mut self, confirm_rebalance: bool) -> Result<SaveOutcome, WorkflowError> {
        let id = self
            .open_item_id
            .ok_or(WorkflowError::UndefinedParameter("open_item_id"))?;

        if OpenItemService::requires_rebalance_confirmation(self.original_amount, self.draft.amount)
            && !confirm_rebalance
        {
            // Changing the open amount leaves the subsidiary ledger out of
            // balance until a manual G/L distribution is entered.
            return Ok(SaveOutcome::RebalanceConfirmationRequired);
        }

        let input = UpdateOpenItemInput {
            due_date: required_date(self.draft.due_date)?,
            terms_id: self.draft.terms_id,
            sales_rep_id: self.draft.sales_rep_id,
            amount: self.draft.amount,
            commission_due: self.draft.commission_due,
            reason_code_id: self.draft.reason_code_id,
            currency: self.draft.currency,
            notes: non_empty(&self.draft.notes),
        };

        let txn = self.db.begin().await?;
        match self.open_items.update(&txn, id, &input).await {
            Ok(()) => {
                txn.commit().await?;
                self.original_amount = self.draft.amount;
                Ok(SaveOutcome::Saved { id })
            }
            Err(err) => {
                let mapped = self.map_open_item_err(err);
                txn.rollback().await?;
                Err(mapped)
            }
        }
    }

    /// Runs the external tax sub-dialog and re-sums the tax lines.
    ///
    /// When no id has been assigned yet, a provisional parent row is
    /// reserved first so the lines have a valid foreign key. Returns the new
    /// tax total.
    ///
    /// # Errors
    ///
    /// Returns `TaxDetailNeedsDates` when the dates are not entered yet, or
    /// the editor/database error.
    pub async fn tax_detail(
        &mut self,
        editor: &dyn TaxDetailEditor,
    ) -> Result<Decimal, WorkflowError> {
        let id = match self.open_item_id {
            Some(id) => id,
            None => {
                let (Some(doc_date), Some(due_date)) = (self.draft.doc_date, self.draft.due_date)
                else {
                    return Err(OpenItemError::TaxDetailNeedsDates.into());
                };
                let input = ProvisionalParentInput {
                    doc_type: self.draft.doc_type,
                    doc_number: self.draft.doc_number.clone(),
                    doc_date,
                    due_date,
                    currency: self.draft.currency,
                };
                let id = self
                    .tax_lines
                    .ensure_provisional_parent(&input)
                    .await
                    .map_err(map_tax_err)?;
                self.open_item_id = Some(id);
                self.provisional = true;
                id
            }
        };

        let context = OpenItemService::tax_detail_context(
            &self.draft,
            id,
            self.services.adjustment_tax_type,
            self.mode,
        )?;
        editor.edit(&context).await?;

        let total = self.tax_lines.sum(id).await.map_err(map_tax_err)?;
        self.draft.tax_total = total;
        Ok(total)
    }

    /// Closes the session.
    ///
    /// New mode releases the reserved number and removes an orphaned
    /// provisional placeholder; both are best-effort and never block the
    /// close. Returns the last posted id when the session posted anything.
    pub async fn close(self) -> CloseOutcome {
        if self.mode == EntryMode::New {
            if let Some(kind) = self.draft.doc_type.memo_kind() {
                if let Err(err) = self
                    .services
                    .numbering
                    .release(kind, &self.draft.doc_number)
                    .await
                {
                    warn!(error = %err, number = %self.draft.doc_number, "memo number release failed");
                }
            }

            if self.provisional {
                if let Some(id) = self.open_item_id {
                    match self.open_items.delete_placeholder(id).await {
                        Ok(removed) => {
                            if removed {
                                debug!(id = id.into_inner(), "removed provisional placeholder");
                            }
                        }
                        Err(err) => {
                            warn!(error = %err, id = id.into_inner(), "placeholder cleanup failed");
                        }
                    }
                }
            }

            if let Some(id) = self.last_posted {
                return CloseOutcome::Posted(id);
            }
        }

        CloseOutcome::Cancelled
    }

    async fn populate(&mut self, id: OpenItemId) -> Result<(), WorkflowError> {
        let view = self
            .open_items
            .read(id)
            .await
            .map_err(|err| self.map_open_item_err(err))?;

        self.draft = OpenItemDraft {
            customer_id: view.customer_id,
            doc_type: view.doc_type,
            doc_number: view.doc_number.clone(),
            order_number: view.order_number.clone(),
            doc_date: Some(view.doc_date),
            due_date: Some(view.due_date),
            amount: view.amount.amount,
            currency: view.amount.currency,
            tax_total: view.tax_total,
            commission_due: view.commission_due,
            terms_id: view.terms_id,
            sales_rep_id: view.sales_rep_id,
            reason_code_id: view.reason_code_id,
            prepaid: view.prepaid,
            notes: view.notes.clone(),
        };
        self.original_amount = view.amount.amount;
        self.open_item_id = Some(id);

        self.applications = self
            .application_repo
            .load(id, view.doc_type, self.services.exchange.as_ref())
            .await
            .map_err(map_application_err)?;
        self.view = Some(view);
        Ok(())
    }

    async fn maybe_populate_due_date(&mut self) -> Result<(), WorkflowError> {
        if !OpenItemService::should_populate_due_date(&self.draft) {
            return Ok(());
        }
        let (Some(terms_id), Some(doc_date)) = (self.draft.terms_id, self.draft.doc_date) else {
            return Ok(());
        };
        match self.services.due_dates.compute(terms_id, doc_date).await {
            Ok(Some(due_date)) => self.draft.due_date = Some(due_date),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "due date derivation failed"),
        }
        Ok(())
    }

    async fn reset_for_next(&mut self) -> Result<(), WorkflowError> {
        let doc_type = self.draft.doc_type;
        let kind = doc_type
            .memo_kind()
            .ok_or(WorkflowError::UndefinedParameter("doc_type"))?;
        let number = self.services.numbering.reserve(kind).await?;

        self.draft = OpenItemDraft::new(doc_type, self.services.exchange.base_currency());
        self.draft.doc_number = number;
        self.open_item_id = None;
        self.provisional = false;
        self.applications.clear();
        self.view = None;
        Ok(())
    }

    fn reset_after_failure(&mut self) {
        // Keep the reserved number and any provisional tax parent so the
        // next attempt supersedes rather than duplicates.
        let doc_type = self.draft.doc_type;
        let doc_number = std::mem::take(&mut self.draft.doc_number);
        let tax_total = self.draft.tax_total;
        let currency = self.draft.currency;
        self.draft = OpenItemDraft::new(doc_type, currency);
        self.draft.doc_number = doc_number;
        self.draft.tax_total = tax_total;
    }

    fn map_open_item_err(&self, err: OpenItemRepoError) -> WorkflowError {
        match err {
            OpenItemRepoError::NotFound(id) => WorkflowError::NotFound(id),
            OpenItemRepoError::Rejected { routine, code } => WorkflowError::Rejected {
                routine: routine.to_string(),
                code,
                message: self.services.error_codes.describe(routine, code),
            },
            OpenItemRepoError::InvalidCurrency { id, code } => WorkflowError::Corrupt(format!(
                "invalid currency code stored on open item {id}: {code}"
            )),
            OpenItemRepoError::Database(err) => WorkflowError::Database(err),
        }
    }
}

impl From<WorkflowError> for arvo_shared::AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::UndefinedParameter(_) => Self::Validation(err.to_string()),
            WorkflowError::Domain(domain) => Self::Validation(domain.to_string()),
            WorkflowError::Rejected {
                routine,
                code,
                message,
            } => Self::DomainRejection {
                routine,
                code,
                message,
            },
            WorkflowError::NotFound(id) => Self::NotFound(format!("open item {id}")),
            WorkflowError::Numbering(service) => Self::ExternalService(service.to_string()),
            WorkflowError::TaxEdit(service) => Self::ExternalService(service.to_string()),
            WorkflowError::Corrupt(message) => Self::Database(message),
            WorkflowError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

fn required_date(date: Option<NaiveDate>) -> Result<NaiveDate, WorkflowError> {
    date.ok_or_else(|| WorkflowError::Corrupt("validated draft is missing a date".to_string()))
}

fn map_tax_err(err: TaxError) -> WorkflowError {
    match err {
        TaxError::SequenceUnavailable => WorkflowError::Corrupt(err.to_string()),
        TaxError::Database(err) => WorkflowError::Database(err),
    }
}

fn map_customer_err(err: CustomerError) -> WorkflowError {
    match err {
        CustomerError::InvalidCurrency { .. } => WorkflowError::Corrupt(err.to_string()),
        CustomerError::Database(err) => WorkflowError::Database(err),
    }
}

fn map_application_err(err: ApplicationError) -> WorkflowError {
    match err {
        ApplicationError::InvalidCurrency { .. } => WorkflowError::Corrupt(err.to_string()),
        ApplicationError::Database(err) => WorkflowError::Database(err),
    }
}

fn non_empty(notes: &str) -> Option<String> {
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::services::{
        MockDueDateCalculator, MockNumberingAuthority, MockTaxDetailEditor, LogOnlyReports,
        StaticErrorCodes,
    };
    use arvo_core::currency::FixedRateTable;
    use arvo_core::openitem::{ValidationErrorKind, Field};
    use arvo_shared::types::Currency;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn mock_db() -> DatabaseConnection {
        MockDatabase::new(DatabaseBackend::Postgres).into_connection()
    }

    fn services_with(numbering: MockNumberingAuthority) -> WorkflowServices {
        services_with_due_dates(numbering, MockDueDateCalculator::new())
    }

    fn services_with_due_dates(
        numbering: MockNumberingAuthority,
        due_dates: MockDueDateCalculator,
    ) -> WorkflowServices {
        WorkflowServices {
            numbering: Arc::new(numbering),
            due_dates: Arc::new(due_dates),
            error_codes: Arc::new(StaticErrorCodes),
            reports: Arc::new(LogOnlyReports),
            exchange: Arc::new(FixedRateTable::new(Currency::Usd)),
            adjustment_tax_type: None,
        }
    }

    fn reserving(number: &'static str) -> MockNumberingAuthority {
        let mut numbering = MockNumberingAuthority::new();
        numbering
            .expect_reserve()
            .returning(move |_| Ok(number.to_string()));
        numbering
    }

    async fn new_session(number: &'static str) -> PostingWorkflow {
        PostingWorkflow::open(
            mock_db(),
            services_with(reserving(number)),
            WorkflowParams {
                mode: Some(EntryMode::New),
                doc_type: Some(DocumentType::CreditMemo),
                ..Default::default()
            },
        )
        .await
        .unwrap()
    }

    fn session_in(mode: EntryMode, doc_type: DocumentType) -> PostingWorkflow {
        let db = mock_db();
        let mut draft = OpenItemDraft::new(doc_type, Currency::Usd);
        draft.customer_id = Some(CustomerId::from_raw(10));
        draft.doc_number = "DM-0007".into();
        draft.doc_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        draft.due_date = NaiveDate::from_ymd_opt(2024, 1, 31);
        draft.amount = dec!(100.00);

        PostingWorkflow {
            open_items: OpenItemRepository::new(db.clone()),
            tax_lines: TaxLineRepository::new(db.clone()),
            application_repo: ApplicationRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            db,
            services: services_with(MockNumberingAuthority::new()),
            mode,
            draft,
            open_item_id: Some(OpenItemId::from_raw(7)),
            provisional: false,
            original_amount: dec!(100.00),
            last_posted: None,
            print_on_post: false,
            applications: Vec::new(),
            view: None,
        }
    }

    #[tokio::test]
    async fn test_open_new_reserves_number() {
        let workflow = new_session("CM-0042").await;
        assert_eq!(workflow.mode(), EntryMode::New);
        assert_eq!(workflow.doc_number(), "CM-0042");
        assert_eq!(workflow.draft().currency, Currency::Usd);
        assert!(workflow.last_posted().is_none());
    }

    #[tokio::test]
    async fn test_open_requires_mode() {
        let result = PostingWorkflow::open(
            mock_db(),
            services_with(MockNumberingAuthority::new()),
            WorkflowParams::default(),
        )
        .await;
        assert!(matches!(
            result,
            Err(WorkflowError::UndefinedParameter("mode"))
        ));
    }

    #[tokio::test]
    async fn test_open_new_requires_doc_type() {
        let result = PostingWorkflow::open(
            mock_db(),
            services_with(MockNumberingAuthority::new()),
            WorkflowParams {
                mode: Some(EntryMode::New),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(WorkflowError::UndefinedParameter("doc_type"))
        ));
    }

    #[tokio::test]
    async fn test_open_new_rejects_non_memo_types() {
        for doc_type in [DocumentType::Invoice, DocumentType::CustomerDeposit] {
            let result = PostingWorkflow::open(
                mock_db(),
                services_with(MockNumberingAuthority::new()),
                WorkflowParams {
                    mode: Some(EntryMode::New),
                    doc_type: Some(doc_type),
                    ..Default::default()
                },
            )
            .await;
            assert!(matches!(
                result,
                Err(WorkflowError::UndefinedParameter("doc_type"))
            ));
        }
    }

    #[tokio::test]
    async fn test_open_edit_requires_open_item_id() {
        let result = PostingWorkflow::open(
            mock_db(),
            services_with(MockNumberingAuthority::new()),
            WorkflowParams {
                mode: Some(EntryMode::Edit),
                ..Default::default()
            },
        )
        .await;
        assert!(matches!(
            result,
            Err(WorkflowError::UndefinedParameter("open_item_id"))
        ));
    }

    #[tokio::test]
    async fn test_validation_rejects_before_persistence() {
        // Tax above the document amount: rejected with the tax field named,
        // and the staged amount is untouched.
        let mut workflow = new_session("CM-0042").await;
        workflow
            .set_document_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        workflow
            .set_due_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .unwrap();
        workflow.set_amount(dec!(100.00)).unwrap();
        workflow.draft.tax_total = dec!(150.00);

        let err = workflow.save(false).await.unwrap_err();
        match err {
            WorkflowError::Domain(OpenItemError::Validation(validation)) => {
                assert_eq!(validation.field, Field::TaxTotal);
                assert!(matches!(
                    validation.kind,
                    ValidationErrorKind::TaxExceedsAmount { .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(workflow.draft().amount, dec!(100.00));
        assert_eq!(workflow.doc_number(), "CM-0042");
    }

    #[tokio::test]
    async fn test_zero_amount_rejected() {
        let mut workflow = new_session("CM-0042").await;
        workflow
            .set_document_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        workflow
            .set_due_date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap())
            .unwrap();

        let err = workflow.save(false).await.unwrap_err();
        match err {
            WorkflowError::Domain(OpenItemError::Validation(validation)) => {
                assert_eq!(validation.field, Field::Amount);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_view_mode_save_rejected() {
        let mut workflow = session_in(EntryMode::View, DocumentType::Invoice);
        let err = workflow.save(false).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Domain(OpenItemError::ReadOnlyMode)
        ));
    }

    #[tokio::test]
    async fn test_edit_amount_change_requires_confirmation() {
        let mut workflow = session_in(EntryMode::Edit, DocumentType::DebitMemo);
        workflow.set_amount(dec!(80.00)).unwrap();

        let outcome = workflow.save(false).await.unwrap();
        assert_eq!(outcome, SaveOutcome::RebalanceConfirmationRequired);
        // Nothing was written and the session is still live.
        assert_eq!(workflow.draft().amount, dec!(80.00));
        assert_eq!(workflow.mode(), EntryMode::Edit);
    }

    #[tokio::test]
    async fn test_edit_mode_field_gating() {
        let mut workflow = session_in(EntryMode::Edit, DocumentType::DebitMemo);
        assert!(matches!(
            workflow.set_customer(CustomerId::from_raw(11)).await,
            Err(WorkflowError::Domain(OpenItemError::FieldReadOnly(
                Field::Customer,
                EntryMode::Edit
            )))
        ));
        assert!(matches!(
            workflow.set_order_number(Some("SO-1".into())),
            Err(WorkflowError::Domain(OpenItemError::FieldReadOnly(_, _)))
        ));
        assert!(matches!(
            workflow.set_terms(Some(TermsId::from_raw(2))).await,
            Err(WorkflowError::Domain(OpenItemError::FieldReadOnly(_, _)))
        ));
        // Due date and amount stay editable.
        assert!(workflow
            .set_due_date(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
            .is_ok());
        assert!(workflow.set_amount(dec!(90.00)).is_ok());
    }

    #[tokio::test]
    async fn test_close_releases_reserved_number() {
        let mut numbering = reserving("CM-0042");
        numbering
            .expect_release()
            .withf(|_, number| number == "CM-0042")
            .times(1)
            .returning(|_, _| Ok(()));

        let workflow = PostingWorkflow::open(
            mock_db(),
            services_with(numbering),
            WorkflowParams {
                mode: Some(EntryMode::New),
                doc_type: Some(DocumentType::CreditMemo),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        assert_eq!(workflow.close().await, CloseOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_close_release_failure_is_nonfatal() {
        let mut numbering = reserving("CM-0042");
        numbering
            .expect_release()
            .returning(|_, _| Err(NumberingError("pool unavailable".into())));

        let workflow = PostingWorkflow::open(
            mock_db(),
            services_with(numbering),
            WorkflowParams {
                mode: Some(EntryMode::New),
                doc_type: Some(DocumentType::CreditMemo),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // The close still completes.
        assert_eq!(workflow.close().await, CloseOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_close_outside_new_mode_skips_cleanup() {
        let workflow = session_in(EntryMode::View, DocumentType::Invoice);
        assert_eq!(workflow.close().await, CloseOutcome::Cancelled);
    }

    #[tokio::test]
    async fn test_due_date_derived_from_terms() {
        let mut due_dates = MockDueDateCalculator::new();
        due_dates
            .expect_compute()
            .returning(|_, _| Ok(NaiveDate::from_ymd_opt(2024, 1, 31)));

        let mut workflow = PostingWorkflow::open(
            mock_db(),
            services_with_due_dates(reserving("CM-0042"), due_dates),
            WorkflowParams {
                mode: Some(EntryMode::New),
                doc_type: Some(DocumentType::CreditMemo),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        workflow
            .set_document_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        workflow.set_terms(Some(TermsId::from_raw(1))).await.unwrap();
        assert_eq!(
            workflow.draft().due_date,
            NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }

    #[tokio::test]
    async fn test_entered_due_date_not_overwritten() {
        let mut due_dates = MockDueDateCalculator::new();
        due_dates.expect_compute().times(0);

        let mut workflow = PostingWorkflow::open(
            mock_db(),
            services_with_due_dates(reserving("CM-0042"), due_dates),
            WorkflowParams {
                mode: Some(EntryMode::New),
                doc_type: Some(DocumentType::CreditMemo),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        workflow
            .set_due_date(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
            .unwrap();
        workflow
            .set_document_date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
            .await
            .unwrap();
        workflow.set_terms(Some(TermsId::from_raw(1))).await.unwrap();
        assert_eq!(
            workflow.draft().due_date,
            NaiveDate::from_ymd_opt(2024, 2, 15)
        );
    }

    #[test]
    fn test_workflow_errors_map_to_app_errors() {
        use arvo_shared::AppError;

        let err = AppError::from(WorkflowError::UndefinedParameter("doc_type"));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.is_pre_persistence());

        let err = AppError::from(WorkflowError::Rejected {
            routine: "create_ar_credit_memo".into(),
            code: -1,
            message: "the customer does not exist".into(),
        });
        assert_eq!(err.code(), "DOMAIN_REJECTION");

        let err = AppError::from(WorkflowError::NotFound(9));
        assert_eq!(err.code(), "NOT_FOUND");

        let err = AppError::from(WorkflowError::Numbering(NumberingError("down".into())));
        assert_eq!(err.code(), "EXTERNAL_SERVICE_ERROR");
    }

    #[tokio::test]
    async fn test_tax_detail_requires_dates() {
        let mut workflow = new_session("CM-0042").await;
        let editor = MockTaxDetailEditor::new();

        let err = workflow.tax_detail(&editor).await.unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Domain(OpenItemError::TaxDetailNeedsDates)
        ));
    }
}

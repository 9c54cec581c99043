//! Domain types for AR open item entry and posting.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use arvo_shared::types::{
    Currency, CustomerId, GlAccountId, Money, OpenItemId, ReasonCodeId, SalesCategoryId,
    SalesRepId, TermsId,
};

/// AR document classification.
///
/// Set once from the initialization parameters and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Manual adjusting document decreasing the customer's receivable balance.
    CreditMemo,
    /// Manual adjusting document increasing the customer's receivable balance.
    DebitMemo,
    /// Sales invoice.
    Invoice,
    /// Customer deposit held against future invoices.
    CustomerDeposit,
}

impl DocumentType {
    /// True for documents on the debit side of the receivable (Invoice, DebitMemo).
    ///
    /// Debit-side documents are paid *by* other documents: their application
    /// rows reference them as the target. Credit-side documents pay others
    /// and appear as the source.
    #[must_use]
    pub const fn is_debit_side(&self) -> bool {
        matches!(self, Self::Invoice | Self::DebitMemo)
    }

    /// The memo kind used for number reservation, when this type is
    /// creatable through the misc. memo workflow.
    #[must_use]
    pub const fn memo_kind(&self) -> Option<MemoKind> {
        match self {
            Self::CreditMemo => Some(MemoKind::Credit),
            Self::DebitMemo => Some(MemoKind::Debit),
            Self::Invoice | Self::CustomerDeposit => None,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::CreditMemo => "Credit Memo",
            Self::DebitMemo => "Debit Memo",
            Self::Invoice => "Invoice",
            Self::CustomerDeposit => "Customer Deposit",
        };
        f.write_str(name)
    }
}

/// Memo kinds the numbering authority hands out numbers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoKind {
    /// Misc. credit memo.
    Credit,
    /// Misc. debit memo.
    Debit,
}

impl MemoKind {
    /// Stable key used for the sequence row backing this kind.
    #[must_use]
    pub const fn sequence_key(&self) -> &'static str {
        match self {
            Self::Credit => "ar_credit_memo",
            Self::Debit => "ar_debit_memo",
        }
    }
}

/// Lifecycle mode of an entry session.
///
/// Fixed exactly once at initialization; each mode enables a disjoint set of
/// editable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryMode {
    /// Creating a new document; all fields editable.
    New,
    /// Editing header fields of an existing document.
    Edit,
    /// Read-only review; saving is disabled.
    View,
}

impl EntryMode {
    /// Returns true if the given field may be edited in this mode.
    #[must_use]
    pub const fn can_edit(&self, field: Field) -> bool {
        match self {
            // Journal number is display-only everywhere.
            Self::New => !matches!(field, Field::JournalNumber),
            Self::Edit => matches!(
                field,
                Field::DueDate
                    | Field::SalesRep
                    | Field::Amount
                    | Field::CommissionDue
                    | Field::ReasonCode
                    | Field::Notes
            ),
            Self::View => false,
        }
    }

    /// Returns true if the session can save at all.
    #[must_use]
    pub const fn can_save(&self) -> bool {
        !matches!(self, Self::View)
    }
}

impl std::fmt::Display for EntryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Edit => "edit",
            Self::View => "view",
        };
        f.write_str(name)
    }
}

/// Editable header fields, used for mode gating and for naming the field a
/// validation failure should focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Customer selector.
    Customer,
    /// Document date.
    DocumentDate,
    /// Due date.
    DueDate,
    /// Document number.
    DocumentNumber,
    /// Order number reference.
    OrderNumber,
    /// Journal number (display only).
    JournalNumber,
    /// Billing terms.
    Terms,
    /// Sales representative.
    SalesRep,
    /// Document amount.
    Amount,
    /// Commission due.
    CommissionDue,
    /// Reason code.
    ReasonCode,
    /// Alternate prepaid routing.
    PrepaidRouting,
    /// Tax total.
    TaxTotal,
    /// Free-form notes.
    Notes,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Customer => "customer",
            Self::DocumentDate => "document date",
            Self::DueDate => "due date",
            Self::DocumentNumber => "document number",
            Self::OrderNumber => "order number",
            Self::JournalNumber => "journal number",
            Self::Terms => "terms",
            Self::SalesRep => "sales rep",
            Self::Amount => "amount",
            Self::CommissionDue => "commission due",
            Self::ReasonCode => "reason code",
            Self::PrepaidRouting => "prepaid routing",
            Self::TaxTotal => "tax",
            Self::Notes => "notes",
        };
        f.write_str(name)
    }
}

/// Alternate prepaid routing for memo distribution.
///
/// The two alternates are mutually exclusive, so the selection is a single
/// tagged variant rather than independent flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "id")]
pub enum PrepaidRouting {
    /// Distribute against the customer's default prepaid account.
    #[default]
    None,
    /// Route to an alternate sales category.
    SalesCategory(SalesCategoryId),
    /// Route to an alternate G/L account.
    Account(GlAccountId),
}

impl PrepaidRouting {
    /// True when an alternate is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Staged, in-memory state of a document being entered or edited.
///
/// Nothing is persisted until the save step; optional dates model fields the
/// user has not filled in yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenItemDraft {
    /// Customer the document belongs to.
    pub customer_id: Option<CustomerId>,
    /// Document classification.
    pub doc_type: DocumentType,
    /// Reserved or loaded document number.
    pub doc_number: String,
    /// Originating order number, if any.
    pub order_number: Option<String>,
    /// Document date.
    pub doc_date: Option<NaiveDate>,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Signed document amount.
    pub amount: Decimal,
    /// Document currency.
    pub currency: Currency,
    /// Sum of the tax sub-ledger lines attached to this document.
    pub tax_total: Decimal,
    /// Commission due, in base currency.
    pub commission_due: Decimal,
    /// Billing terms.
    pub terms_id: Option<TermsId>,
    /// Sales representative.
    pub sales_rep_id: Option<SalesRepId>,
    /// Reason code.
    pub reason_code_id: Option<ReasonCodeId>,
    /// Alternate prepaid routing.
    pub prepaid: PrepaidRouting,
    /// Free-form notes.
    pub notes: String,
}

impl OpenItemDraft {
    /// Creates an empty draft of the given type and currency.
    #[must_use]
    pub fn new(doc_type: DocumentType, currency: Currency) -> Self {
        Self {
            customer_id: None,
            doc_type,
            doc_number: String::new(),
            order_number: None,
            doc_date: None,
            due_date: None,
            amount: Decimal::ZERO,
            currency,
            tax_total: Decimal::ZERO,
            commission_due: Decimal::ZERO,
            terms_id: None,
            sales_rep_id: None,
            reason_code_id: None,
            prepaid: PrepaidRouting::None,
            notes: String::new(),
        }
    }
}

/// Read-back view of a persisted open item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenItemView {
    /// Row id.
    pub id: OpenItemId,
    /// Customer; absent only on provisional placeholder rows.
    pub customer_id: Option<CustomerId>,
    /// Document classification.
    pub doc_type: DocumentType,
    /// Document number.
    pub doc_number: String,
    /// Originating order number.
    pub order_number: Option<String>,
    /// Posting journal number (display only).
    pub journal_number: Option<String>,
    /// Document date.
    pub doc_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Signed document amount.
    pub amount: Money,
    /// Amount applied so far.
    pub paid: Money,
    /// Sum of the attached tax lines.
    pub tax_total: Decimal,
    /// Commission due, in base currency.
    pub commission_due: Decimal,
    /// Billing terms.
    pub terms_id: Option<TermsId>,
    /// Sales representative.
    pub sales_rep_id: Option<SalesRepId>,
    /// Reason code.
    pub reason_code_id: Option<ReasonCodeId>,
    /// Alternate prepaid routing.
    pub prepaid: PrepaidRouting,
    /// Free-form notes.
    pub notes: String,
    /// Whether the tax total is shown for this document.
    pub shows_tax: bool,
    /// Whether the document has been posted.
    pub posted: bool,
}

impl OpenItemView {
    /// Remaining balance: amount less what has been applied.
    #[must_use]
    pub fn balance(&self) -> Money {
        // Both figures are stored in the document currency.
        self.amount
            .checked_sub(self.paid)
            .unwrap_or_else(|| Money::zero(self.amount.currency))
    }
}

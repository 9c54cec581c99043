//! Payment-application classification.
//!
//! An application row links two AR documents: the credit-side source that
//! pays and the debit-side target that is paid. The display classification
//! depends on which side of the row the inspected document sits on and, for
//! cash receipts, on the funds type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use arvo_shared::types::{ApplicationId, Money, OpenItemId};

use super::types::DocumentType;

/// Which side of its application rows a document occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationSide {
    /// The document pays others (credit memos, customer deposits).
    Source,
    /// The document is paid by others (invoices, debit memos).
    Target,
}

impl DocumentType {
    /// The side of the application rows this document type occupies.
    #[must_use]
    pub const fn application_side(&self) -> ApplicationSide {
        if self.is_debit_side() {
            ApplicationSide::Target
        } else {
            ApplicationSide::Source
        }
    }
}

/// Document kind recorded on the counter side of an application row.
///
/// The counter side is not limited to open-item types: cash receipts and A/P
/// checks also apply against receivable documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CounterDocKind {
    /// Misc. or sales credit memo.
    CreditMemo,
    /// Customer deposit.
    CustomerDeposit,
    /// Cash receipt (classified further by funds type).
    CashReceipt,
    /// Sales invoice.
    Invoice,
    /// Misc. debit memo.
    DebitMemo,
    /// A/P check applied against a receivable.
    ApCheck,
    /// Anything this module does not recognize.
    Other,
}

/// Funds type recorded on cash-receipt applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FundsType {
    /// Personal or company check.
    Check,
    /// Certified check.
    CertifiedCheck,
    /// MasterCard.
    MasterCard,
    /// Visa.
    Visa,
    /// American Express.
    AmericanExpress,
    /// Discover Card.
    DiscoverCard,
    /// Any other credit card.
    OtherCreditCard,
    /// Cash.
    Cash,
    /// Wire transfer.
    WireTransfer,
    /// Other funds.
    Other,
}

/// Classification label shown for an application row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationLabel {
    /// Credit memo applied to this document.
    CreditMemo,
    /// Customer deposit applied to this document.
    CashDeposit,
    /// Check payment.
    Check,
    /// Certified check payment.
    CertifiedCheck,
    /// MasterCard payment.
    MasterCard,
    /// Visa payment.
    Visa,
    /// American Express payment.
    AmericanExpress,
    /// Discover Card payment.
    DiscoverCard,
    /// Other credit card payment.
    OtherCreditCard,
    /// Cash payment.
    Cash,
    /// Wire transfer payment.
    WireTransfer,
    /// Invoice this document was applied to.
    Invoice,
    /// Debit memo this document was applied to.
    DebitMemo,
    /// A/P check this document was applied to.
    ApCheck,
    /// Unclassified application.
    Other,
}

impl ApplicationLabel {
    /// Human-readable label text.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreditMemo => "Credit Memo",
            Self::CashDeposit => "Cash Deposit",
            Self::Check => "Check",
            Self::CertifiedCheck => "Certified Check",
            Self::MasterCard => "Master Card",
            Self::Visa => "Visa",
            Self::AmericanExpress => "American Express",
            Self::DiscoverCard => "Discover Card",
            Self::OtherCreditCard => "Other Credit Card",
            Self::Cash => "Cash",
            Self::WireTransfer => "Wire Transfer",
            Self::Invoice => "Invoice",
            Self::DebitMemo => "Debit Memo",
            Self::ApCheck => "A/P Check",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for ApplicationLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FundsType> for ApplicationLabel {
    fn from(funds: FundsType) -> Self {
        match funds {
            FundsType::Check => Self::Check,
            FundsType::CertifiedCheck => Self::CertifiedCheck,
            FundsType::MasterCard => Self::MasterCard,
            FundsType::Visa => Self::Visa,
            FundsType::AmericanExpress => Self::AmericanExpress,
            FundsType::DiscoverCard => Self::DiscoverCard,
            FundsType::OtherCreditCard => Self::OtherCreditCard,
            FundsType::Cash => Self::Cash,
            FundsType::WireTransfer => Self::WireTransfer,
            FundsType::Other => Self::Other,
        }
    }
}

/// Classifies an application row as seen from one of its sides.
///
/// `counter` is the document kind on the opposite side; `funds` is set on
/// cash-receipt rows only.
#[must_use]
pub fn classify(
    side: ApplicationSide,
    counter: CounterDocKind,
    funds: Option<FundsType>,
) -> ApplicationLabel {
    match side {
        // Debit-side view: the counter document paid us.
        ApplicationSide::Target => match counter {
            CounterDocKind::CreditMemo => ApplicationLabel::CreditMemo,
            CounterDocKind::CustomerDeposit => ApplicationLabel::CashDeposit,
            CounterDocKind::CashReceipt => {
                funds.map_or(ApplicationLabel::Other, ApplicationLabel::from)
            }
            CounterDocKind::Invoice
            | CounterDocKind::DebitMemo
            | CounterDocKind::ApCheck
            | CounterDocKind::Other => ApplicationLabel::Other,
        },
        // Credit-side view: we were applied to the counter document.
        ApplicationSide::Source => match counter {
            CounterDocKind::Invoice => ApplicationLabel::Invoice,
            CounterDocKind::DebitMemo => ApplicationLabel::DebitMemo,
            CounterDocKind::ApCheck => ApplicationLabel::ApCheck,
            CounterDocKind::CreditMemo
            | CounterDocKind::CustomerDeposit
            | CounterDocKind::CashReceipt
            | CounterDocKind::Other => ApplicationLabel::Other,
        },
    }
}

/// Picks the document number to display for an application row.
///
/// Debit-side rows show the source document's number for memo/deposit
/// matches and the receipt reference for cash receipts; credit-side rows
/// always show the target document's number.
#[must_use]
pub fn display_number(
    side: ApplicationSide,
    counter: CounterDocKind,
    counter_number: &str,
    ref_number: Option<&str>,
) -> String {
    match side {
        ApplicationSide::Target => match counter {
            CounterDocKind::CreditMemo | CounterDocKind::CustomerDeposit => {
                counter_number.to_string()
            }
            CounterDocKind::CashReceipt => ref_number.unwrap_or_default().to_string(),
            _ => ApplicationLabel::Other.as_str().to_string(),
        },
        ApplicationSide::Source => counter_number.to_string(),
    }
}

/// A classified payment-application row, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationEntry {
    /// Row id.
    pub id: ApplicationId,
    /// Open item on the counter side, when it is an open item.
    pub counter_open_item_id: Option<OpenItemId>,
    /// Classification label.
    pub label: ApplicationLabel,
    /// Displayed document number.
    pub doc_number: String,
    /// Application post date.
    pub post_date: NaiveDate,
    /// Distribution date; shown on the debit-side view only.
    pub dist_date: Option<NaiveDate>,
    /// Applied amount in the application currency.
    pub applied: Money,
    /// Applied amount converted to the reporting currency.
    pub base_applied: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_from_doc_type() {
        assert_eq!(
            DocumentType::Invoice.application_side(),
            ApplicationSide::Target
        );
        assert_eq!(
            DocumentType::DebitMemo.application_side(),
            ApplicationSide::Target
        );
        assert_eq!(
            DocumentType::CreditMemo.application_side(),
            ApplicationSide::Source
        );
        assert_eq!(
            DocumentType::CustomerDeposit.application_side(),
            ApplicationSide::Source
        );
    }

    #[test]
    fn test_debit_side_counter_documents() {
        assert_eq!(
            classify(ApplicationSide::Target, CounterDocKind::CreditMemo, None),
            ApplicationLabel::CreditMemo
        );
        assert_eq!(
            classify(
                ApplicationSide::Target,
                CounterDocKind::CustomerDeposit,
                None
            ),
            ApplicationLabel::CashDeposit
        );
    }

    #[test]
    fn test_debit_side_funds_types() {
        let cases = [
            (FundsType::Check, ApplicationLabel::Check),
            (FundsType::CertifiedCheck, ApplicationLabel::CertifiedCheck),
            (FundsType::MasterCard, ApplicationLabel::MasterCard),
            (FundsType::Visa, ApplicationLabel::Visa),
            (FundsType::AmericanExpress, ApplicationLabel::AmericanExpress),
            (FundsType::DiscoverCard, ApplicationLabel::DiscoverCard),
            (FundsType::OtherCreditCard, ApplicationLabel::OtherCreditCard),
            (FundsType::Cash, ApplicationLabel::Cash),
            (FundsType::WireTransfer, ApplicationLabel::WireTransfer),
            (FundsType::Other, ApplicationLabel::Other),
        ];
        for (funds, expected) in cases {
            assert_eq!(
                classify(
                    ApplicationSide::Target,
                    CounterDocKind::CashReceipt,
                    Some(funds)
                ),
                expected
            );
        }
    }

    #[test]
    fn test_credit_side_counter_documents() {
        assert_eq!(
            classify(ApplicationSide::Source, CounterDocKind::Invoice, None),
            ApplicationLabel::Invoice
        );
        assert_eq!(
            classify(ApplicationSide::Source, CounterDocKind::DebitMemo, None),
            ApplicationLabel::DebitMemo
        );
        assert_eq!(
            classify(ApplicationSide::Source, CounterDocKind::ApCheck, None),
            ApplicationLabel::ApCheck
        );
    }

    #[test]
    fn test_unmapped_is_other() {
        assert_eq!(
            classify(ApplicationSide::Target, CounterDocKind::CashReceipt, None),
            ApplicationLabel::Other
        );
        assert_eq!(
            classify(ApplicationSide::Target, CounterDocKind::Other, None),
            ApplicationLabel::Other
        );
        assert_eq!(
            classify(ApplicationSide::Source, CounterDocKind::CashReceipt, None),
            ApplicationLabel::Other
        );
    }

    #[test]
    fn test_display_number_selection() {
        assert_eq!(
            display_number(
                ApplicationSide::Target,
                CounterDocKind::CreditMemo,
                "CM-0042",
                None
            ),
            "CM-0042"
        );
        assert_eq!(
            display_number(
                ApplicationSide::Target,
                CounterDocKind::CashReceipt,
                "unused",
                Some("RCPT-9")
            ),
            "RCPT-9"
        );
        assert_eq!(
            display_number(ApplicationSide::Target, CounterDocKind::Other, "x", None),
            "Other"
        );
        assert_eq!(
            display_number(
                ApplicationSide::Source,
                CounterDocKind::Invoice,
                "INV-100",
                None
            ),
            "INV-100"
        );
    }

    #[test]
    fn test_label_text() {
        assert_eq!(ApplicationLabel::ApCheck.to_string(), "A/P Check");
        assert_eq!(ApplicationLabel::CashDeposit.to_string(), "Cash Deposit");
        assert_eq!(
            ApplicationLabel::AmericanExpress.to_string(),
            "American Express"
        );
    }
}

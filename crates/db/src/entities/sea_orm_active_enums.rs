//! String-backed enumerations stored in the database.
//!
//! The wire values are snake_case strings rather than the single-letter
//! codes of legacy AR schemas; conversions to and from the core enums keep
//! every classification site an exhaustive match.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use arvo_core::openitem::{CounterDocKind, DocumentType as CoreDocumentType, FundsType as CoreFundsType};

/// Open item document type.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum DocType {
    /// Misc. credit memo.
    #[sea_orm(string_value = "credit_memo")]
    CreditMemo,
    /// Misc. debit memo.
    #[sea_orm(string_value = "debit_memo")]
    DebitMemo,
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Customer deposit.
    #[sea_orm(string_value = "customer_deposit")]
    CustomerDeposit,
}

impl From<CoreDocumentType> for DocType {
    fn from(doc_type: CoreDocumentType) -> Self {
        match doc_type {
            CoreDocumentType::CreditMemo => Self::CreditMemo,
            CoreDocumentType::DebitMemo => Self::DebitMemo,
            CoreDocumentType::Invoice => Self::Invoice,
            CoreDocumentType::CustomerDeposit => Self::CustomerDeposit,
        }
    }
}

impl From<DocType> for CoreDocumentType {
    fn from(doc_type: DocType) -> Self {
        match doc_type {
            DocType::CreditMemo => Self::CreditMemo,
            DocType::DebitMemo => Self::DebitMemo,
            DocType::Invoice => Self::Invoice,
            DocType::CustomerDeposit => Self::CustomerDeposit,
        }
    }
}

/// Document kind recorded on either side of an application row.
///
/// Wider than [`DocType`]: cash receipts and A/P checks apply against
/// receivables without being open items themselves.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum ApplyDocType {
    /// Credit memo.
    #[sea_orm(string_value = "credit_memo")]
    CreditMemo,
    /// Customer deposit.
    #[sea_orm(string_value = "customer_deposit")]
    CustomerDeposit,
    /// Cash receipt.
    #[sea_orm(string_value = "cash_receipt")]
    CashReceipt,
    /// Sales invoice.
    #[sea_orm(string_value = "invoice")]
    Invoice,
    /// Debit memo.
    #[sea_orm(string_value = "debit_memo")]
    DebitMemo,
    /// A/P check.
    #[sea_orm(string_value = "ap_check")]
    ApCheck,
    /// Unrecognized kind.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<ApplyDocType> for CounterDocKind {
    fn from(doc_type: ApplyDocType) -> Self {
        match doc_type {
            ApplyDocType::CreditMemo => Self::CreditMemo,
            ApplyDocType::CustomerDeposit => Self::CustomerDeposit,
            ApplyDocType::CashReceipt => Self::CashReceipt,
            ApplyDocType::Invoice => Self::Invoice,
            ApplyDocType::DebitMemo => Self::DebitMemo,
            ApplyDocType::ApCheck => Self::ApCheck,
            ApplyDocType::Other => Self::Other,
        }
    }
}

/// Funds type recorded on cash-receipt applications.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum FundsType {
    /// Personal or company check.
    #[sea_orm(string_value = "check")]
    Check,
    /// Certified check.
    #[sea_orm(string_value = "certified_check")]
    CertifiedCheck,
    /// MasterCard.
    #[sea_orm(string_value = "master_card")]
    MasterCard,
    /// Visa.
    #[sea_orm(string_value = "visa")]
    Visa,
    /// American Express.
    #[sea_orm(string_value = "american_express")]
    AmericanExpress,
    /// Discover Card.
    #[sea_orm(string_value = "discover_card")]
    DiscoverCard,
    /// Any other credit card.
    #[sea_orm(string_value = "other_credit_card")]
    OtherCreditCard,
    /// Cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Wire transfer.
    #[sea_orm(string_value = "wire_transfer")]
    WireTransfer,
    /// Other funds.
    #[sea_orm(string_value = "other")]
    Other,
}

impl From<FundsType> for CoreFundsType {
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

//! AR open item documents and posting rules.
//!
//! This module implements the document side of the receivables ledger:
//! - Document, mode, and routing enumerations
//! - The staged draft and the read-back view of an open item
//! - Ordered pre-save validation
//! - Payment-application classification
//! - Pure posting rules (editability, rebalance confirmation, due-date fill)

pub mod application;
pub mod error;
pub mod service;
pub mod types;
pub mod validation;

#[cfg(test)]
mod validation_props;

pub use application::{
    ApplicationEntry, ApplicationLabel, ApplicationSide, CounterDocKind, FundsType,
};
pub use error::OpenItemError;
pub use service::{OpenItemService, TaxDetailContext, TaxDisplayType, TaxOrderKind};
pub use types::{DocumentType, EntryMode, Field, MemoKind, OpenItemDraft, OpenItemView, PrepaidRouting};
pub use validation::{validate_new_draft, ValidationError, ValidationErrorKind};

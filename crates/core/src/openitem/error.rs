//! Open item error types.

use thiserror::Error;

use super::types::{DocumentType, EntryMode, Field};
use super::validation::ValidationError;

/// Errors raised by the open item posting rules.
#[derive(Debug, Error)]
pub enum OpenItemError {
    /// A field was edited that the current mode keeps read-only.
    #[error("the {0} field is read-only in {1} mode")]
    FieldReadOnly(Field, EntryMode),

    /// Saving was attempted in view mode.
    #[error("documents cannot be saved in view mode")]
    ReadOnlyMode,

    /// Only misc. credit and debit memos can be created through this workflow.
    #[error("{0} documents cannot be created here")]
    NotCreatable(DocumentType),

    /// Tax detail requires the document and due dates first.
    #[error("document and due dates must be entered before tax amounts can be set")]
    TaxDetailNeedsDates,

    /// Pre-save validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = OpenItemError::FieldReadOnly(Field::Customer, EntryMode::Edit);
        assert_eq!(err.to_string(), "the customer field is read-only in edit mode");

        let err = OpenItemError::NotCreatable(DocumentType::Invoice);
        assert_eq!(err.to_string(), "Invoice documents cannot be created here");
    }
}

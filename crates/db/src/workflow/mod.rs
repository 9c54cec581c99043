//! The open item posting workflow.
//!
//! This module drives the entry/posting state machine: parameter-bag
//! initialization, mode gating, the staged draft, the atomic save, the tax
//! sub-dialog round-trip, and close/cancel cleanup. External collaborators
//! (numbering, due dates, error code text, reports, tax entry, currency
//! conversion) are seams defined in [`services`].

pub mod posting;
pub mod services;

pub use posting::{
    CloseOutcome, PostingWorkflow, SaveOutcome, WorkflowError, WorkflowParams, WorkflowServices,
};
pub use services::{
    DueDateCalculator, DueDateError, ErrorCodeLookup, LogOnlyReports, NumberingAuthority,
    NumberingError, ReportError, ReportGenerator, ReportParams, StaticErrorCodes, TaxDetailEditor,
    TaxEditError, OPEN_ITEM_REPORT,
};

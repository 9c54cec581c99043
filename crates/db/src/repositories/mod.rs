//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding
//! the `SeaORM` implementation details from the rest of the application.
//! Write operations take the caller's transaction so the posting workflow
//! owns the unit of work.

pub mod application;
pub mod customer;
pub mod number;
pub mod open_item;
pub mod tax;
pub mod terms;

pub use application::{ApplicationError, ApplicationRepository};
pub use customer::{CustomerDefaults, CustomerError, CustomerRepository};
pub use number::{MemoNumberRepository, NumberError};
pub use open_item::{
    CreateMemoInput, OpenItemRepoError, OpenItemRepository, UpdateOpenItemInput,
    CREATE_CREDIT_MEMO, CREATE_DEBIT_MEMO,
};
pub use tax::{ProvisionalParentInput, TaxError, TaxLineInput, TaxLineRepository};
pub use terms::{TermsError, TermsRepository};

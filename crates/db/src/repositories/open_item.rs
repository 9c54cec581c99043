//! Open item creation, update, and read-back.
//!
//! Creation comes in two document-type-specific variants mirroring the
//! server-side routines of the legacy schema. Both validate inside the
//! caller's transaction and report rejections as negative result codes keyed
//! by the routine name; on success they return the assigned row id directly.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, Set,
};
use tracing::debug;

use arvo_core::openitem::{DocumentType, OpenItemView, PrepaidRouting};
use arvo_shared::types::{
    Currency, CustomerId, GlAccountId, Money, OpenItemId, ReasonCodeId, SalesCategoryId,
    SalesRepId, TermsId,
};

use crate::entities::{credit_memo_headers, customers, open_items, sea_orm_active_enums::DocType};
use crate::repositories::tax::sum_tax;

/// Routine name reported on credit memo creation rejections.
pub const CREATE_CREDIT_MEMO: &str = "create_ar_credit_memo";
/// Routine name reported on debit memo creation rejections.
pub const CREATE_DEBIT_MEMO: &str = "create_ar_debit_memo";

/// Result code: the customer does not exist.
pub const RESULT_UNKNOWN_CUSTOMER: i32 = -1;
/// Result code: the customer exists but is inactive.
pub const RESULT_INACTIVE_CUSTOMER: i32 = -2;
/// Result code: a posted document already carries this number.
pub const RESULT_DUPLICATE_NUMBER: i32 = -3;

/// Error types for open item operations.
#[derive(Debug, thiserror::Error)]
pub enum OpenItemRepoError {
    /// Open item not found.
    #[error("Open item not found: {0}")]
    NotFound(i64),

    /// A creation routine rejected the request.
    #[error("{routine} returned result code {code}")]
    Rejected {
        /// The routine that produced the code.
        routine: &'static str,
        /// The negative result code.
        code: i32,
    },

    /// The stored currency code is not one the system knows.
    #[error("invalid currency code stored on open item {id}: {code}")]
    InvalidCurrency {
        /// Open item row id.
        id: i64,
        /// The offending code.
        code: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for the type-specific creation routines.
#[derive(Debug, Clone)]
pub struct CreateMemoInput {
    /// Pre-reserved id from a provisional tax parent, when one exists.
    /// Creation supersedes that placeholder row instead of inserting anew.
    pub reserved_id: Option<i64>,
    /// Owning customer.
    pub customer_id: CustomerId,
    /// Reserved document number.
    pub doc_number: String,
    /// Originating order number.
    pub order_number: Option<String>,
    /// Document date.
    pub doc_date: chrono::NaiveDate,
    /// Due date.
    pub due_date: chrono::NaiveDate,
    /// Signed document amount.
    pub amount: Decimal,
    /// Document currency.
    pub currency: Currency,
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
    pub notes: Option<String>,
}

/// Header fields an Edit-mode save may change.
#[derive(Debug, Clone)]
pub struct UpdateOpenItemInput {
    /// Due date.
    pub due_date: chrono::NaiveDate,
    /// Billing terms.
    pub terms_id: Option<TermsId>,
    /// Sales representative.
    pub sales_rep_id: Option<SalesRepId>,
    /// Signed document amount.
    pub amount: Decimal,
    /// Commission due, in base currency.
    pub commission_due: Decimal,
    /// Reason code.
    pub reason_code_id: Option<ReasonCodeId>,
    /// Document currency.
    pub currency: Currency,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Repository for open item CRUD operations.
#[derive(Debug, Clone)]
pub struct OpenItemRepository {
    db: DatabaseConnection,
}

impl OpenItemRepository {
    /// Creates a new open item repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a misc. credit memo inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with a negative result code when server-side
    /// validation fails, or a database error.
    pub async fn create_credit_memo(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateMemoInput,
    ) -> Result<OpenItemId, OpenItemRepoError> {
        self.create_memo(txn, DocType::CreditMemo, CREATE_CREDIT_MEMO, input)
            .await
    }

    /// Creates a misc. debit memo inside the caller's transaction.
    ///
    /// # Errors
    ///
    /// Returns `Rejected` with a negative result code when server-side
    /// validation fails, or a database error.
    pub async fn create_debit_memo(
        &self,
        txn: &DatabaseTransaction,
        input: &CreateMemoInput,
    ) -> Result<OpenItemId, OpenItemRepoError> {
        self.create_memo(txn, DocType::DebitMemo, CREATE_DEBIT_MEMO, input)
            .await
    }

    async fn create_memo(
        &self,
        txn: &DatabaseTransaction,
        doc_type: DocType,
        routine: &'static str,
        input: &CreateMemoInput,
    ) -> Result<OpenItemId, OpenItemRepoError> {
        let customer = customers::Entity::find_by_id(input.customer_id.into_inner())
            .one(txn)
            .await?
            .ok_or(OpenItemRepoError::Rejected {
                routine,
                code: RESULT_UNKNOWN_CUSTOMER,
            })?;
        if !customer.active {
            return Err(OpenItemRepoError::Rejected {
                routine,
                code: RESULT_INACTIVE_CUSTOMER,
            });
        }

        let duplicates = open_items::Entity::find()
            .filter(open_items::Column::DocType.eq(doc_type.clone()))
            .filter(open_items::Column::DocNumber.eq(&input.doc_number))
            .filter(open_items::Column::Posted.eq(true))
            .count(txn)
            .await?;
        if duplicates > 0 {
            return Err(OpenItemRepoError::Rejected {
                routine,
                code: RESULT_DUPLICATE_NUMBER,
            });
        }

        let (sales_category_id, gl_account_id) = split_routing(input.prepaid);
        let now = Utc::now().into();
        let mut row = open_items::ActiveModel {
            customer_id: Set(Some(input.customer_id.into_inner())),
            doc_type: Set(doc_type),
            doc_number: Set(input.doc_number.clone()),
            order_number: Set(input.order_number.clone()),
            journal_number: Set(None),
            doc_date: Set(input.doc_date),
            due_date: Set(input.due_date),
            amount: Set(input.amount),
            paid: Set(Decimal::ZERO),
            currency: Set(input.currency.abbr().to_string()),
            commission_due: Set(input.commission_due),
            terms_id: Set(input.terms_id.map(TermsId::into_inner)),
            sales_rep_id: Set(input.sales_rep_id.map(SalesRepId::into_inner)),
            reason_code_id: Set(input.reason_code_id.map(ReasonCodeId::into_inner)),
            sales_category_id: Set(sales_category_id),
            gl_account_id: Set(gl_account_id),
            notes: Set(input.notes.clone()),
            posted: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let id = if let Some(reserved) = input.reserved_id {
            // Supersede the provisional placeholder; never duplicate it.
            row.id = Set(reserved);
            open_items::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(open_items::Column::Id)
                        .update_columns([
                            open_items::Column::CustomerId,
                            open_items::Column::DocType,
                            open_items::Column::DocNumber,
                            open_items::Column::OrderNumber,
                            open_items::Column::DocDate,
                            open_items::Column::DueDate,
                            open_items::Column::Amount,
                            open_items::Column::Currency,
                            open_items::Column::CommissionDue,
                            open_items::Column::TermsId,
                            open_items::Column::SalesRepId,
                            open_items::Column::ReasonCodeId,
                            open_items::Column::SalesCategoryId,
                            open_items::Column::GlAccountId,
                            open_items::Column::Notes,
                            open_items::Column::Posted,
                            open_items::Column::UpdatedAt,
                        ])
                        .to_owned(),
                )
                .exec(txn)
                .await?
                .last_insert_id
        } else {
            open_items::Entity::insert(row).exec(txn).await?.last_insert_id
        };

        debug!(id, doc_number = %input.doc_number, routine, "Created open item");
        Ok(OpenItemId::from_raw(id))
    }

    /// Updates the editable header fields of an existing document.
    ///
    /// No server-side validation runs here; callers validate first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the row does not exist, or a database error.
    pub async fn update(
        &self,
        txn: &DatabaseTransaction,
        id: OpenItemId,
        input: &UpdateOpenItemInput,
    ) -> Result<(), OpenItemRepoError> {
        let item = open_items::Entity::find_by_id(id.into_inner())
            .one(txn)
            .await?
            .ok_or(OpenItemRepoError::NotFound(id.into_inner()))?;

        let mut row: open_items::ActiveModel = item.into();
        row.due_date = Set(input.due_date);
        row.terms_id = Set(input.terms_id.map(TermsId::into_inner));
        row.sales_rep_id = Set(input.sales_rep_id.map(SalesRepId::into_inner));
        row.amount = Set(input.amount);
        row.commission_due = Set(input.commission_due);
        row.reason_code_id = Set(input.reason_code_id.map(ReasonCodeId::into_inner));
        row.currency = Set(input.currency.abbr().to_string());
        row.notes = Set(input.notes.clone());
        row.updated_at = Set(Utc::now().into());
        sea_orm::ActiveModelTrait::update(row, txn).await?;

        debug!(id = id.into_inner(), "Updated open item header");
        Ok(())
    }

    /// Reads one document joined with its tax total and display flags.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the row does not exist, or a database error.
    pub async fn read(&self, id: OpenItemId) -> Result<OpenItemView, OpenItemRepoError> {
        self.read_with(&self.db, id).await
    }

    /// `read`, but against the caller's connection or transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when the row does not exist, or a database error.
    pub async fn read_with<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: OpenItemId,
    ) -> Result<OpenItemView, OpenItemRepoError> {
        let item = open_items::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .ok_or(OpenItemRepoError::NotFound(id.into_inner()))?;

        let tax_total = sum_tax(conn, item.id).await?;
        let shows_tax = match item.doc_type {
            DocType::DebitMemo => true,
            DocType::CreditMemo => {
                // Tax is hidden when the memo originated in the sales module.
                let headers = credit_memo_headers::Entity::find()
                    .filter(credit_memo_headers::Column::Number.eq(&item.doc_number))
                    .count(conn)
                    .await?;
                headers == 0
            }
            DocType::Invoice | DocType::CustomerDeposit => false,
        };

        let currency =
            Currency::from_str(&item.currency).map_err(|_| OpenItemRepoError::InvalidCurrency {
                id: item.id,
                code: item.currency.clone(),
            })?;

        let prepaid = match (item.sales_category_id, item.gl_account_id) {
            (Some(category), _) => PrepaidRouting::SalesCategory(SalesCategoryId::from_raw(category)),
            (None, Some(account)) => PrepaidRouting::Account(GlAccountId::from_raw(account)),
            (None, None) => PrepaidRouting::None,
        };

        Ok(OpenItemView {
            id: OpenItemId::from_raw(item.id),
            customer_id: item.customer_id.map(CustomerId::from_raw),
            doc_type: DocumentType::from(item.doc_type),
            doc_number: item.doc_number,
            order_number: item.order_number,
            journal_number: item.journal_number,
            doc_date: item.doc_date,
            due_date: item.due_date,
            amount: Money::new(item.amount, currency),
            paid: Money::new(item.paid, currency),
            tax_total,
            commission_due: item.commission_due,
            terms_id: item.terms_id.map(TermsId::from_raw),
            sales_rep_id: item.sales_rep_id.map(SalesRepId::from_raw),
            reason_code_id: item.reason_code_id.map(ReasonCodeId::from_raw),
            prepaid,
            notes: item.notes.unwrap_or_default(),
            shows_tax,
            posted: item.posted,
        })
    }

    /// Best-effort removal of an orphaned provisional placeholder.
    ///
    /// Only rows still marked unposted are touched.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn delete_placeholder(&self, id: OpenItemId) -> Result<bool, OpenItemRepoError> {
        let result = open_items::Entity::delete_many()
            .filter(open_items::Column::Id.eq(id.into_inner()))
            .filter(open_items::Column::Posted.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected == 1)
    }
}

const fn split_routing(prepaid: PrepaidRouting) -> (Option<i64>, Option<i64>) {
    match prepaid {
        PrepaidRouting::None => (None, None),
        PrepaidRouting::SalesCategory(id) => (Some(id.into_inner()), None),
        PrepaidRouting::Account(id) => (None, Some(id.into_inner())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvo_shared::types::{GlAccountId, SalesCategoryId};

    #[test]
    fn test_split_routing() {
        assert_eq!(split_routing(PrepaidRouting::None), (None, None));
        assert_eq!(
            split_routing(PrepaidRouting::SalesCategory(SalesCategoryId::from_raw(5))),
            (Some(5), None)
        );
        assert_eq!(
            split_routing(PrepaidRouting::Account(GlAccountId::from_raw(9))),
            (None, Some(9))
        );
    }

    #[test]
    fn test_result_codes_are_negative() {
        assert!(RESULT_UNKNOWN_CUSTOMER < 0);
        assert!(RESULT_INACTIVE_CUSTOMER < 0);
        assert!(RESULT_DUPLICATE_NUMBER < 0);
    }
}

//! Tax sub-ledger access.
//!
//! Tax lines are written by the external tax sub-dialog and summed back into
//! the displayed tax total. When tax entry happens before the main save, a
//! provisional parent row is reserved from the open item sequence so the
//! lines have a valid foreign key; the later create supersedes it.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult,
    QueryFilter, QuerySelect, Set, Statement, TransactionTrait,
};
use tracing::debug;

use arvo_core::openitem::DocumentType;
use arvo_shared::types::{Currency, OpenItemId};

use crate::entities::{open_items, sea_orm_active_enums::DocType, tax_lines};

/// Error types for tax sub-ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum TaxError {
    /// The open item id sequence did not yield a value.
    #[error("the open item sequence is unavailable")]
    SequenceUnavailable,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// One tax line as entered by the sub-dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxLineInput {
    /// Tax code the line was computed under.
    pub tax_code: String,
    /// Tax amount in the document currency.
    pub tax: Decimal,
}

/// Minimal fields a provisional parent row needs to satisfy the tax FK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalParentInput {
    /// Document classification.
    pub doc_type: DocumentType,
    /// Reserved document number.
    pub doc_number: String,
    /// Document date.
    pub doc_date: NaiveDate,
    /// Due date.
    pub due_date: NaiveDate,
    /// Document currency.
    pub currency: Currency,
}

/// Sums the tax lines attached to an open item; zero when none exist.
///
/// # Errors
///
/// Returns a database error.
pub async fn sum_tax<C: ConnectionTrait>(conn: &C, open_item_id: i64) -> Result<Decimal, DbErr> {
    #[derive(FromQueryResult)]
    struct TaxSum {
        total: Option<Decimal>,
    }

    let sum = tax_lines::Entity::find()
        .select_only()
        .column_as(tax_lines::Column::Tax.sum(), "total")
        .filter(tax_lines::Column::OpenItemId.eq(open_item_id))
        .into_model::<TaxSum>()
        .one(conn)
        .await?
        .and_then(|row| row.total)
        .unwrap_or(Decimal::ZERO);

    Ok(sum)
}

/// Repository for tax sub-ledger operations.
#[derive(Debug, Clone)]
pub struct TaxLineRepository {
    db: DatabaseConnection,
}

impl TaxLineRepository {
    /// Creates a new tax line repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sums the tax lines attached to an open item.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn sum(&self, open_item_id: OpenItemId) -> Result<Decimal, TaxError> {
        Ok(sum_tax(&self.db, open_item_id.into_inner()).await?)
    }

    /// Reserves an id from the open item sequence and inserts a zero-amount
    /// placeholder row for tax lines to attach to.
    ///
    /// The placeholder is provisional: the later create supersedes it, and
    /// cancel deletes it best-effort.
    ///
    /// # Errors
    ///
    /// Returns an error when the sequence yields nothing or on database
    /// failure.
    pub async fn ensure_provisional_parent(
        &self,
        input: &ProvisionalParentInput,
    ) -> Result<OpenItemId, TaxError> {
        let row = self
            .db
            .query_one(Statement::from_string(
                DbBackend::Postgres,
                "SELECT nextval(pg_get_serial_sequence('open_items', 'id')) AS id",
            ))
            .await?
            .ok_or(TaxError::SequenceUnavailable)?;
        let id: i64 = row.try_get("", "id")?;

        let now = Utc::now().into();
        let placeholder = open_items::ActiveModel {
            id: Set(id),
            customer_id: Set(None),
            doc_type: Set(DocType::from(input.doc_type)),
            doc_number: Set(input.doc_number.clone()),
            order_number: Set(None),
            journal_number: Set(None),
            doc_date: Set(input.doc_date),
            due_date: Set(input.due_date),
            amount: Set(Decimal::ZERO),
            paid: Set(Decimal::ZERO),
            currency: Set(input.currency.abbr().to_string()),
            commission_due: Set(Decimal::ZERO),
            terms_id: Set(None),
            sales_rep_id: Set(None),
            reason_code_id: Set(None),
            sales_category_id: Set(None),
            gl_account_id: Set(None),
            notes: Set(None),
            posted: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        open_items::Entity::insert(placeholder)
            .exec_without_returning(&self.db)
            .await?;

        debug!(id, doc_number = %input.doc_number, "Inserted provisional tax parent");
        Ok(OpenItemId::from_raw(id))
    }

    /// Replaces the tax lines attached to a document with a new set.
    ///
    /// # Errors
    ///
    /// Returns a database error.
    pub async fn replace_lines(
        &self,
        open_item_id: OpenItemId,
        lines: &[TaxLineInput],
    ) -> Result<(), TaxError> {
        let txn = self.db.begin().await?;

        tax_lines::Entity::delete_many()
            .filter(tax_lines::Column::OpenItemId.eq(open_item_id.into_inner()))
            .exec(&txn)
            .await?;

        if !lines.is_empty() {
            let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
            let rows = lines.iter().map(|line| tax_lines::ActiveModel {
                open_item_id: Set(open_item_id.into_inner()),
                tax_code: Set(line.tax_code.clone()),
                tax: Set(line.tax),
                created_at: Set(now),
                ..Default::default()
            });
            tax_lines::Entity::insert_many(rows)
                .exec_without_returning(&txn)
                .await?;
        }

        txn.commit().await?;
        debug!(
            open_item_id = open_item_id.into_inner(),
            count = lines.len(),
            "Replaced tax lines"
        );
        Ok(())
    }
}

//! Memo number reservation and release.
//!
//! Numbers come from a per-kind counter row, but released numbers are pooled
//! and handed out again first, so cancelled sessions do not burn numbers.
//! Reservation is transactional; two sessions can never receive the same
//! number.

use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set, Statement, TransactionTrait,
};
use tracing::debug;

use arvo_core::openitem::MemoKind;
use arvo_shared::config::NumberingConfig;

use crate::entities::{memo_sequences, released_memo_numbers};

/// Error types for memo number operations.
#[derive(Debug, thiserror::Error)]
pub enum NumberError {
    /// No sequence row exists for the memo kind.
    #[error("no memo sequence configured for kind {0:?}")]
    UnknownKind(MemoKind),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository backing the memo numbering authority.
#[derive(Debug, Clone)]
pub struct MemoNumberRepository {
    db: DatabaseConnection,
    numbering: NumberingConfig,
}

impl MemoNumberRepository {
    /// Creates a new memo number repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection, numbering: NumberingConfig) -> Self {
        Self { db, numbering }
    }

    /// Reserves a fresh formatted memo number for the given kind.
    ///
    /// Drains the released pool before advancing the counter. The whole
    /// reservation runs in one transaction so concurrent sessions never
    /// share a number.
    ///
    /// # Errors
    ///
    /// Returns an error if no sequence exists for the kind or the database
    /// operation fails.
    pub async fn reserve(&self, kind: MemoKind) -> Result<String, NumberError> {
        let txn = self.db.begin().await?;

        // Reuse the lowest released number first.
        if let Some(pooled) = released_memo_numbers::Entity::find()
            .filter(released_memo_numbers::Column::Kind.eq(kind.sequence_key()))
            .order_by_asc(released_memo_numbers::Column::Number)
            .one(&txn)
            .await?
        {
            let number = pooled.number.clone();
            let deleted = pooled.delete(&txn).await?;
            // A concurrent session may have taken it; fall through if so.
            if deleted.rows_affected == 1 {
                txn.commit().await?;
                debug!(kind = ?kind, number = %number, "Reserved released memo number");
                return Ok(number);
            }
        }

        // Advance the counter atomically and take the pre-increment value.
        let row = txn
            .query_one(Statement::from_sql_and_values(
                DbBackend::Postgres,
                "UPDATE memo_sequences SET next_value = next_value + 1 \
                 WHERE kind = $1 RETURNING next_value - 1 AS reserved",
                [kind.sequence_key().into()],
            ))
            .await?
            .ok_or(NumberError::UnknownKind(kind))?;
        let reserved: i64 = row.try_get("", "reserved")?;
        txn.commit().await?;

        let number = self.format(kind, reserved);
        debug!(kind = ?kind, number = %number, "Reserved memo number");
        Ok(number)
    }

    /// Returns an unused number to the pool.
    ///
    /// Idempotent: releasing the same number twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn release(&self, kind: MemoKind, number: &str) -> Result<(), NumberError> {
        let row = released_memo_numbers::ActiveModel {
            kind: Set(kind.sequence_key().to_string()),
            number: Set(number.to_string()),
        };
        released_memo_numbers::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([
                    released_memo_numbers::Column::Kind,
                    released_memo_numbers::Column::Number,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        debug!(kind = ?kind, number = %number, "Released memo number");
        Ok(())
    }

    /// Resets a kind's counter; used by seeding and tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn set_counter(&self, kind: MemoKind, next_value: i64) -> Result<(), NumberError> {
        memo_sequences::Entity::insert(memo_sequences::ActiveModel {
            kind: Set(kind.sequence_key().to_string()),
            next_value: Set(next_value),
        })
        .on_conflict(
            OnConflict::column(memo_sequences::Column::Kind)
                .update_column(memo_sequences::Column::NextValue)
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await?;
        Ok(())
    }

    fn format(&self, kind: MemoKind, value: i64) -> String {
        let prefix = match kind {
            MemoKind::Credit => &self.numbering.credit_memo_prefix,
            MemoKind::Debit => &self.numbering.debit_memo_prefix,
        };
        format!("{prefix}-{value:0width$}", width = self.numbering.pad_width)
    }
}

//! Billing terms lookups and due-date derivation.

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use arvo_core::terms::{Terms, TermsBasis};
use arvo_shared::types::TermsId;

use crate::entities::terms;

/// Error types for terms lookups.
#[derive(Debug, thiserror::Error)]
pub enum TermsError {
    /// The stored basis string is not one the system knows.
    #[error("unknown terms basis stored on terms {id}: {basis}")]
    UnknownBasis {
        /// Terms row id.
        id: i64,
        /// The offending basis string.
        basis: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository for billing terms.
#[derive(Debug, Clone)]
pub struct TermsRepository {
    db: DatabaseConnection,
}

impl TermsRepository {
    /// Creates a new terms repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches a terms record, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or an unrecognized stored basis.
    pub async fn get(&self, terms_id: TermsId) -> Result<Option<Terms>, TermsError> {
        let Some(row) = terms::Entity::find_by_id(terms_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let basis = match row.basis.as_str() {
            "net_days" => TermsBasis::NetDays(row.basis_value.unsigned_abs()),
            "proximo" => TermsBasis::Proximo(row.basis_value.unsigned_abs()),
            other => {
                return Err(TermsError::UnknownBasis {
                    id: row.id,
                    basis: other.to_string(),
                })
            }
        };

        Ok(Some(Terms {
            id: TermsId::from_raw(row.id),
            code: row.code,
            basis,
        }))
    }

    /// Derives the due date for a document under the given terms.
    ///
    /// Returns `None` when the terms record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or an unrecognized stored basis.
    pub async fn due_date(
        &self,
        terms_id: TermsId,
        doc_date: NaiveDate,
    ) -> Result<Option<NaiveDate>, TermsError> {
        Ok(self.get(terms_id).await?.map(|t| t.due_date(doc_date)))
    }
}

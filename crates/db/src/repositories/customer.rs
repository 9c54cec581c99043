//! Customer lookups for New-mode defaults.

use std::str::FromStr;

use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

use arvo_shared::types::{Currency, CustomerId, SalesRepId, TermsId};

use crate::entities::customers;

/// Error types for customer lookups.
#[derive(Debug, thiserror::Error)]
pub enum CustomerError {
    /// The stored currency code is not one the system knows.
    #[error("invalid currency code stored on customer {id}: {code}")]
    InvalidCurrency {
        /// Customer row id.
        id: i64,
        /// The offending code.
        code: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Defaults a new document inherits from its customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDefaults {
    /// Default billing terms.
    pub terms_id: Option<TermsId>,
    /// Default sales representative.
    pub sales_rep_id: Option<SalesRepId>,
    /// Default currency.
    pub currency: Currency,
    /// Whether the customer accepts new postings.
    pub active: bool,
}

/// Repository for customer master lookups.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetches the defaults for a customer, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or an unparseable stored currency.
    pub async fn defaults(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<CustomerDefaults>, CustomerError> {
        let Some(customer) = customers::Entity::find_by_id(customer_id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let currency = Currency::from_str(&customer.currency).map_err(|_| {
            CustomerError::InvalidCurrency {
                id: customer.id,
                code: customer.currency.clone(),
            }
        })?;

        Ok(Some(CustomerDefaults {
            terms_id: customer.terms_id.map(TermsId::from_raw),
            sales_rep_id: customer.sales_rep_id.map(SalesRepId::from_raw),
            currency,
            active: customer.active,
        }))
    }
}

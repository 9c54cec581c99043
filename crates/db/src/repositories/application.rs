//! Payment-application aggregation.
//!
//! Loads the cross-references between one document and the documents it has
//! paid or been paid by, classified for display. Rows are read-only here.

use std::str::FromStr;

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use arvo_core::currency::CurrencyExchange;
use arvo_core::openitem::{
    application::{classify, display_number},
    ApplicationEntry, ApplicationSide, CounterDocKind, DocumentType,
};
use arvo_shared::types::{ApplicationId, Currency, Money, OpenItemId};

use crate::entities::applications;

/// Error types for application loading.
#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    /// The stored currency code is not one the system knows.
    #[error("invalid currency code stored on application {id}: {code}")]
    InvalidCurrency {
        /// Application row id.
        id: i64,
        /// The offending code.
        code: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Repository aggregating payment applications for display.
#[derive(Debug, Clone)]
pub struct ApplicationRepository {
    db: DatabaseConnection,
}

impl ApplicationRepository {
    /// Creates a new application repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Loads the classified applications touching one document, ordered by
    /// post date ascending.
    ///
    /// Debit-side documents (Invoice, DebitMemo) walk rows where they are
    /// the target; credit-side documents (CreditMemo, CustomerDeposit) walk
    /// rows where they are the source.
    ///
    /// # Errors
    ///
    /// Returns an error on database failure or an unparseable stored
    /// currency.
    pub async fn load(
        &self,
        open_item_id: OpenItemId,
        doc_type: DocumentType,
        exchange: &dyn CurrencyExchange,
    ) -> Result<Vec<ApplicationEntry>, ApplicationError> {
        let side = doc_type.application_side();
        let column = match side {
            ApplicationSide::Target => applications::Column::TargetOpenItemId,
            ApplicationSide::Source => applications::Column::SourceOpenItemId,
        };

        let rows = applications::Entity::find()
            .filter(column.eq(open_item_id.into_inner()))
            .order_by_asc(applications::Column::PostDate)
            .all(&self.db)
            .await?;

        rows.into_iter()
            .map(|row| to_entry(side, row, exchange))
            .collect()
    }
}

fn to_entry(
    side: ApplicationSide,
    row: applications::Model,
    exchange: &dyn CurrencyExchange,
) -> Result<ApplicationEntry, ApplicationError> {
    let (counter_doc, counter_number, counter_id) = match side {
        ApplicationSide::Target => (
            row.source_doc_type,
            row.source_doc_number,
            row.source_open_item_id,
        ),
        ApplicationSide::Source => (
            row.target_doc_type,
            row.target_doc_number,
            row.target_open_item_id,
        ),
    };
    let counter = CounterDocKind::from(counter_doc);
    let funds = row.funds_type.map(Into::into);

    let currency =
        Currency::from_str(&row.currency).map_err(|_| ApplicationError::InvalidCurrency {
            id: row.id,
            code: row.currency.clone(),
        })?;
    let base_amount = exchange.to_base(currency, row.applied, row.post_date);

    Ok(ApplicationEntry {
        id: ApplicationId::from_raw(row.id),
        counter_open_item_id: counter_id.map(OpenItemId::from_raw),
        label: classify(side, counter, funds),
        doc_number: display_number(side, counter, &counter_number, row.ref_number.as_deref()),
        post_date: row.post_date,
        // The distribution date is shown on the debit-side view only.
        dist_date: matches!(side, ApplicationSide::Target).then_some(row.dist_date),
        applied: Money::new(row.applied, currency),
        base_applied: Money::new(base_amount, exchange.base_currency()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::sea_orm_active_enums::{ApplyDocType, FundsType};
    use arvo_core::currency::FixedRateTable;
    use arvo_core::openitem::ApplicationLabel;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row(id: i64) -> applications::Model {
        applications::Model {
            id,
            source_open_item_id: Some(100),
            target_open_item_id: Some(200),
            source_doc_type: ApplyDocType::CashReceipt,
            target_doc_type: ApplyDocType::Invoice,
            source_doc_number: "RCPT-1".into(),
            target_doc_number: "INV-1".into(),
            funds_type: Some(FundsType::Visa),
            ref_number: Some("CHK-55".into()),
            applied: dec!(25.00),
            currency: "EUR".into(),
            post_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            dist_date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        }
    }

    #[test]
    fn test_to_entry_debit_side() {
        let exchange = FixedRateTable::new(Currency::Usd).with_rate(Currency::Eur, dec!(1.10));
        let entry = to_entry(ApplicationSide::Target, row(1), &exchange).unwrap();

        assert_eq!(entry.label, ApplicationLabel::Visa);
        assert_eq!(entry.doc_number, "CHK-55");
        assert_eq!(entry.counter_open_item_id, Some(OpenItemId::from_raw(100)));
        assert_eq!(entry.applied.amount, dec!(25.00));
        assert_eq!(entry.applied.currency, Currency::Eur);
        assert_eq!(entry.base_applied.amount, dec!(27.50));
        assert_eq!(entry.base_applied.currency, Currency::Usd);
        assert!(entry.dist_date.is_some());
    }

    #[test]
    fn test_to_entry_credit_side() {
        let exchange = FixedRateTable::new(Currency::Usd);
        let entry = to_entry(ApplicationSide::Source, row(2), &exchange).unwrap();

        assert_eq!(entry.label, ApplicationLabel::Invoice);
        assert_eq!(entry.doc_number, "INV-1");
        assert_eq!(entry.counter_open_item_id, Some(OpenItemId::from_raw(200)));
        assert!(entry.dist_date.is_none());
    }

    #[test]
    fn test_to_entry_bad_currency() {
        let mut bad = row(3);
        bad.currency = "ZZZ".into();
        let exchange = FixedRateTable::new(Currency::Usd);
        assert!(matches!(
            to_entry(ApplicationSide::Target, bad, &exchange),
            Err(ApplicationError::InvalidCurrency { .. })
        ));
    }
}

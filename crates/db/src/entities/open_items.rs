//! `SeaORM` Entity for the open_items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocType;

/// One AR open item document.
///
/// `customer_id` is nullable only so a provisional placeholder row can exist
/// before the real save; every posted row carries a customer.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "open_items")]
pub struct Model {
    /// Sequence key; pre-reservable for provisional parents.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning customer.
    pub customer_id: Option<i64>,
    /// Document classification.
    pub doc_type: DocType,
    /// Document number.
    pub doc_number: String,
    /// Originating order number.
    pub order_number: Option<String>,
    /// Posting journal number.
    pub journal_number: Option<String>,
    /// Document date.
    pub doc_date: Date,
    /// Due date.
    pub due_date: Date,
    /// Signed document amount in the document currency.
    pub amount: Decimal,
    /// Amount applied so far.
    pub paid: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Commission due, in base currency.
    pub commission_due: Decimal,
    /// Billing terms.
    pub terms_id: Option<i64>,
    /// Sales representative.
    pub sales_rep_id: Option<i64>,
    /// Reason code.
    pub reason_code_id: Option<i64>,
    /// Alternate prepaid sales category (mutually exclusive with the account).
    pub sales_category_id: Option<i64>,
    /// Alternate prepaid G/L account (mutually exclusive with the category).
    pub gl_account_id: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// False on provisional placeholder rows.
    pub posted: bool,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
    /// Last update time.
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customers::Entity",
        from = "Column::CustomerId",
        to = "super::customers::Column::Id"
    )]
    Customers,
    #[sea_orm(has_many = "super::tax_lines::Entity")]
    TaxLines,
}

impl Related<super::customers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Customers.def()
    }
}

impl Related<super::tax_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TaxLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

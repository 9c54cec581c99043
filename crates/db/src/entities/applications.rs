//! `SeaORM` Entity for the applications table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{ApplyDocType, FundsType};

/// A payment/credit cross-reference between two AR documents.
///
/// The source pays; the target is paid. Either side may reference a document
/// outside the open item table (cash receipts, A/P checks), in which case
/// the corresponding open item id is null. Rows are written by the cash
/// application modules and are read-only here.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "applications")]
pub struct Model {
    /// Sequence key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Source open item, when the source is an open item.
    pub source_open_item_id: Option<i64>,
    /// Target open item, when the target is an open item.
    pub target_open_item_id: Option<i64>,
    /// Document kind on the source side.
    pub source_doc_type: ApplyDocType,
    /// Document kind on the target side.
    pub target_doc_type: ApplyDocType,
    /// Document number snapshot of the source.
    pub source_doc_number: String,
    /// Document number snapshot of the target.
    pub target_doc_number: String,
    /// Funds type; set on cash-receipt sources only.
    pub funds_type: Option<FundsType>,
    /// Receipt reference number; set on cash-receipt sources only.
    pub ref_number: Option<String>,
    /// Applied amount in the application currency.
    pub applied: Decimal,
    /// ISO 4217 currency code of the application.
    pub currency: String,
    /// Application post date.
    pub post_date: Date,
    /// G/L distribution date.
    pub dist_date: Date,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

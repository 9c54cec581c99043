//! `SeaORM` Entity for the credit_memo_headers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Header of a sales credit memo.
///
/// Only the number matters here: a credit-memo open item whose number has a
/// matching header originated in the sales module and does not show the
/// manual tax total.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "credit_memo_headers")]
pub struct Model {
    /// Sequence key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Credit memo number.
    pub number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

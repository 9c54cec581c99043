//! `SeaORM` Entity for the memo_sequences table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Counter row backing memo number reservation for one memo kind.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "memo_sequences")]
pub struct Model {
    /// Memo kind key (e.g. "ar_credit_memo").
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    /// Next unreserved counter value.
    pub next_value: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for the released_memo_numbers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A reserved memo number returned unused to the pool.
///
/// Reservation drains this pool before advancing the counter, so released
/// numbers are handed out again.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "released_memo_numbers")]
pub struct Model {
    /// Memo kind key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub kind: String,
    /// The formatted document number.
    #[sea_orm(primary_key, auto_increment = false)]
    pub number: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

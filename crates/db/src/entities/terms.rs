//! `SeaORM` Entity for the terms table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A billing terms record.
///
/// `basis` is "net_days" or "proximo"; `basis_value` is the day count or the
/// day of the following month respectively.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "terms")]
pub struct Model {
    /// Sequence key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Short code (e.g. "NET30").
    pub code: String,
    /// Due-date derivation basis.
    pub basis: String,
    /// Day count or proximo day of month.
    pub basis_value: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for the customers table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A customer master record, as far as this workflow needs it.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    /// Sequence key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Customer number.
    pub number: String,
    /// Display name.
    pub name: String,
    /// Default billing terms.
    pub terms_id: Option<i64>,
    /// Default sales representative.
    pub sales_rep_id: Option<i64>,
    /// Default currency (ISO 4217).
    pub currency: String,
    /// Whether new documents may be posted for the customer.
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::open_items::Entity")]
    OpenItems,
}

impl Related<super::open_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpenItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

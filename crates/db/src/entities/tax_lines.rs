//! `SeaORM` Entity for the tax_lines table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One tax sub-ledger line attached to an open item.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tax_lines")]
pub struct Model {
    /// Sequence key.
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Parent open item.
    pub open_item_id: i64,
    /// Tax code the line was computed under.
    pub tax_code: String,
    /// Tax amount in the document currency.
    pub tax: Decimal,
    /// Row creation time.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::open_items::Entity",
        from = "Column::OpenItemId",
        to = "super::open_items::Column::Id"
    )]
    OpenItems,
}

impl Related<super::open_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OpenItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` entity definitions for the AR open item schema.

pub mod applications;
pub mod credit_memo_headers;
pub mod customers;
pub mod memo_sequences;
pub mod open_items;
pub mod released_memo_numbers;
pub mod sea_orm_active_enums;
pub mod tax_lines;
pub mod terms;

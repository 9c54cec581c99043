//! Database layer with `SeaORM` entities, repositories, and the posting workflow.
//!
//! This crate provides:
//! - `SeaORM` entity definitions for the AR open item schema
//! - Repository abstractions for data access
//! - Database migrations
//! - The open item posting workflow (the unit-of-work owner)

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod workflow;

pub use repositories::{
    ApplicationRepository, CustomerRepository, MemoNumberRepository, OpenItemRepository,
    TaxLineRepository, TermsRepository,
};
pub use workflow::{CloseOutcome, PostingWorkflow, SaveOutcome, WorkflowError, WorkflowParams};

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};

use arvo_shared::config::DatabaseConfig;

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Establishes a pooled connection from the application configuration.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect_with(config: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .min_connections(config.min_connections);
    Database::connect(options).await
}

//! Initial AR open item schema.
//!
//! Creates the open item, tax sub-ledger, application, and supporting
//! reference tables, and seeds the memo number sequences.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(SCHEMA_SQL).await?;
        db.execute_unprepared(SEED_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS released_memo_numbers, memo_sequences, applications, \
             tax_lines, credit_memo_headers, open_items, customers, terms CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const SCHEMA_SQL: &str = r"
-- Billing terms driving due-date derivation
CREATE TABLE terms (
    id BIGSERIAL PRIMARY KEY,
    code VARCHAR(16) NOT NULL UNIQUE,
    basis VARCHAR(16) NOT NULL,
    basis_value INTEGER NOT NULL,
    CONSTRAINT chk_terms_basis CHECK (basis IN ('net_days', 'proximo')),
    CONSTRAINT chk_terms_value CHECK (basis_value >= 0)
);

-- Customer master (the slice this workflow needs)
CREATE TABLE customers (
    id BIGSERIAL PRIMARY KEY,
    number VARCHAR(32) NOT NULL UNIQUE,
    name TEXT NOT NULL,
    terms_id BIGINT REFERENCES terms(id),
    sales_rep_id BIGINT,
    currency VARCHAR(3) NOT NULL,
    active BOOLEAN NOT NULL DEFAULT TRUE
);

-- AR open items; customer_id is nullable for provisional placeholder rows
CREATE TABLE open_items (
    id BIGSERIAL PRIMARY KEY,
    customer_id BIGINT REFERENCES customers(id),
    doc_type TEXT NOT NULL,
    doc_number VARCHAR(32) NOT NULL,
    order_number VARCHAR(32),
    journal_number VARCHAR(32),
    doc_date DATE NOT NULL,
    due_date DATE NOT NULL,
    amount NUMERIC(16,2) NOT NULL,
    paid NUMERIC(16,2) NOT NULL DEFAULT 0,
    currency VARCHAR(3) NOT NULL,
    commission_due NUMERIC(16,2) NOT NULL DEFAULT 0,
    terms_id BIGINT REFERENCES terms(id),
    sales_rep_id BIGINT,
    reason_code_id BIGINT,
    sales_category_id BIGINT,
    gl_account_id BIGINT,
    notes TEXT,
    posted BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_open_items_doc_type CHECK
        (doc_type IN ('credit_memo', 'debit_memo', 'invoice', 'customer_deposit')),
    -- the two alternate prepaid routings are mutually exclusive
    CONSTRAINT chk_open_items_prepaid CHECK
        (sales_category_id IS NULL OR gl_account_id IS NULL),
    CONSTRAINT chk_open_items_posted_customer CHECK
        (NOT posted OR customer_id IS NOT NULL)
);

CREATE UNIQUE INDEX idx_open_items_number ON open_items(doc_type, doc_number) WHERE posted;
CREATE INDEX idx_open_items_customer ON open_items(customer_id, doc_date);

-- Sales credit memo headers (number lookup only)
CREATE TABLE credit_memo_headers (
    id BIGSERIAL PRIMARY KEY,
    number VARCHAR(32) NOT NULL UNIQUE
);

-- Tax sub-ledger lines, summed into the displayed tax total
CREATE TABLE tax_lines (
    id BIGSERIAL PRIMARY KEY,
    open_item_id BIGINT NOT NULL REFERENCES open_items(id) ON DELETE CASCADE,
    tax_code VARCHAR(16) NOT NULL,
    tax NUMERIC(16,2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_tax_lines_parent ON tax_lines(open_item_id);

-- Payment applications between documents (read-only for this workflow)
CREATE TABLE applications (
    id BIGSERIAL PRIMARY KEY,
    source_open_item_id BIGINT REFERENCES open_items(id),
    target_open_item_id BIGINT REFERENCES open_items(id),
    source_doc_type TEXT NOT NULL,
    target_doc_type TEXT NOT NULL,
    source_doc_number VARCHAR(32) NOT NULL,
    target_doc_number VARCHAR(32) NOT NULL,
    funds_type TEXT,
    ref_number VARCHAR(32),
    applied NUMERIC(16,2) NOT NULL,
    currency VARCHAR(3) NOT NULL,
    post_date DATE NOT NULL,
    dist_date DATE NOT NULL
);

CREATE INDEX idx_applications_target ON applications(target_open_item_id, post_date);
CREATE INDEX idx_applications_source ON applications(source_open_item_id, post_date);

-- Memo number reservation: one counter per memo kind plus a reuse pool
CREATE TABLE memo_sequences (
    kind VARCHAR(32) PRIMARY KEY,
    next_value BIGINT NOT NULL
);

CREATE TABLE released_memo_numbers (
    kind VARCHAR(32) NOT NULL,
    number VARCHAR(32) NOT NULL,
    PRIMARY KEY (kind, number)
);
";

const SEED_SQL: &str = r"
INSERT INTO memo_sequences (kind, next_value) VALUES
    ('ar_credit_memo', 1),
    ('ar_debit_memo', 1);
";

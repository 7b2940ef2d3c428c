use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use crate::domain::{Account, Cents, TransactionRecord};

use super::MIGRATION_001_INITIAL;

/// Repository for the durable account store and transaction log.
/// The ledger service is the sole writer; anything else reads.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    // ========================
    // Account operations
    // ========================

    /// Load every account row. Called once at service startup to build
    /// the in-memory cache.
    pub async fn load_accounts(&self) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT account_number, card_no, pin, name, ifsc_code, balance, address
            FROM accounts
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load accounts")?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Insert a newly provisioned account.
    pub async fn create_account(&self, account: &Account) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO accounts (account_number, card_no, pin, name, ifsc_code, balance, address)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.account_number)
        .bind(&account.card_number)
        .bind(&account.pin)
        .bind(&account.name)
        .bind(&account.ifsc_code)
        .bind(account.balance_cents)
        .bind(&account.address)
        .execute(&self.pool)
        .await
        .context("Failed to create account")?;
        Ok(())
    }

    /// Overwrite an account's stored balance.
    pub async fn save_balance(&self, account_number: &str, balance_cents: Cents) -> Result<()> {
        sqlx::query("UPDATE accounts SET balance = ? WHERE account_number = ?")
            .bind(balance_cents)
            .bind(account_number)
            .execute(&self.pool)
            .await
            .context("Failed to save balance")?;
        Ok(())
    }

    /// Overwrite an account's stored PIN.
    pub async fn save_pin(&self, account_number: &str, pin: &str) -> Result<()> {
        sqlx::query("UPDATE accounts SET pin = ? WHERE account_number = ?")
            .bind(pin)
            .bind(account_number)
            .execute(&self.pool)
            .await
            .context("Failed to save PIN")?;
        Ok(())
    }

    // ========================
    // Transaction log operations
    // ========================

    /// Append a single record to the transaction log.
    pub async fn append_transaction(&self, record: &TransactionRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (receipt, occurred_at, from_card, to_card, amount, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.receipt)
        .bind(record.occurred_at.to_rfc3339())
        .bind(&record.from_account)
        .bind(&record.to_account)
        .bind(record.amount_cents)
        .bind(&record.description)
        .execute(&self.pool)
        .await
        .context("Failed to append transaction")?;
        Ok(())
    }

    /// Persist a completed transfer: debit, credit, and log append run in
    /// one SQL transaction, so a partial failure cannot leave the sender
    /// debited without the recipient credited. Balance updates are relative,
    /// which also keeps a sender==recipient transfer net zero.
    pub async fn record_transfer(&self, record: &TransactionRecord) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to begin transfer transaction")?;

        sqlx::query("UPDATE accounts SET balance = balance - ? WHERE account_number = ?")
            .bind(record.amount_cents)
            .bind(&record.from_account)
            .execute(&mut *tx)
            .await
            .context("Failed to debit sender")?;

        sqlx::query("UPDATE accounts SET balance = balance + ? WHERE account_number = ?")
            .bind(record.amount_cents)
            .bind(&record.to_account)
            .execute(&mut *tx)
            .await
            .context("Failed to credit recipient")?;

        sqlx::query(
            r#"
            INSERT INTO transactions (receipt, occurred_at, from_card, to_card, amount, description)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.receipt)
        .bind(record.occurred_at.to_rfc3339())
        .bind(&record.from_account)
        .bind(&record.to_account)
        .bind(record.amount_cents)
        .bind(&record.description)
        .execute(&mut *tx)
        .await
        .context("Failed to append transaction")?;

        tx.commit()
            .await
            .context("Failed to commit transfer transaction")?;
        Ok(())
    }

    /// Fetch the records involving an account as sender or recipient,
    /// most recent first, capped at `limit`.
    pub async fn query_transactions(
        &self,
        account_number: &str,
        limit: i64,
    ) -> Result<Vec<TransactionRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT receipt, occurred_at, from_card, to_card, amount, description
            FROM transactions
            WHERE from_card = ? OR to_card = ?
            ORDER BY occurred_at DESC
            LIMIT ?
            "#,
        )
        .bind(account_number)
        .bind(account_number)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to query transactions")?;

        rows.iter().map(Self::row_to_transaction).collect()
    }

    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<Account> {
        Ok(Account {
            account_number: row.get("account_number"),
            card_number: row.get("card_no"),
            pin: row.get("pin"),
            balance_cents: row.get("balance"),
            name: row.get("name"),
            ifsc_code: row.get("ifsc_code"),
            address: row.get("address"),
            history: Vec::new(),
        })
    }

    fn row_to_transaction(row: &sqlx::sqlite::SqliteRow) -> Result<TransactionRecord> {
        let occurred_at_str: String = row.get("occurred_at");

        Ok(TransactionRecord {
            receipt: row.get("receipt"),
            occurred_at: DateTime::parse_from_rfc3339(&occurred_at_str)
                .context("Invalid occurred_at timestamp")?
                .with_timezone(&Utc),
            from_account: row.get("from_card"),
            to_account: row.get("to_card"),
            amount_cents: row.get("amount"),
            description: row.get("description"),
        })
    }
}

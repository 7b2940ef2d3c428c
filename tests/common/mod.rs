// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use cashpoint::application::{LedgerService, seed_accounts};
use cashpoint::storage::Repository;
use tempfile::TempDir;

/// Connection URL for the test database inside `temp_dir`.
pub fn db_url(temp_dir: &TempDir) -> String {
    let db_path = temp_dir.path().join("test.db");
    format!("sqlite:{}?mode=rwc", db_path.to_str().unwrap())
}

/// Repository over a fresh temporary database, provisioned with the two
/// demo accounts (John Doe at 1000.00, Jane Smith at 500.00).
pub async fn seeded_repository() -> Result<(Repository, TempDir)> {
    let temp_dir = TempDir::new()?;
    let repo = Repository::init(&db_url(&temp_dir)).await?;
    for account in seed_accounts() {
        repo.create_account(&account).await?;
    }
    Ok((repo, temp_dir))
}

/// Ledger service loaded from a provisioned temporary database.
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let (repo, temp_dir) = seeded_repository().await?;
    let service = LedgerService::load(repo).await?;
    Ok((service, temp_dir))
}

/// Load a second service over the same database, as if the terminal had
/// restarted.
pub async fn reload_service(temp_dir: &TempDir) -> Result<LedgerService> {
    let repo = Repository::connect(&db_url(temp_dir)).await?;
    Ok(LedgerService::load(repo).await?)
}

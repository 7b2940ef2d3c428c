use std::collections::HashMap;

use tracing::{info, warn};

use crate::domain::{Account, Cents, TransactionRecord, parse_amount};
use crate::storage::Repository;

use super::AppError;

/// Balances below this threshold trigger a low-balance advisory ($100.00).
pub const MINIMUM_BALANCE_CENTS: Cents = 10_000;

/// Most records returned by a single history query.
pub const HISTORY_LIMIT: i64 = 50;

/// The ledger core behind the terminal: an in-memory cache of accounts
/// loaded from the durable store at startup, plus the operations the
/// presentation layer invokes. One authenticated session at a time; the
/// service exclusively owns and mutates the cache, and it is the sole
/// writer to the store.
pub struct LedgerService {
    /// None when running detached on seed data (degraded mode).
    repo: Option<Repository>,
    /// Account number -> account.
    accounts: HashMap<String, Account>,
    /// Card number -> account number. Kept consistent with `accounts`
    /// on every mutation so lookups by either key stay O(1).
    cards: HashMap<String, String>,
}

/// Balance read plus the non-blocking low-balance advisory.
#[derive(Debug)]
pub struct BalanceReading {
    pub balance_cents: Cents,
    pub low_balance: bool,
}

/// Result of a completed transfer.
#[derive(Debug)]
pub struct TransferOutcome {
    pub record: TransactionRecord,
    pub sender_balance_cents: Cents,
    pub recipient_balance_cents: Cents,
}

/// Outcome of a history query. "No history" and "history unavailable"
/// are distinct: an unreachable log must never read as an empty one.
#[derive(Debug)]
pub enum History {
    /// No records involve this account.
    Empty,
    /// Most recent first, capped at `HISTORY_LIMIT`.
    Records(Vec<TransactionRecord>),
    /// The durable log could not be queried.
    Unavailable(String),
}

impl LedgerService {
    fn with_accounts(repo: Option<Repository>, accounts: Vec<Account>) -> Self {
        let mut by_number = HashMap::new();
        let mut cards = HashMap::new();
        for account in accounts {
            cards.insert(account.card_number.clone(), account.account_number.clone());
            by_number.insert(account.account_number.clone(), account);
        }
        Self {
            repo,
            accounts: by_number,
            cards,
        }
    }

    /// Connect to the store at `database_path`, migrate, and load every
    /// account. If the store is unreachable the terminal stays usable:
    /// the service falls back to the fixed seed pair and runs detached.
    pub async fn open(database_path: &str) -> Self {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = match Repository::init(&db_url).await {
            Ok(repo) => repo,
            Err(err) => {
                warn!(error = %err, "account store unreachable, using seed accounts");
                return Self::detached();
            }
        };
        match repo.load_accounts().await {
            Ok(accounts) => {
                info!(count = accounts.len(), "loaded accounts from store");
                Self::with_accounts(Some(repo), accounts)
            }
            Err(err) => {
                warn!(error = %err, "account store unreachable, using seed accounts");
                Self::detached()
            }
        }
    }

    /// Strict variant of `open` for callers that want a startup store
    /// failure surfaced instead of the seed fallback.
    pub async fn load(repo: Repository) -> Result<Self, AppError> {
        let accounts = repo
            .load_accounts()
            .await
            .map_err(|err| AppError::StoreUnavailable(err.to_string()))?;
        info!(count = accounts.len(), "loaded accounts from store");
        Ok(Self::with_accounts(Some(repo), accounts))
    }

    /// Run on the fixed seed pair with no store attached. Nothing
    /// persists; history queries report unavailable.
    pub fn detached() -> Self {
        Self::with_accounts(None, seed_accounts())
    }

    /// True when running detached on seed data.
    pub fn is_degraded(&self) -> bool {
        self.repo.is_none()
    }

    /// Read access for the account-details view.
    pub fn account(&self, account_number: &str) -> Option<&Account> {
        self.accounts.get(account_number)
    }

    /// Resolve an identifier as an account number first, then as a card
    /// number.
    fn resolve(&self, identifier: &str) -> Option<&Account> {
        self.accounts.get(identifier).or_else(|| {
            self.cards
                .get(identifier)
                .and_then(|number| self.accounts.get(number))
        })
    }

    // ========================
    // Session operations
    // ========================

    /// Authenticate with an account number or card number plus PIN.
    ///
    /// PIN comparison is exact plaintext equality, not constant-time;
    /// there is no lockout or rate limiting. Known simplifications of
    /// this single-terminal scope.
    pub fn authenticate(&self, identifier: &str, pin: &str) -> Result<&Account, AppError> {
        match self.resolve(identifier) {
            Some(account) if account.pin_matches(pin) => Ok(account),
            _ => Err(AppError::AuthenticationFailed),
        }
    }

    /// Current balance plus the advisory flag. Purely a read.
    pub fn balance(&self, account_number: &str) -> Result<BalanceReading, AppError> {
        let account = self
            .accounts
            .get(account_number)
            .ok_or_else(|| AppError::AccountNotFound(account_number.to_string()))?;
        Ok(BalanceReading {
            balance_cents: account.balance_cents,
            low_balance: account.balance_cents < MINIMUM_BALANCE_CENTS,
        })
    }

    /// Move funds from the sender to the recipient identified by account
    /// or card number. The amount arrives as user-entered text.
    ///
    /// All-or-nothing: debit, credit, and the log append are committed in
    /// one store transaction, and the in-memory cache is only touched
    /// after the commit succeeds. On any failure nothing has moved.
    pub async fn transfer(
        &mut self,
        sender_account_number: &str,
        recipient_identifier: &str,
        amount_text: &str,
    ) -> Result<TransferOutcome, AppError> {
        let amount_cents = parse_amount(amount_text).map_err(|_| AppError::InvalidAmount)?;
        if amount_cents <= 0 {
            return Err(AppError::InvalidAmount);
        }

        let sender = self
            .accounts
            .get(sender_account_number)
            .ok_or_else(|| AppError::AccountNotFound(sender_account_number.to_string()))?;
        if sender.balance_cents < amount_cents {
            return Err(AppError::InsufficientFunds);
        }

        // No guard against sender == recipient; the delta application
        // below keeps such a transfer net zero.
        let recipient_number = self
            .resolve(recipient_identifier)
            .map(|account| account.account_number.clone())
            .ok_or(AppError::RecipientNotFound)?;

        let record = TransactionRecord::transfer(
            sender_account_number,
            recipient_number.as_str(),
            amount_cents,
        );

        if let Some(repo) = &self.repo {
            repo.record_transfer(&record).await?;
        }

        let sender = self
            .accounts
            .get_mut(sender_account_number)
            .ok_or_else(|| AppError::AccountNotFound(sender_account_number.to_string()))?;
        sender.balance_cents -= amount_cents;
        sender.history.push(record.debit_line());
        let sender_balance_cents = sender.balance_cents;

        let recipient = self
            .accounts
            .get_mut(&recipient_number)
            .ok_or(AppError::RecipientNotFound)?;
        recipient.balance_cents += amount_cents;
        recipient.history.push(record.credit_line());
        let recipient_balance_cents = recipient.balance_cents;

        Ok(TransferOutcome {
            record,
            sender_balance_cents,
            recipient_balance_cents,
        })
    }

    /// Replace the PIN for the account resolved by account number first,
    /// then card number. Returns the account number the change applied to.
    ///
    /// Callers must confirm intent with the cardholder before invoking.
    /// Persistence is best-effort: a failed write leaves the in-memory
    /// PIN in force and is surfaced in the log only.
    pub async fn change_pin(
        &mut self,
        identifier: &str,
        new_pin: &str,
    ) -> Result<String, AppError> {
        let new_pin = new_pin.trim();
        if new_pin.is_empty() {
            return Err(AppError::EmptyPin);
        }

        let account_number = self
            .resolve(identifier)
            .map(|account| account.account_number.clone())
            .ok_or_else(|| AppError::AccountNotFound(identifier.to_string()))?;

        if let Some(account) = self.accounts.get_mut(&account_number) {
            account.pin = new_pin.to_string();
        }

        if let Some(repo) = &self.repo {
            if let Err(err) = repo.save_pin(&account_number, new_pin).await {
                warn!(account = %account_number, error = %err, "failed to persist PIN change");
            }
        }

        Ok(account_number)
    }

    /// Query the durable log for records involving this account, most
    /// recent first, capped at `HISTORY_LIMIT`.
    pub async fn history(&self, account_number: &str) -> History {
        let Some(repo) = &self.repo else {
            return History::Unavailable("no durable store attached".to_string());
        };
        match repo.query_transactions(account_number, HISTORY_LIMIT).await {
            Ok(records) if records.is_empty() => History::Empty,
            Ok(records) => History::Records(records),
            Err(err) => {
                warn!(account = %account_number, error = %err, "failed to query transaction history");
                History::Unavailable("transaction history is temporarily unavailable".to_string())
            }
        }
    }
}

/// The fixed fallback pair that keeps a disconnected terminal usable
/// for demos.
pub fn seed_accounts() -> Vec<Account> {
    vec![
        Account::new(
            "1234567890",
            "CARD-0001",
            "1234",
            100_000,
            "John Doe",
            "IFSC1234567",
        )
        .with_address("123 Main St, Anytown"),
        Account::new(
            "1111222233",
            "CARD-0002",
            "4321",
            50_000,
            "Jane Smith",
            "IFSC7654321",
        )
        .with_address("456 Oak Ave, Somewhere"),
    ]
}

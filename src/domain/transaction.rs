use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_cents};

/// A completed transfer as recorded in the durable transaction log.
/// Records are immutable once written and are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    /// Short unique identifier handed to the cardholder on the receipt.
    pub receipt: String,
    pub occurred_at: DateTime<Utc>,
    /// Sender's account number (balance decreases).
    pub from_account: String,
    /// Recipient's account number (balance increases).
    pub to_account: String,
    /// Always positive.
    pub amount_cents: Cents,
    /// Free-text classification, e.g. "Transfer".
    pub description: String,
}

impl TransactionRecord {
    /// Record a transfer occurring now, with a freshly generated receipt.
    pub fn transfer(
        from_account: impl Into<String>,
        to_account: impl Into<String>,
        amount_cents: Cents,
    ) -> Self {
        Self {
            receipt: generate_receipt(),
            occurred_at: Utc::now(),
            from_account: from_account.into(),
            to_account: to_account.into(),
            amount_cents,
            description: "Transfer".to_string(),
        }
    }

    /// History line shown to the sender for this transfer.
    pub fn debit_line(&self) -> String {
        format!(
            "Receipt#{} [{}]: Transferred ${} to {}",
            self.receipt,
            self.occurred_at.format("%Y/%m/%d %H:%M:%S"),
            format_cents(self.amount_cents),
            self.to_account,
        )
    }

    /// History line shown to the recipient for this transfer.
    pub fn credit_line(&self) -> String {
        format!(
            "Receipt#{} [{}]: Received ${} from {}",
            self.receipt,
            self.occurred_at.format("%Y/%m/%d %H:%M:%S"),
            format_cents(self.amount_cents),
            self.from_account,
        )
    }
}

/// Receipt identifiers are the first 8 hex characters of a v4 UUID,
/// uppercased. Short enough to read off a printed slip.
fn generate_receipt() -> String {
    let id = Uuid::new_v4().simple().to_string();
    id[..8].to_ascii_uppercase()
}

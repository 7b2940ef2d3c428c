use serde::{Deserialize, Serialize};

use super::Cents;

/// A cardholder account as held in the in-memory ledger cache.
///
/// `account_number` is the primary identity; `card_number` is the physical
/// card identifier and works as an alternate authentication key. Both are
/// unique across all accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub account_number: String,
    pub card_number: String,
    /// Stored and compared in plaintext, matching the deployed schema.
    /// A hardened deployment would hash PINs and compare in constant time.
    pub pin: String,
    pub balance_cents: Cents,
    pub name: String,
    pub ifsc_code: String,
    pub address: Option<String>,
    /// Rendered history lines for this session only. The durable
    /// transaction log is the authoritative record.
    #[serde(skip)]
    pub history: Vec<String>,
}

impl Account {
    pub fn new(
        account_number: impl Into<String>,
        card_number: impl Into<String>,
        pin: impl Into<String>,
        balance_cents: Cents,
        name: impl Into<String>,
        ifsc_code: impl Into<String>,
    ) -> Self {
        Self {
            account_number: account_number.into(),
            card_number: card_number.into(),
            pin: pin.into(),
            balance_cents,
            name: name.into(),
            ifsc_code: ifsc_code.into(),
            address: None,
            history: Vec::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Exact plaintext comparison. See the field note on `pin`.
    pub fn pin_matches(&self, candidate: &str) -> bool {
        self.pin == candidate
    }

    /// True when either identity key matches the given identifier.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        self.account_number == identifier || self.card_number == identifier
    }
}

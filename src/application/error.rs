use thiserror::Error;

/// User-facing failures. Messages are what the terminal shows the
/// cardholder; store internals never leak through them.
#[derive(Error, Debug)]
pub enum AppError {
    /// Covers both an unknown identifier and a wrong PIN. The two cases
    /// are deliberately indistinguishable to the caller.
    #[error("Invalid card number or PIN.")]
    AuthenticationFailed,

    #[error("Recipient account not found.")]
    RecipientNotFound,

    #[error("Invalid amount.")]
    InvalidAmount,

    #[error("Insufficient funds.")]
    InsufficientFunds,

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("PIN cannot be empty.")]
    EmptyPin,

    #[error("Account store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}

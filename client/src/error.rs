//! Error types for the staking client
//!
//! Every chain interaction returns [`Result`]. Public dashboard operations
//! catch these at their boundary and turn them into a boolean or a safe
//! default, so callers never see a `ClientError` directly unless they use
//! the typed contract wrappers.

use thiserror::Error;

/// Amount parsing and formatting errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,

    #[error("invalid character {0:?} in amount")]
    InvalidDigit(char),

    #[error("amount has {found} fractional digits but token supports {decimals}")]
    TooManyDecimals { found: usize, decimals: u8 },

    #[error("amount overflows raw token units")]
    Overflow,

    #[error("token decimals {0} out of supported range")]
    UnsupportedDecimals(u8),
}

/// Staking client error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// No wallet is connected
    #[error("wallet not connected")]
    NoSession,

    /// RPC or transport failure
    #[error("rpc error: {0}")]
    Rpc(String),

    /// User rejected the signature prompt
    #[error("transaction rejected by signer")]
    Rejected,

    /// Transaction mined but reverted
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: String },

    /// Human amount could not be converted
    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] UnitsError),

    /// Contract returned a value of the wrong shape
    #[error("unexpected output from {call}: expected {expected}")]
    UnexpectedOutput {
        call: &'static str,
        expected: &'static str,
    },

    /// Pool id outside the known table
    #[error("unknown pool id {0}")]
    UnknownPool(u8),

    /// Malformed address or configuration value
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

use thiserror::Error;

/// Errors raised while resolving the endpoint configuration.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The deployment mode is not one of `development`, `local`, `production`.
    #[error("unknown deployment mode {0:?} (expected development, local or production)")]
    UnknownMode(String),

    /// `WSFE_ENV` is not set.
    #[error("deployment mode not set: WSFE_ENV is missing")]
    MissingMode,
}

/// Errors raised while assembling an authorization request.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuilderError {
    /// The request carries no voucher details.
    #[error("at least one voucher detail is required")]
    NoDetails,

    /// A voucher number range is inverted.
    #[error("voucher range {from}..={to} is inverted")]
    InvertedRange { from: u64, to: u64 },

    /// Summing the amounts of a detail exceeded the decimal range.
    #[error("{0} overflows the decimal range")]
    AmountOverflow(&'static str),
}

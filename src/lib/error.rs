//! Errors raised while turning a declared account into commands

use thiserror::Error;

/// Rejected input for a single synthesis request.
///
/// None of these are fatal to the caller; an unsupported platform feature is
/// never reported here, it is simply left out of the plan.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("account name is required")]
    EmptyName,

    #[error("invalid account name '{0}': must not start with '-' or contain whitespace or ':'")]
    InvalidName(String),

    #[error("{field} must be zero or greater, got {value}")]
    NegativePasswordAge { field: &'static str, value: i64 },

    #[error("invalid expiry date '{0}': expected YYYY-MM-DD")]
    InvalidExpiry(String),

    #[error("no flag is known for property '{0}'")]
    UnknownProperty(String),

    #[error("'{0}' can only be set when the account is created")]
    UnsupportedModification(String),

    #[error("'{0}' is declared more than once")]
    ConflictingAttribute(String),

    #[error("invalid value '{value}' for {attribute}")]
    InvalidValue { attribute: String, value: String },
}

pub type Result<T> = std::result::Result<T, PlanError>;

//! Shared error type across propscope crates.

use thiserror::Error;

/// Machine-readable error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Shared and component props collide.
    DuplicateKeys,
    /// Component-only payload measured larger than the merged payload.
    SizeInvariantViolation,
    /// Configuration rejected.
    InvalidConfig,
    /// Payload could not be serialized.
    Serialization,
    /// A prop source failed to resolve.
    Resolve,
}

impl ErrorCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::DuplicateKeys => "DUPLICATE_KEYS",
            ErrorCode::SizeInvariantViolation => "SIZE_INVARIANT_VIOLATION",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::Serialization => "SERIALIZATION",
            ErrorCode::Resolve => "RESOLVE",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PropScopeError>;

/// Unified error type used by core and the response glue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropScopeError {
    #[error(
        "duplicate props keys detected: {}. Shared props are resolved before component props, \
         so the component value silently replaces the shared one; rename the key in either set",
        .keys.join(", ")
    )]
    DuplicateKeys { keys: Vec<String> },

    #[error(
        "component props size ({component_kb} KB) is larger than the total props size ({total_kb} KB). \
         Component props are resolved after the merged set, so the first resolution most likely \
         eager-loaded relationships that the second one then serialized as well; check that \
         resources only include relationships that were explicitly loaded"
    )]
    SizeInvariantViolation { component_kb: f64, total_kb: f64 },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("serialization failed: {0}")]
    Serialization(String),

    #[error("prop resolution failed: {0}")]
    Resolve(String),
}

impl PropScopeError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PropScopeError::DuplicateKeys { .. } => ErrorCode::DuplicateKeys,
            PropScopeError::SizeInvariantViolation { .. } => ErrorCode::SizeInvariantViolation,
            PropScopeError::InvalidConfig(_) => ErrorCode::InvalidConfig,
            PropScopeError::Serialization(_) => ErrorCode::Serialization,
            PropScopeError::Resolve(_) => ErrorCode::Resolve,
        }
    }

    /// True for the two payload policy failures (as opposed to infrastructure errors).
    pub fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            PropScopeError::DuplicateKeys { .. } | PropScopeError::SizeInvariantViolation { .. }
        )
    }
}

impl From<serde_json::Error> for PropScopeError {
    fn from(e: serde_json::Error) -> Self {
        PropScopeError::Serialization(e.to_string())
    }
}

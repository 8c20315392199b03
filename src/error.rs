//! Error types for the converter.

/// Failures of the restricted arithmetic evaluator.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    #[error("invalid expression: {reason}")]
    InvalidExpression { reason: String },

    #[error("division by zero")]
    DivisionByZero,
}

impl ExprError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        ExprError::InvalidExpression {
            reason: reason.into(),
        }
    }
}

/// Failures of a single conversion request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    #[error("both currencies must be specified")]
    MissingCurrency,

    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("cannot evaluate amount {input:?}: {source}")]
    Amount {
        input: String,
        #[source]
        source: ExprError,
    },
}

/// Rate store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("rate store holds no observations")]
    NoData,

    #[error("refusing to store rate {rate} for {code}: rates must be positive")]
    InvalidRate { code: String, rate: f64 },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),
}

/// Remote feed failures. The first two are recovered by falling back to the store.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("rate source unreachable: {0}")]
    SourceUnreachable(String),

    #[error("malformed rate feed: {0}")]
    MalformedFeed(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

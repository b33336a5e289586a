use thiserror::Error;

/// Errors the intake facade can surface before any book state is mutated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("unknown symbol `{0}`")]
    UnknownSymbol(String),

    #[error("quantity must be > 0")]
    NonPositiveQty,

    #[error("limit orders require a positive price")]
    MissingLimitPrice,
}

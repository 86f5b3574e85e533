use alloy::eips::BlockNumberOrTag;
use thiserror::Error;

/// Errors produced while fetching or decoding market data.
#[derive(Debug, Error)]
pub enum MarketDataError {
    /// Function is absent from the interface document or declares no output
    /// components.
    #[error("function `{0}` not found in interface document or has no outputs")]
    SchemaNotFound(String),

    /// Decoded value shape diverged from the interface document. Never
    /// patched by truncation or padding.
    #[error("`{function}`: {names} output names vs {values} decoded values")]
    ShapeMismatch {
        function: String,
        names: usize,
        values: usize,
    },

    /// Expected field is absent from the decoded record.
    #[error("field `{0}` missing from decoded record")]
    MissingField(String),

    /// Field decoded to an unexpected Solidity type.
    #[error("field `{field}`: expected {expected}")]
    FieldType {
        field: String,
        expected: &'static str,
    },

    /// Fixed-width byte string does not hold UTF-8 text.
    #[error("field `{0}` is not valid UTF-8 text")]
    InvalidText(String),

    /// Call produced an output shape outside the supported single
    /// struct/struct-array form.
    #[error("`{function}`: unsupported output shape")]
    UnexpectedOutput { function: String },

    #[error("block {0} not found")]
    BlockNotFound(BlockNumberOrTag),

    #[error("invalid interface or deployment document: {0}")]
    Document(#[from] serde_json::Error),

    #[error(transparent)]
    Abi(#[from] alloy::dyn_abi::Error),

    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonifError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode request: {0}")]
    Input(String),

    #[error("{file}: syntax={syntax} not supported. Supported syntax=proto3 only.")]
    UnsupportedSyntax { file: String, syntax: String },

    #[error("type {0} not found")]
    UnresolvedType(String),

    #[error("{kind} type not supported by the {backend} generator")]
    UnsupportedFieldType { backend: &'static str, kind: &'static str },
}

impl From<prost::DecodeError> for JsonifError {
    fn from(err: prost::DecodeError) -> Self {
        JsonifError::Input(err.to_string())
    }
}

use std::io;

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("unsupported hashing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("invalid {algorithm} digest {digest:?}: {reason}")]
    InvalidDigest {
        algorithm: &'static str,
        digest:    String,
        reason:    &'static str,
    },

    #[error("checksum does not match: expected {expected}, found {actual}")]
    Mismatch { expected: String, actual: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, VerifyError>;

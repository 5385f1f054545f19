//! Error types for huffpack

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while compressing or decompressing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Compression was asked to work on zero bytes
    #[error("cannot compress an empty input")]
    EmptyInput,

    /// Input has more bytes than a 4-byte frequency field can count
    #[error("input of {len} bytes is too large for a container")]
    InputTooLarge { len: usize },

    /// The buffer does not start with the container marker
    #[error("not a huffpack container: expected marker {expected:02x?}, found {found:02x?}")]
    InvalidContainer { expected: [u8; 2], found: Vec<u8> },

    /// The container header or payload disagrees with the buffer it came in
    #[error("malformed container: {0}")]
    MalformedContainer(String),

    /// The encoder was handed a byte it has no code for
    #[error("no code for symbol {0:#04x}")]
    UnknownSymbol(u8),
}

impl Error {
    /// Create a malformed container error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Error::MalformedContainer(msg.into())
    }
}

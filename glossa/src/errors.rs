//! Definition of errors.

use std::fmt;

/// A specialized Result type for Glossa.
pub type Result<T, E = GlossaError> = std::result::Result<T, E>;

/// The error type for Glossa.
#[derive(Debug, thiserror::Error)]
pub enum GlossaError {
    /// The error variant for [`InvalidArgumentError`].
    #[error(transparent)]
    InvalidArgument(InvalidArgumentError),

    /// The error variant for [`InvalidFormatError`].
    #[error(transparent)]
    InvalidFormat(InvalidFormatError),

    /// A key is absent from a dictionary or from every member of a union.
    #[error("NotFoundError: {0}")]
    NotFound(String),

    /// A pattern rejected a candidate.
    #[error("PatternMismatchError: {0}")]
    PatternMismatch(String),

    /// A pattern template cannot be turned into a matcher.
    #[error("MalformedPatternTemplateError: {section}: {msg}")]
    MalformedPatternTemplate {
        /// Name of the pattern section.
        section: String,
        /// Error message.
        msg: String,
    },

    /// A grammar plan refers to something that does not exist.
    #[error("GrammarCompilationError: {0}")]
    GrammarCompilation(String),

    /// The error variant for [`TryFromIntError`](std::num::TryFromIntError).
    #[error(transparent)]
    TryFromInt(#[from] std::num::TryFromIntError),

    /// The error variant for [`DecodeError`](bincode::error::DecodeError).
    #[error(transparent)]
    BincodeDecode(#[from] bincode::error::DecodeError),

    /// The error variant for [`EncodeError`](bincode::error::EncodeError).
    #[error(transparent)]
    BincodeEncode(#[from] bincode::error::EncodeError),

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    StdIo(#[from] std::io::Error),
}

impl GlossaError {
    pub(crate) fn invalid_argument<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidArgument(InvalidArgumentError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn invalid_format<S>(arg: &'static str, msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidFormat(InvalidFormatError {
            arg,
            msg: msg.into(),
        })
    }

    pub(crate) fn not_found<S>(key: S) -> Self
    where
        S: Into<String>,
    {
        Self::NotFound(key.into())
    }

    pub(crate) fn grammar<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::GrammarCompilation(msg.into())
    }
}

/// Error used when the argument is invalid.
#[derive(Debug)]
pub struct InvalidArgumentError {
    /// Name of the argument.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidArgumentError: {}: {}", self.arg, self.msg)
    }
}

impl std::error::Error for InvalidArgumentError {}

/// Error used when the input format is invalid.
#[derive(Debug)]
pub struct InvalidFormatError {
    /// Name of the format.
    pub(crate) arg: &'static str,

    /// Error message.
    pub(crate) msg: String,
}

impl fmt::Display for InvalidFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "InvalidFormatError: {}: {}", self.arg, self.msg)
    }
}

impl std::error::Error for InvalidFormatError {}

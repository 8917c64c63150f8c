use core::fmt;

/// The error type for decoding of wire representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// An incoming packet could not be decoded because it was shorter than assumed.
    ///
    /// The buffer may be shorter than the fixed header, shorter than the header length it
    /// declares, or shorter than the total length it declares.
    Truncated,

    /// An incoming packet was recognized but was self-contradictory.
    ///
    /// Examples: a version other than 4; a header length below the 20 octet minimum; a total
    /// length that does not even cover the header; a payload whose size differs from the one
    /// derived from the header.
    Malformed,
}

/// The result type for the wire representations.
pub type Result<T> = core::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Truncated => write!(f, "truncated packet"),
            Error::Malformed => write!(f, "malformed packet"),
        }
    }
}

impl std::error::Error for Error {}

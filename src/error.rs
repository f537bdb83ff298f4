use std::fmt;

/// Failure signals reported by the UUID operations.
///
/// Each kind is distinct from every valid result and from the other kinds, so a caller can tell
/// "definitely not a UUID" apart from "wrong kind of input entirely".
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Error {
    /// The input cannot be interpreted as text at all.
    WrongInputType,

    /// The input is text or bytes but not a structurally valid UUID.
    Malformed,

    /// The input is a valid UUID but the requested introspection does not apply to its version.
    NotApplicable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongInputType => write!(f, "input is not a string"),
            Self::Malformed => write!(f, "invalid string representation"),
            Self::NotApplicable => write!(f, "operation not applicable to this UUID version"),
        }
    }
}

impl std::error::Error for Error {}

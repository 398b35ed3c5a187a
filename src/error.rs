use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while decoding a packed representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("don't know how to unpack format version {version}")]
    UnsupportedVersion { version: u64 },

    #[error("element of {count} byte(s) at offset {cursor} overruns declared length {len}")]
    Overrun {
        cursor: usize,
        count: usize,
        len: usize,
    },

    #[error("only {written} of {len} declared byte(s) were produced")]
    Underrun { written: usize, len: usize },

    #[error("run count {count} is below the minimum of 2")]
    InvalidRunCount { count: usize },

    #[error("cannot allocate an output buffer of {len} byte(s)")]
    OutOfMemory { len: usize },

    #[error("syntax error at byte {pos}: {reason}")]
    Syntax { pos: usize, reason: &'static str },
}

impl Error {
    /// True when the packed input itself is broken, as opposed to foreign or too big.
    pub fn is_malformed(&self) -> bool {
        !matches!(
            self,
            Error::UnsupportedVersion { .. } | Error::OutOfMemory { .. }
        )
    }
}

use crate::parse;

/// Errors returned when decoding a block from its wire representation
///
/// A decode which fails never yields a partially populated block.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReadBlockError {
    /// The input ended before a required field (the position count, a length, a null bitmap byte
    /// or a payload slice) could be read in full
    #[error("not enough data: {needed} more bytes needed")]
    Incomplete { needed: usize },
    #[error("invalid position count {0}")]
    InvalidPositionCount(i32),
    #[error("invalid length {length} at position {position}")]
    MalformedLength { position: usize, length: i32 },
    #[error("payload offset overflowed at position {position}")]
    OffsetOverflow { position: usize },
    #[error("padding bits set in the final null bitmap byte")]
    MalformedNullBitmap,
    #[error("unexpected leftover data after the block")]
    LeftoverData,
    #[error("unknown block encoding `{0}`")]
    UnknownEncoding(String),
    #[error("block encoding name was not valid utf8")]
    InvalidName,
}

impl ReadBlockError {
    pub fn is_incomplete(&self) -> bool {
        matches!(self, Self::Incomplete { .. })
    }
}

impl From<parse::ParseError<ReadBlockError>> for ReadBlockError {
    fn from(e: parse::ParseError<ReadBlockError>) -> Self {
        match e {
            parse::ParseError::Error(e) => e,
            parse::ParseError::Incomplete(needed) => ReadBlockError::Incomplete {
                needed: needed.size(),
            },
        }
    }
}

/// Errors returned when registering a block encoding
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("a block encoding named `{0}` is already registered")]
    Duplicate(String),
    #[error("block encoding name `{0}` is longer than {max} bytes", max = i32::MAX)]
    NameTooLong(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Needed;
    use std::num::NonZeroUsize;

    #[test]
    fn incomplete_from_parse_error() {
        let err: ReadBlockError =
            parse::ParseError::<ReadBlockError>::Incomplete(Needed(NonZeroUsize::new(3).unwrap()))
                .into();
        assert_eq!(err, ReadBlockError::Incomplete { needed: 3 });
        assert!(err.is_incomplete());
        assert_eq!(err.to_string(), "not enough data: 3 more bytes needed");
    }

    #[test]
    fn inner_error_is_unwrapped() {
        let err: ReadBlockError =
            parse::ParseError::Error(ReadBlockError::MalformedNullBitmap).into();
        assert_eq!(err, ReadBlockError::MalformedNullBitmap);
        assert!(!err.is_incomplete());
    }
}

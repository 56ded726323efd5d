use std::io::Write;

use crate::{
    parse::{self, Input, ParseError, ParseResult},
    BlockValues, ReadBlockError,
};

/// The largest payload a block can address, offsets are signed 32 bit on the wire
pub(crate) const MAX_PAYLOAD: usize = i32::MAX as usize;

/// Total the payload of `block`, checking it can be written before any byte of it is.
///
/// Fails with [`std::io::ErrorKind::InvalidInput`] if a value's bytes disagree with its declared
/// length, or if the values are too large to be addressed by a reader.
pub(crate) fn payload_len<B: BlockValues + ?Sized>(block: &B) -> std::io::Result<usize> {
    let non_null = || (0..block.position_count()).filter(move |p| !block.is_null(*p));
    let mut total: usize = 0;
    for position in non_null() {
        total = total
            .checked_add(block.length(position))
            .filter(|t| *t <= MAX_PAYLOAD)
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!(
                        "block payload exceeds {} bytes at position {}",
                        MAX_PAYLOAD, position
                    ),
                )
            })?;
    }
    for position in non_null() {
        let length = block.length(position);
        let actual = block.value_bytes(position).len();
        if actual != length {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "position {} declares {} bytes but holds {}",
                    position, length, actual
                ),
            ));
        }
    }
    Ok(total)
}

/// Write the length of every position in `block` as a 32 bit little endian integer, zero for
/// nulls. Returns the number of bytes written.
///
/// The lengths must already have been checked with [`payload_len`].
pub(crate) fn write_lengths<W, B>(mut output: W, block: &B) -> std::io::Result<usize>
where
    W: Write,
    B: BlockValues + ?Sized,
{
    for position in 0..block.position_count() {
        let length = if block.is_null(position) {
            0
        } else {
            block.length(position)
        };
        debug_assert!(length <= MAX_PAYLOAD);
        output.write_all(&(length as i32).to_le_bytes())?;
    }
    Ok(block.position_count() * 4)
}

/// Prefix sums of the declared lengths, `positions + 1` entries starting at zero
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Offsets(Vec<usize>);

impl Offsets {
    /// The length of `position`'s slice of the payload
    pub(crate) fn len(&self, position: usize) -> usize {
        self.0[position + 1] - self.0[position]
    }

    /// The total declared length of the payload
    pub(crate) fn total(&self) -> usize {
        self.0.last().copied().unwrap_or(0)
    }
}

/// Parse `positions` lengths and sum them into the `positions + 1` payload offsets
pub(crate) fn parse_offsets(
    positions: usize,
    input: Input<'_>,
) -> ParseResult<'_, Offsets, ReadBlockError> {
    let (i, lengths) = parse::apply_n(positions, parse::i32_le::<ReadBlockError>)(input)?;
    let mut offsets = Vec::with_capacity(lengths.len() + 1);
    let mut offset: usize = 0;
    offsets.push(offset);
    for (position, length) in lengths.into_iter().enumerate() {
        let len = usize::try_from(length).map_err(|_| {
            tracing::debug!(position, length, "rejecting negative length");
            ParseError::Error(ReadBlockError::MalformedLength { position, length })
        })?;
        offset = offset
            .checked_add(len)
            .filter(|o| *o <= MAX_PAYLOAD)
            .ok_or(ParseError::Error(ReadBlockError::OffsetOverflow { position }))?;
        offsets.push(offset);
    }
    Ok((i, Offsets(offsets)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SliceArrayBlock;
    use pretty_assertions::assert_eq;

    fn lengths(values: &[i32]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn nulls_are_written_as_zero() {
        let block = SliceArrayBlock::from(vec![Some("ab"), None, Some("c")]);
        let mut out = Vec::<u8>::new();
        let written = write_lengths(&mut out, &block).unwrap();
        assert_eq!(written, 12);
        assert_eq!(out, lengths(&[2, 0, 1]));
    }

    /// Declares `length` bytes per position whatever it holds
    struct MisreportedLengths<'a> {
        length: usize,
        values: &'a [&'a [u8]],
    }

    impl BlockValues for MisreportedLengths<'_> {
        fn position_count(&self) -> usize {
            self.values.len()
        }

        fn is_null(&self, _position: usize) -> bool {
            false
        }

        fn length(&self, _position: usize) -> usize {
            self.length
        }

        fn value_bytes(&self, position: usize) -> &[u8] {
            self.values[position]
        }
    }

    #[test]
    fn payload_len_sums_non_null_values() {
        let block = SliceArrayBlock::from(vec![Some("ab"), None, Some("c"), Some("")]);
        assert_eq!(payload_len(&block).unwrap(), 3);
        assert_eq!(payload_len(&SliceArrayBlock::default()).unwrap(), 0);
    }

    #[test]
    fn payload_len_rejects_misreported_lengths() {
        let agreeing = MisreportedLengths {
            length: 1,
            values: &[&b"a"[..], &b"b"[..]],
        };
        assert_eq!(payload_len(&agreeing).unwrap(), 2);

        let disagreeing = MisreportedLengths {
            length: 1,
            values: &[&b"a"[..], &b"abc"[..]],
        };
        let err = payload_len(&disagreeing).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }

    #[test]
    fn payload_len_rejects_unaddressable_payloads() {
        let oversized = MisreportedLengths {
            length: MAX_PAYLOAD / 2 + 1,
            values: &[&b""[..], &b""[..]],
        };
        let err = payload_len(&oversized).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("at position 1"), "{}", err);
    }

    #[test]
    fn offsets_are_prefix_sums() {
        let input = lengths(&[2, 0, 1]);
        let (rest, offsets) = parse_offsets(3, &input).unwrap();
        assert!(rest.is_empty());
        assert_eq!(offsets, Offsets(vec![0, 2, 2, 3]));
        assert_eq!(offsets.len(0), 2);
        assert_eq!(offsets.len(1), 0);
        assert_eq!(offsets.len(2), 1);
        assert_eq!(offsets.total(), 3);
    }

    #[test]
    fn no_positions_has_a_single_offset() {
        let (rest, offsets) = parse_offsets(0, &[]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(offsets, Offsets(vec![0]));
        assert_eq!(offsets.total(), 0);
    }

    #[test]
    fn negative_length_is_malformed() {
        let input = lengths(&[3, -1]);
        assert_eq!(
            parse_offsets(2, &input),
            Err(ParseError::Error(ReadBlockError::MalformedLength {
                position: 1,
                length: -1
            }))
        );
    }

    #[test]
    fn overflowing_offsets_are_rejected() {
        let input = lengths(&[i32::MAX, 1]);
        assert_eq!(
            parse_offsets(2, &input),
            Err(ParseError::Error(ReadBlockError::OffsetOverflow {
                position: 1
            }))
        );
    }

    #[test]
    fn truncated_length_is_incomplete() {
        let mut input = lengths(&[1, 2]);
        input.pop();
        assert!(matches!(
            parse_offsets(2, &input),
            Err(ParseError::Incomplete(_))
        ));
    }
}

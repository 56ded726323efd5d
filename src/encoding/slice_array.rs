use std::{borrow::Cow, io::Write};

use super::{lengths, null_bitmap, BlockEncoding};
use crate::{
    parse::{self, Input, ParseError, ParseResult},
    BlockValues, DecodeOptions, ReadBlockError, SliceArrayBlock,
};

/// The name this encoding is registered under
pub const SLICE_ARRAY_ENCODING_NAME: &str = "LAZY_SLICE_ARRAY";

/// Encodes blocks of nullable variable length byte values.
///
/// ## Layout
///
/// All integers are 32 bit little endian.
///
/// ```text
/// i32              position count N
/// i32[N]           length of each position, 0 for nulls
/// u8[ceil(N / 8)]  null bitmap, most significant bit first
/// u8[..]           the non-null values concatenated in position order
/// ```
///
/// Offsets into the payload are never written, the decoder rebuilds them by summing the lengths.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliceArrayBlockEncoding {
    options: DecodeOptions,
}

impl SliceArrayBlockEncoding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub(crate) fn factory() -> Box<dyn BlockEncoding> {
        Box::new(Self::new())
    }
}

impl BlockEncoding for SliceArrayBlockEncoding {
    fn name(&self) -> &'static str {
        SLICE_ARRAY_ENCODING_NAME
    }

    fn write_block(
        &self,
        output: &mut dyn Write,
        block: &dyn BlockValues,
    ) -> std::io::Result<usize> {
        write_block(output, block)
    }

    fn read_block<'a>(
        &self,
        input: &'a [u8],
    ) -> Result<(&'a [u8], SliceArrayBlock<'a>), ReadBlockError> {
        read_block(input, self.options)
    }
}

/// Write `block` to `output`, returning the number of bytes written.
///
/// Errors from `output` are returned unchanged. A block whose payload is too large for the
/// 32 bit offsets a reader will compute, or whose value bytes disagree with their declared
/// lengths, fails with [`std::io::ErrorKind::InvalidInput`] before anything is written.
pub fn write_block<W, B>(output: &mut W, block: &B) -> std::io::Result<usize>
where
    W: Write + ?Sized,
    B: BlockValues + ?Sized,
{
    let positions = block.position_count();
    let count = i32::try_from(positions).map_err(|_| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("block has too many positions: {}", positions),
        )
    })?;
    let payload = lengths::payload_len(block)?;

    output.write_all(&count.to_le_bytes())?;
    let mut written = 4;

    written += lengths::write_lengths(&mut *output, block)?;
    let nulls = (0..positions).map(|p| block.is_null(p));
    written += null_bitmap::encode_nulls(&mut *output, nulls)?;

    for position in 0..positions {
        if !block.is_null(position) {
            output.write_all(block.value_bytes(position))?;
        }
    }
    written += payload;

    tracing::trace!(positions, payload, written, "wrote block");
    Ok(written)
}

/// Write `block` to a new buffer
pub fn encode_block<B: BlockValues + ?Sized>(block: &B) -> std::io::Result<Vec<u8>> {
    let mut out = Vec::new();
    write_block(&mut out, block)?;
    Ok(out)
}

/// Read one block from the start of `input`, returning the unread remainder of `input` and the
/// block.
///
/// The returned block borrows its values from `input`. If `input` ends before the block is
/// complete this fails with [`ReadBlockError::Incomplete`] and no block is returned.
pub fn read_block(
    input: &[u8],
    options: DecodeOptions,
) -> Result<(&[u8], SliceArrayBlock<'_>), ReadBlockError> {
    parse_block(options, input).map_err(ReadBlockError::from)
}

/// Decode a buffer containing exactly one block
pub fn decode_block(
    input: &[u8],
    options: DecodeOptions,
) -> Result<SliceArrayBlock<'_>, ReadBlockError> {
    let (rest, block) = read_block(input, options)?;
    if !rest.is_empty() {
        tracing::debug!(leftover = rest.len(), "data left over after block");
        return Err(ReadBlockError::LeftoverData);
    }
    Ok(block)
}

pub(crate) fn parse_block(
    options: DecodeOptions,
    input: Input<'_>,
) -> ParseResult<'_, SliceArrayBlock<'_>, ReadBlockError> {
    let (i, count) = parse::i32_le::<ReadBlockError>(input)?;
    let positions = usize::try_from(count)
        .map_err(|_| ParseError::Error(ReadBlockError::InvalidPositionCount(count)))?;
    let (i, offsets) = lengths::parse_offsets(positions, i)?;
    let (i, nulls) = null_bitmap::parse_nulls(positions, options.validation(), i)?;

    let mut values = Vec::with_capacity(positions);
    let mut input = i;
    for (position, is_null) in nulls.iter().enumerate() {
        let length = offsets.len(position);
        if *is_null {
            if length != 0 && options.validation().is_strict() {
                tracing::debug!(position, length, "null position declares a length");
                return Err(ParseError::Error(ReadBlockError::MalformedLength {
                    position,
                    // lengths were parsed from i32s
                    length: length as i32,
                }));
            }
            values.push(None);
        } else {
            let (i, bytes) = parse::take_n::<ReadBlockError>(length, input)?;
            input = i;
            values.push(Some(Cow::Borrowed(bytes)));
        }
    }

    tracing::trace!(positions, payload = offsets.total(), "read block");
    Ok((input, SliceArrayBlock::from_parts(&nulls, values)))
}

use std::io::Write;

use crate::{
    options::LengthValidation,
    parse::{self, Input, ParseError, ParseResult},
    ReadBlockError,
};

const FIRST_BIT: u8 = 0b1000_0000;

/// The number of bytes a null bitmap over `positions` positions occupies
pub(crate) fn bitmap_len(positions: usize) -> usize {
    positions.div_ceil(8)
}

/// Packs null flags eight to a byte.
///
/// The first position of each group of eight is the most significant bit of the byte. A final
/// partial group is left aligned and the unused low bits are zero.
pub(crate) struct NullBitmapEncoder<W> {
    written: usize,
    output: W,
    current: u8,
    filled: u32,
}

impl<W: Write> NullBitmapEncoder<W> {
    pub(crate) fn new(output: W) -> Self {
        NullBitmapEncoder {
            written: 0,
            output,
            current: 0,
            filled: 0,
        }
    }

    pub(crate) fn append(&mut self, is_null: bool) -> std::io::Result<()> {
        if is_null {
            self.current |= FIRST_BIT >> self.filled;
        }
        self.filled += 1;
        if self.filled == 8 {
            self.flush_byte()?;
        }
        Ok(())
    }

    fn flush_byte(&mut self) -> std::io::Result<()> {
        self.output.write_all(&[self.current])?;
        self.written += 1;
        self.current = 0;
        self.filled = 0;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> std::io::Result<(W, usize)> {
        if self.filled > 0 {
            self.flush_byte()?;
        }
        Ok((self.output, self.written))
    }
}

/// Write the null bitmap for `nulls`, returning the number of bytes written
pub(crate) fn encode_nulls<W, I>(output: W, nulls: I) -> std::io::Result<usize>
where
    W: Write,
    I: IntoIterator<Item = bool>,
{
    let mut encoder = NullBitmapEncoder::new(output);
    for is_null in nulls {
        encoder.append(is_null)?;
    }
    let (_, written) = encoder.finish()?;
    Ok(written)
}

/// Parse a null bitmap covering `positions` positions, consuming exactly
/// [`bitmap_len(positions)`](bitmap_len) bytes
pub(crate) fn parse_nulls(
    positions: usize,
    validation: LengthValidation,
    input: Input<'_>,
) -> ParseResult<'_, Vec<bool>, ReadBlockError> {
    let (i, bytes) = parse::take_n::<ReadBlockError>(bitmap_len(positions), input)?;
    let tail = positions % 8;
    if tail != 0 && validation.is_strict() {
        let padding = bytes[bytes.len() - 1] & (0xff >> tail);
        if padding != 0 {
            tracing::debug!(padding, "rejecting null bitmap with padding bits set");
            return Err(ParseError::Error(ReadBlockError::MalformedNullBitmap));
        }
    }
    let nulls = (0..positions)
        .map(|position| bytes[position / 8] & (FIRST_BIT >> (position % 8)) != 0)
        .collect();
    Ok((i, nulls))
}

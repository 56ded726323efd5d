use std::io::Write;

use crate::{BlockValues, ReadBlockError, SliceArrayBlock};

pub(crate) mod lengths;
pub(crate) mod null_bitmap;
mod slice_array;
pub use slice_array::{
    decode_block, encode_block, read_block, write_block, SliceArrayBlockEncoding,
    SLICE_ARRAY_ENCODING_NAME,
};

/// A wire encoding for blocks.
///
/// Encodings carry no state between calls, a single instance may be shared between threads and
/// used for any number of independent reads and writes.
pub trait BlockEncoding: Send + Sync + std::fmt::Debug {
    /// The stable token identifying this encoding on the wire
    fn name(&self) -> &'static str;

    /// Write `block` to `output`, returning the number of bytes written
    fn write_block(&self, output: &mut dyn Write, block: &dyn BlockValues)
        -> std::io::Result<usize>;

    /// Read a block from the start of `input`, returning the remaining input and the block
    fn read_block<'a>(
        &self,
        input: &'a [u8],
    ) -> Result<(&'a [u8], SliceArrayBlock<'a>), ReadBlockError>;
}

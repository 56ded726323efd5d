//! # slice-block
//!
//! A wire codec for columnar blocks of nullable, variable length byte values (strings, binary
//! blobs) moved between processes by a columnar query engine.
//!
//! A block is an ordered sequence of positions, each either null or holding a byte value. Any
//! type implementing [`BlockValues`] can be written, decoding always produces a
//! [`SliceArrayBlock`] whose values borrow from the input buffer.
//!
//! ```
//! use slice_block::{decode_block, encode_block, BlockValues, DecodeOptions, SliceArrayBlock};
//!
//! let block = SliceArrayBlock::from(vec![Some("ab"), None, Some("c")]);
//! let bytes = encode_block(&block).unwrap();
//! let decoded = decode_block(&bytes, DecodeOptions::default()).unwrap();
//! assert_eq!(decoded.get(0), Some(&b"ab"[..]));
//! assert!(decoded.is_null(1));
//! ```
//!
//! ## Wire format
//!
//! See [`SliceArrayBlockEncoding`] for the layout. Blocks are usually framed with the name of
//! the encoding which wrote them, [`EncodingRegistry`] handles writing that name and resolving it
//! on the way back in.
//!
//! ## Errors
//!
//! Decoding never returns a partially populated block. Input which ends early fails with
//! [`ReadBlockError::Incomplete`]; lengths which cannot describe a real payload are rejected
//! with [`ReadBlockError::MalformedLength`] or [`ReadBlockError::OffsetOverflow`]. How strictly
//! the remaining layout is checked is controlled by [`DecodeOptions`].
//!
//! Encoding only fails when the underlying writer does, or when a block is too large to be
//! addressed with 32 bit offsets.
//!
//! ## Logging
//!
//! This crate emits [`tracing`] events and spans but never installs a subscriber.

mod block;
mod encoding;
mod error;
mod options;
mod parse;
mod registry;

pub use block::{BlockValues, Positions, SliceArrayBlock};
pub use encoding::{
    decode_block, encode_block, read_block, write_block, BlockEncoding, SliceArrayBlockEncoding,
    SLICE_ARRAY_ENCODING_NAME,
};
pub use error::{ReadBlockError, RegistryError};
pub use options::{DecodeOptions, LengthValidation};
pub use registry::{EncodingFactory, EncodingRegistry};

//! Resolving block encodings by name.
//!
//! A block travels with the name of the encoding that wrote it so the reader can pick the
//! matching decoder. The registry maps those names to factories producing the encoding.
use std::{collections::BTreeMap, io::Write};

use tracing::instrument;

use crate::{
    encoding::{BlockEncoding, SliceArrayBlockEncoding, SLICE_ARRAY_ENCODING_NAME},
    parse::{self, Input, ParseError, ParseResult},
    BlockValues, ReadBlockError, RegistryError, SliceArrayBlock,
};

/// Creates an encoding. Encodings carry no configuration so factories take no arguments.
pub type EncodingFactory = fn() -> Box<dyn BlockEncoding>;

/// A name keyed set of block encodings.
///
/// [`EncodingRegistry::default`] knows about every encoding in this crate,
/// [`EncodingRegistry::new`] starts empty.
#[derive(Clone, Debug)]
pub struct EncodingRegistry {
    factories: BTreeMap<String, EncodingFactory>,
}

impl Default for EncodingRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .factories
            .insert(SLICE_ARRAY_ENCODING_NAME.to_string(), SliceArrayBlockEncoding::factory);
        registry
    }
}

impl EncodingRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Register `factory` under `name`. Fails if `name` is already taken.
    pub fn register<S: Into<String>>(
        &mut self,
        name: S,
        factory: EncodingFactory,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        if i32::try_from(name.len()).is_err() {
            return Err(RegistryError::NameTooLong(name));
        }
        if self.factories.contains_key(&name) {
            return Err(RegistryError::Duplicate(name));
        }
        tracing::debug!(%name, "registered block encoding");
        self.factories.insert(name, factory);
        Ok(())
    }

    /// Create the encoding registered under `name`
    pub fn resolve(&self, name: &str) -> Option<Box<dyn BlockEncoding>> {
        self.factories.get(name).map(|factory| factory())
    }

    /// The registered names, in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    /// Write the name of `encoding` followed by `block` encoded with it. The name is written as
    /// a 32 bit little endian byte length followed by its utf8 bytes.
    #[instrument(skip_all, fields(encoding = encoding.name()))]
    pub fn write_named_block(
        &self,
        output: &mut dyn Write,
        encoding: &dyn BlockEncoding,
        block: &dyn BlockValues,
    ) -> std::io::Result<usize> {
        let name = encoding.name().as_bytes();
        let len = i32::try_from(name.len()).map_err(|_| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "block encoding name too long",
            )
        })?;
        output.write_all(&len.to_le_bytes())?;
        output.write_all(name)?;
        let written = encoding.write_block(output, block)?;
        Ok(4 + name.len() + written)
    }

    /// Read an encoding name written by [`Self::write_named_block`], resolve it and decode the
    /// block which follows
    #[instrument(skip_all, err)]
    pub fn read_named_block<'a>(
        &self,
        input: &'a [u8],
    ) -> Result<(&'a [u8], SliceArrayBlock<'a>), ReadBlockError> {
        let (i, name) = parse_name(input).map_err(ReadBlockError::from)?;
        let encoding = self.resolve(name).ok_or_else(|| {
            tracing::warn!(name, "unknown block encoding");
            ReadBlockError::UnknownEncoding(name.to_string())
        })?;
        encoding.read_block(i)
    }
}

fn parse_name(input: Input<'_>) -> ParseResult<'_, &str, ReadBlockError> {
    let (i, len) = parse::i32_le::<ReadBlockError>(input)?;
    let len = usize::try_from(len).map_err(|_| ParseError::Error(ReadBlockError::InvalidName))?;
    let (i, bytes) = parse::take_n::<ReadBlockError>(len, i)?;
    let name =
        std::str::from_utf8(bytes).map_err(|_| ParseError::Error(ReadBlockError::InvalidName))?;
    Ok((i, name))
}

use std::borrow::Cow;

use crate::encoding::null_bitmap;

/// The capabilities the block encoder needs from an in-memory block.
///
/// A block is an ordered sequence of positions, each of which is either null or holds a byte
/// value. Any type implementing this trait can be written with
/// [`SliceArrayBlockEncoding`](crate::SliceArrayBlockEncoding).
pub trait BlockValues {
    fn position_count(&self) -> usize;

    fn is_null(&self, position: usize) -> bool;

    /// The length in bytes of the value at `position`. Only called for non-null positions.
    fn length(&self, position: usize) -> usize;

    /// The bytes of the value at `position`. Only called for non-null positions and must be
    /// exactly [`BlockValues::length`] bytes long.
    fn value_bytes(&self, position: usize) -> &[u8];

    fn is_empty(&self) -> bool {
        self.position_count() == 0
    }

    /// Iterate over the positions of this block, `None` for nulls
    fn iter(&self) -> Positions<'_, Self>
    where
        Self: Sized,
    {
        Positions {
            block: self,
            position: 0,
        }
    }
}

pub struct Positions<'a, B> {
    block: &'a B,
    position: usize,
}

impl<'a, B: BlockValues> Iterator for Positions<'a, B> {
    type Item = Option<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.block.position_count() {
            return None;
        }
        let position = self.position;
        self.position += 1;
        if self.block.is_null(position) {
            Some(None)
        } else {
            Some(Some(self.block.value_bytes(position)))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.block.position_count().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

impl<B: BlockValues> ExactSizeIterator for Positions<'_, B> {}

/// A block of nullable byte values.
///
/// Blocks produced by the decoder borrow their values from the input they were decoded from, use
/// [`SliceArrayBlock::into_owned`] to detach them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SliceArrayBlock<'a> {
    values: Vec<Option<Cow<'a, [u8]>>>,
}

impl<'a> SliceArrayBlock<'a> {
    pub fn new(values: Vec<Option<Cow<'a, [u8]>>>) -> Self {
        Self { values }
    }

    /// Assemble a block from decoded parts. `values` must be `None` exactly where `nulls` is
    /// `true`.
    pub(crate) fn from_parts(nulls: &[bool], values: Vec<Option<Cow<'a, [u8]>>>) -> Self {
        debug_assert_eq!(nulls.len(), values.len());
        debug_assert!(nulls
            .iter()
            .zip(values.iter())
            .all(|(null, value)| *null == value.is_none()));
        Self { values }
    }

    pub fn get(&self, position: usize) -> Option<&[u8]> {
        self.values.get(position).and_then(|v| v.as_deref())
    }

    pub fn values(&self) -> &[Option<Cow<'a, [u8]>>] {
        &self.values
    }

    /// The number of bytes this block occupies on the wire, excluding the position count
    pub fn size_in_bytes(&self) -> usize {
        let payload: usize = self.values.iter().flatten().map(|v| v.len()).sum();
        payload + self.values.len() * 4 + null_bitmap::bitmap_len(self.values.len())
    }

    pub fn into_owned(self) -> SliceArrayBlock<'static> {
        SliceArrayBlock {
            values: self
                .values
                .into_iter()
                .map(|v| v.map(|v| Cow::Owned(v.into_owned())))
                .collect(),
        }
    }
}

impl BlockValues for SliceArrayBlock<'_> {
    fn position_count(&self) -> usize {
        self.values.len()
    }

    fn is_null(&self, position: usize) -> bool {
        self.values[position].is_none()
    }

    fn length(&self, position: usize) -> usize {
        self.values[position].as_ref().map(|v| v.len()).unwrap_or(0)
    }

    fn value_bytes(&self, position: usize) -> &[u8] {
        self.values[position].as_deref().unwrap_or(&[])
    }
}

impl<'a> FromIterator<Option<&'a [u8]>> for SliceArrayBlock<'a> {
    fn from_iter<I: IntoIterator<Item = Option<&'a [u8]>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|v| v.map(Cow::Borrowed)).collect(),
        }
    }
}

impl FromIterator<Option<Vec<u8>>> for SliceArrayBlock<'static> {
    fn from_iter<I: IntoIterator<Item = Option<Vec<u8>>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|v| v.map(Cow::Owned)).collect(),
        }
    }
}

impl<'a> From<Vec<Option<&'a str>>> for SliceArrayBlock<'a> {
    fn from(values: Vec<Option<&'a str>>) -> Self {
        values.into_iter().map(|v| v.map(str::as_bytes)).collect()
    }
}

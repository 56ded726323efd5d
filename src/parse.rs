//! Slice based parser combinators used by the block decoder.
//!
//! Every parser takes an [`Input`] and returns the remaining input alongside the parsed value. A
//! parser which runs out of data returns [`ParseError::Incomplete`] carrying the number of bytes
//! it was short by, so truncation anywhere in a block surfaces the same way.
use core::num::NonZeroUsize;
use std::convert::TryInto;

pub(crate) type Input<'a> = &'a [u8];

pub(crate) type ParseResult<'a, O, E> = Result<(Input<'a>, O), ParseError<E>>;

pub(crate) trait Parser<'a, O, E> {
    fn parse(&mut self, input: Input<'a>) -> ParseResult<'a, O, E>;
}

impl<'a, O, F, E> Parser<'a, O, E> for F
where
    F: FnMut(Input<'a>) -> ParseResult<'a, O, E>,
{
    fn parse(&mut self, input: Input<'a>) -> ParseResult<'a, O, E> {
        (self)(input)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ParseError<E> {
    Error(E),
    Incomplete(Needed),
}

/// The number of bytes a parser was short by
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Needed(pub(crate) NonZeroUsize);

impl Needed {
    pub(crate) fn size(&self) -> usize {
        self.0.get()
    }
}

pub(crate) fn map<'a, O1, O2, F, G, Er>(
    mut parser: F,
    mut f: G,
) -> impl FnMut(Input<'a>) -> ParseResult<'a, O2, Er>
where
    F: Parser<'a, O1, Er>,
    G: FnMut(O1) -> O2,
{
    move |input: Input<'a>| {
        let (input, o1) = parser.parse(input)?;
        Ok((input, f(o1)))
    }
}

pub(crate) fn take4<E>(input: Input<'_>) -> ParseResult<'_, [u8; 4], E> {
    if let Some(need) = NonZeroUsize::new(4_usize.saturating_sub(input.len())) {
        Err(ParseError::Incomplete(Needed(need)))
    } else {
        let (result, remaining) = input.split_at(4);
        Ok((remaining, result.try_into().expect("we checked the length")))
    }
}

/// Parse a slice of length `n` from `input`. If there is not enough `input` this will fail with
/// `ParseError::Incomplete(Needed(<amount needed>))`.
pub(crate) fn take_n<'a, E>(n: usize, input: Input<'a>) -> ParseResult<'a, &'a [u8], E> {
    if let Some(need) = NonZeroUsize::new(n.saturating_sub(input.len())) {
        Err(ParseError::Incomplete(Needed(need)))
    } else {
        let (result, remaining) = input.split_at(n);
        Ok((remaining, result))
    }
}

/// A 32 bit little endian signed integer
pub(crate) fn i32_le<E>(input: Input<'_>) -> ParseResult<'_, i32, E> {
    map(take4::<E>, i32::from_le_bytes)(input)
}

pub(crate) fn apply_n<'a, F, O, Er>(
    n: usize,
    mut f: F,
) -> impl FnMut(Input<'a>) -> ParseResult<'a, Vec<O>, Er>
where
    F: Parser<'a, O, Er>,
{
    move |input: Input<'a>| {
        let mut i = input;
        // `n` comes off the wire, don't let it size the allocation up front
        let mut result = Vec::with_capacity(n.min(input.len()));
        for _ in 0..n {
            let (new_i, e) = f.parse(i)?;
            result.push(e);
            i = new_i;
        }
        Ok((i, result))
    }
}

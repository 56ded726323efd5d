/// How much of the declared layout the decoder checks before trusting it
///
/// Negative lengths, offsets which overflow and truncated input are rejected in either mode since
/// they would otherwise size reads past the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthValidation {
    /// Reject null positions which declare a non-zero length and set padding bits in the final
    /// null bitmap byte
    #[default]
    Strict,
    /// Accept anything the reference writer could be lenient about
    Trust,
}

impl LengthValidation {
    pub(crate) fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Options controlling how blocks are decoded
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    length_validation: LengthValidation,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn length_validation(self, length_validation: LengthValidation) -> Self {
        Self { length_validation }
    }

    pub fn validation(&self) -> LengthValidation {
        self.length_validation
    }
}

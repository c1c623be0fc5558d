// Ranges are rowan's own types, so tree and error spans compare directly.
pub use rowan::{TextRange, TextSize};

/// A syntax element which exists at a range in the input.
pub trait Spanned {
    /// The text range where this item exists in the input.
    fn span(&self) -> TextRange;
}

/// `offset` as a [`TextSize`], saturating for inputs past 4 GiB
pub(crate) fn text_size(offset: usize) -> TextSize {
    TextSize::try_from(offset).unwrap_or(TextSize::from(u32::MAX))
}

mod mask;
mod source;


pub use mask::{MaskedText, Region, mask};
pub(crate) use mask::{classify, unclosed_strings};
pub use source::{LineCol, LineIndex, SourceText, offset_to_line_col};

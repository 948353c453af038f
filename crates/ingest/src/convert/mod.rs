//! The Converter capability: document reference in, markdown text out.

mod builtin;
mod traits;

pub use builtin::BuiltinConverter;
pub use traits::{ConversionError, Converter, SourceRef};

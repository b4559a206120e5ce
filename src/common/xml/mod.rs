//! XML text helpers shared by the writer.

mod escape;

pub use escape::{escape_text, header_attributes};

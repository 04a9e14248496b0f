//! Message input: the interactive input field and one-shot input reading.

mod field;
mod reader;

pub use field::{InputField, LineBuffer};
pub use reader::InputReader;

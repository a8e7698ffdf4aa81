pub mod directory;
pub mod parser;
pub mod settings;

pub use parser::{parse_transcript, ParseError, ParseOptions, ParsedSession};

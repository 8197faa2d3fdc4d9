//! # Path Tokenizer
//!
//! Splits a path pattern such as `store.books[price<10].title` into an ordered
//! sequence of segments. The tokenizer never looks at data.
pub mod lexer;
pub mod token;

// Re-exports
pub use lexer::tokenize;
pub use token::Segment;

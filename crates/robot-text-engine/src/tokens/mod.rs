//! Tokens, their types and source positions.

mod token;
mod token_type;

pub use token::{FilePosition, RobotToken, TokenId};
pub use token_type::TokenType;

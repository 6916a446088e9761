pub mod dialect;
pub mod fields;
pub mod message;
pub mod patterns;
pub mod terse;

pub use dialect::Dialect;
pub use message::{SaleParser, ValidationError};
pub use patterns::ParserPatterns;

pub mod input;
pub mod lifecycle;
pub mod parse;

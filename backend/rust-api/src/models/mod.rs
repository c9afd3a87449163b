pub mod exercise;
pub mod hint;

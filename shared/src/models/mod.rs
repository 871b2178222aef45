pub mod character;
pub mod greeting;

pub use character::*;
pub use greeting::*;

pub mod characters;
pub mod greetings;
pub mod validate;

pub use characters::*;
pub use greetings::*;
pub use validate::*;

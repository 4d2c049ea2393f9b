// Entity Models
//
// Each catalog record is one character returned by the remote API.
// Identity for favorites purposes is the character name.

pub mod category;
pub mod character;

pub use category::Category;
pub use character::{Entity, UNKNOWN};

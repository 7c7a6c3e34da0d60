//! Deck lists and duel settings read from disk.

pub mod load;
pub mod schema;

pub use load::*;
pub use schema::*;

//! Duel state machine. Keep this crate free of IO and platform concerns.

pub mod action;
pub mod config;
pub mod deck;
pub mod engine;
pub mod events;
pub mod rng;
pub mod state;

pub use action::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use events::*;
pub use rng::*;
pub use state::*;

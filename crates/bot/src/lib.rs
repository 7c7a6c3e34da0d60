//! Chat-bot front end for duels: interaction endpoint, rendering, duel
//! registry and direct messages.

mod config;
mod error;
mod interactions;
mod messaging;
mod registry;
pub mod render;
mod server;

pub use config::*;
pub use error::*;
pub use interactions::*;
pub use messaging::*;
pub use registry::*;
pub use server::*;

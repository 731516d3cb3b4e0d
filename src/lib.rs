pub mod client;
pub mod config;
pub mod identity;
pub mod models;
pub mod renderer;
pub mod session;
pub mod ui;

pub use client::ChatClient;
pub use config::Config;
pub use identity::{Identity, IdentityStore};
pub use session::{ChatSession, Outcome, Transcript};

pub mod commands;
pub mod config;
pub mod core;
pub mod export;
pub mod session;
pub mod terminal;
pub mod utils;

pub use crate::core::{build_script, extract, generate, ClientPathRegistry};
pub use crate::session::{reduce, Session, SessionEvent, SessionState};

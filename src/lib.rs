pub mod backends;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod executor;
pub mod instance;
pub mod logger;
pub mod node;
pub mod output;

pub use error::{Result, TntError};

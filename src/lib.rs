// Public module exports for the binary crate
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod logging;
pub mod toc;

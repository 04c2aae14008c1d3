//! Transport front ends. Each channel validates inbound text with
//! [`crate::agent::validate_inbound`] before handing it to the dispatcher.

pub mod cli;

pub use cli::CliChannel;

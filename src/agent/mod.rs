//! Turn orchestration: command parsing and the dispatcher that routes each
//! inbound message to a tool or to the model.

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{
    validate_inbound, DispatchResult, Dispatcher, InboundError, DEFAULT_SYSTEM_PROMPT,
    MODEL_ERROR_REPLY,
};
pub use parser::parse_command;

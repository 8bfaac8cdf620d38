//! Domain types for decoded frames

mod command;
mod event;

pub use command::{Command, CommandCodes};
pub use event::NormalizedEvent;

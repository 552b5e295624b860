//! Base types & traits: protocol-neutral contracts for tool calls.

pub mod content;
pub mod error;
pub mod tool;

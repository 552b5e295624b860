//! Maestro domain operations expressed purely as tool calls.

pub mod devices;
pub mod flow;

pub use devices::{Device, DeviceList};
pub use flow::FlowEnv;

pub mod mcp_transport;
pub mod process;

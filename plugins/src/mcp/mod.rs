//! Model Context Protocol engine over line-delimited JSON-RPC.

mod dispatch;
pub mod protocol;
pub mod server;
pub mod tools;
pub mod transport;

pub use server::{McpServer, SERVER_NAME};
pub use tools::{ToolKind, Toolset};

pub mod github;
pub mod mcp;
pub mod services;
pub mod translations;

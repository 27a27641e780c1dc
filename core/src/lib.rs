pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod outcome;
pub mod server;
pub mod tee;
pub mod util;

//! GitHub REST client.

pub mod client;
pub mod error;

pub use client::{api_base_url, GitHubClient, DEFAULT_API_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ErrorPayload, FieldError, GitHubHttpError};

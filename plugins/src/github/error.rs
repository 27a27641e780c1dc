use ghmcp_core::api::preview_text;
use serde::Deserialize;
use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Body of a GitHub REST error response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
    #[serde(default)]
    pub errors: Vec<FieldError>,
}

/// One entry of `errors[]` on a 422 validation failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorPayload {
    /// Reads GitHub's JSON error body. A body that is not such an object is kept as a
    /// truncated `message`.
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<ErrorPayload>(body) {
            Ok(payload) if !payload.message.is_empty() || !payload.errors.is_empty() => payload,
            _ => ErrorPayload {
                message: body_preview(body),
                ..Default::default()
            },
        }
    }

    /// `message` followed by each field error, e.g.
    /// `Validation Failed (Issue.title missing_field)`.
    pub fn summary(&self) -> String {
        let details: Vec<String> = self.errors.iter().map(FieldError::describe).collect();
        if details.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, details.join("; "))
        }
    }
}

impl FieldError {
    fn describe(&self) -> String {
        if let Some(message) = &self.message {
            return message.clone();
        }
        let subject = match (&self.resource, &self.field) {
            (Some(r), Some(f)) => format!("{r}.{f}"),
            (Some(s), None) | (None, Some(s)) => s.clone(),
            (None, None) => String::new(),
        };
        match &self.code {
            Some(code) if subject.is_empty() => code.clone(),
            Some(code) => format!("{subject} {code}"),
            None => subject,
        }
    }
}

#[derive(Debug, Error)]
pub enum GitHubHttpError {
    /// The request never produced a readable response.
    #[error("{method} {url}: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// GitHub answered with a non-2xx status.
    #[error("{method} {url}: {status} {}", .payload.summary())]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        payload: ErrorPayload,
    },

    /// A 2xx body that is not JSON.
    #[error("{method} {url}: invalid JSON in response body: {source} | body={preview}")]
    Decode {
        method: &'static str,
        url: String,
        preview: String,
        #[source]
        source: serde_json::Error,
    },
}

impl GitHubHttpError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            Self::Api { status, .. } => Some(*status),
            Self::Decode { .. } => None,
        }
    }

    pub(crate) fn api(method: &'static str, url: String, status: u16, body: &str) -> Self {
        Self::Api {
            method,
            url,
            status,
            payload: ErrorPayload::from_body(body),
        }
    }

    pub(crate) fn decode(
        method: &'static str,
        url: String,
        source: serde_json::Error,
        body: &str,
    ) -> Self {
        Self::Decode {
            method,
            url,
            preview: body_preview(body),
            source,
        }
    }
}

fn body_preview(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    preview_text(trimmed, Some(BODY_PREVIEW_LIMIT))
}

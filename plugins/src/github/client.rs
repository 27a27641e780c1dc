use async_trait::async_trait;
use ghmcp_core::api::{ApiClient, ApiRequest};
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use serde_json::Value;

use super::error::GitHubHttpError;

pub const DEFAULT_API_URL: &str = "https://api.github.com/";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

const MEDIA_TYPE: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Maps a configured host to the REST base URL.
///
/// An empty host or `github.com` means the public API. Anything else is treated as a
/// GitHub Enterprise Server install, whose REST API lives under `/api/v3/`. A scheme
/// given in the host is kept; otherwise https is assumed.
pub fn api_base_url(host: &str) -> anyhow::Result<Url> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Ok(Url::parse(DEFAULT_API_URL)?);
    }

    let with_scheme = if host.contains("://") {
        host.to_string()
    } else {
        format!("https://{host}")
    };
    let mut url = Url::parse(&with_scheme)
        .map_err(|e| anyhow::anyhow!("invalid GitHub host {host:?}: {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        anyhow::bail!("invalid GitHub host {host:?}: unsupported scheme {}", url.scheme());
    }
    match url.host_str() {
        None | Some("") => anyhow::bail!("invalid GitHub host {host:?}: missing host name"),
        Some("github.com") | Some("api.github.com") => return Ok(Url::parse(DEFAULT_API_URL)?),
        Some(_) => {}
    }

    url.set_path("/api/v3/");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[derive(Clone)]
pub struct GitHubClient {
    base_url: Url,
    token: String,
    http: reqwest::Client,
}

impl GitHubClient {
    pub fn new(host: &str, token: &str, version: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let base_url = api_base_url(host)?;
        Self::with_base_url(base_url, token, version, timeout_ms)
    }

    pub fn with_base_url(
        base_url: Url,
        token: &str,
        version: &str,
        timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .user_agent(format!("github-mcp-server/{version}"))
            .build()?;
        Ok(Self {
            base_url,
            token: token.to_string(),
            http,
        })
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.token.trim().is_empty() {
            req
        } else {
            req.bearer_auth(&self.token)
        }
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &!self.token.trim().is_empty())
            .finish()
    }
}

#[async_trait]
impl ApiClient for GitHubClient {
    async fn request(&self, req: ApiRequest) -> anyhow::Result<Value> {
        let url = self.base_url.join(req.path.trim_start_matches('/'))?;
        let verb = req.method.as_str();
        let method = Method::from_bytes(verb.as_bytes())?;

        let mut builder = self
            .http
            .request(method, url.clone())
            .header(ACCEPT, HeaderValue::from_static(MEDIA_TYPE))
            .header(API_VERSION_HEADER, API_VERSION);
        if !req.query.is_empty() {
            builder = builder.query(&req.query);
        }
        if let Some(body) = &req.body {
            builder = builder.json(body);
        }

        let resp = self
            .auth(builder)
            .send()
            .await
            .map_err(|source| GitHubHttpError::Transport {
                method: verb,
                url: url.to_string(),
                source,
            })?;
        tracing::debug!(
            target: "ghmcp::github",
            method = verb,
            url = %url,
            status = %resp.status(),
        );
        parse_json_response(verb, resp).await
    }
}

async fn parse_json_response(
    method: &'static str,
    resp: reqwest::Response,
) -> anyhow::Result<Value> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|source| GitHubHttpError::Transport {
            method,
            url: url.clone(),
            source,
        })?;

    if !status.is_success() {
        return Err(GitHubHttpError::api(method, url, status.as_u16(), &body).into());
    }
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body)
        .map_err(|err| GitHubHttpError::decode(method, url, err, &body).into())
}

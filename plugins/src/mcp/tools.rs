//! GitHub tools exposed over MCP.

use ghmcp_core::api::{ApiRequest, Translator};
use serde_json::{json, Map, Value};

const DEFAULT_PER_PAGE: u64 = 30;
const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    GetMe,
    GetIssue,
    SearchRepositories,
    CreateIssue,
    AddIssueComment,
}

impl ToolKind {
    pub const ALL: [ToolKind; 5] = [
        ToolKind::GetMe,
        ToolKind::GetIssue,
        ToolKind::SearchRepositories,
        ToolKind::CreateIssue,
        ToolKind::AddIssueComment,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::GetMe => "get_me",
            Self::GetIssue => "get_issue",
            Self::SearchRepositories => "search_repositories",
            Self::CreateIssue => "create_issue",
            Self::AddIssueComment => "add_issue_comment",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn read_only(self) -> bool {
        matches!(self, Self::GetMe | Self::GetIssue | Self::SearchRepositories)
    }

    pub fn description_key(self) -> String {
        format!("TOOL_{}_DESCRIPTION", self.name().to_uppercase())
    }

    pub fn title_key(self) -> String {
        format!("TOOL_{}_USER_TITLE", self.name().to_uppercase())
    }

    fn default_description(self) -> &'static str {
        match self {
            Self::GetMe => "Get details of the authenticated GitHub user. Use this when a request includes \"me\", \"my\". The output will not change unless the user changes their profile, so only call this once.",
            Self::GetIssue => "Get details of a specific issue in a GitHub repository.",
            Self::SearchRepositories => "Search for GitHub repositories",
            Self::CreateIssue => "Create a new issue in a GitHub repository.",
            Self::AddIssueComment => "Add a comment to a specific issue in a GitHub repository.",
        }
    }

    fn default_title(self) -> &'static str {
        match self {
            Self::GetMe => "Get my user profile",
            Self::GetIssue => "Get issue details",
            Self::SearchRepositories => "Search repositories",
            Self::CreateIssue => "Open new issue",
            Self::AddIssueComment => "Add comment to issue",
        }
    }

    /// Prefix for upstream failures reported back as tool errors.
    pub fn failure_context(self) -> &'static str {
        match self {
            Self::GetMe => "failed to get user",
            Self::GetIssue => "failed to get issue",
            Self::SearchRepositories => "failed to search repositories",
            Self::CreateIssue => "failed to create issue",
            Self::AddIssueComment => "failed to create comment",
        }
    }

    pub fn input_schema(self) -> Value {
        let owner = json!({"type": "string", "description": "Repository owner"});
        let repo = json!({"type": "string", "description": "Repository name"});
        match self {
            Self::GetMe => json!({"type": "object", "properties": {}}),
            Self::GetIssue => json!({
                "type": "object",
                "properties": {
                    "owner": owner,
                    "repo": repo,
                    "issue_number": {"type": "number", "description": "The number of the issue"},
                },
                "required": ["owner", "repo", "issue_number"],
            }),
            Self::SearchRepositories => json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"},
                    "page": {"type": "number", "description": "Page number for pagination (min 1)", "minimum": 1},
                    "perPage": {"type": "number", "description": "Results per page for pagination (min 1, max 100)", "minimum": 1, "maximum": MAX_PER_PAGE},
                },
                "required": ["query"],
            }),
            Self::CreateIssue => json!({
                "type": "object",
                "properties": {
                    "owner": owner,
                    "repo": repo,
                    "title": {"type": "string", "description": "Issue title"},
                    "body": {"type": "string", "description": "Issue body content"},
                    "assignees": {"type": "array", "items": {"type": "string"}, "description": "Usernames to assign to this issue"},
                    "labels": {"type": "array", "items": {"type": "string"}, "description": "Labels to apply to this issue"},
                },
                "required": ["owner", "repo", "title"],
            }),
            Self::AddIssueComment => json!({
                "type": "object",
                "properties": {
                    "owner": owner,
                    "repo": repo,
                    "issue_number": {"type": "number", "description": "Issue number to comment on"},
                    "body": {"type": "string", "description": "Comment content"},
                },
                "required": ["owner", "repo", "issue_number", "body"],
            }),
        }
    }

    /// Validates `args` and turns them into the REST call for this tool.
    pub fn build_request(self, args: &Map<String, Value>) -> Result<ApiRequest, String> {
        match self {
            Self::GetMe => Ok(ApiRequest::get("user")),
            Self::GetIssue => {
                let owner = path_segment(args, "owner")?;
                let repo = path_segment(args, "repo")?;
                let number = required_u64(args, "issue_number")?;
                Ok(ApiRequest::get(format!("repos/{owner}/{repo}/issues/{number}")))
            }
            Self::SearchRepositories => {
                let query = required_str(args, "query")?;
                let page = optional_u64(args, "page")?.unwrap_or(1).max(1);
                let per_page = optional_u64(args, "perPage")?
                    .unwrap_or(DEFAULT_PER_PAGE)
                    .clamp(1, MAX_PER_PAGE);
                Ok(ApiRequest::get("search/repositories")
                    .with_query("q", query)
                    .with_query("page", page)
                    .with_query("per_page", per_page))
            }
            Self::CreateIssue => {
                let owner = path_segment(args, "owner")?;
                let repo = path_segment(args, "repo")?;
                let mut body = Map::new();
                body.insert("title".into(), required_str(args, "title")?.into());
                if let Some(text) = optional_str(args, "body")? {
                    body.insert("body".into(), text.into());
                }
                if let Some(list) = optional_str_list(args, "assignees")? {
                    body.insert("assignees".into(), list.into());
                }
                if let Some(list) = optional_str_list(args, "labels")? {
                    body.insert("labels".into(), list.into());
                }
                Ok(ApiRequest::post(
                    format!("repos/{owner}/{repo}/issues"),
                    Value::Object(body),
                ))
            }
            Self::AddIssueComment => {
                let owner = path_segment(args, "owner")?;
                let repo = path_segment(args, "repo")?;
                let number = required_u64(args, "issue_number")?;
                let text = required_str(args, "body")?;
                Ok(ApiRequest::post(
                    format!("repos/{owner}/{repo}/issues/{number}/comments"),
                    json!({"body": text}),
                ))
            }
        }
    }
}

fn required_str<'a>(args: &'a Map<String, Value>, name: &str) -> Result<&'a str, String> {
    match args.get(name) {
        None | Some(Value::Null) => Err(format!("missing required parameter: {name}")),
        Some(Value::String(s)) if s.is_empty() => {
            Err(format!("missing required parameter: {name}"))
        }
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(format!("parameter {name} is not of type string")),
    }
}

/// A required string that is placed in the REST path. Anything outside the RFC 3986
/// unreserved set is percent-encoded so the value stays a single segment; `.` and
/// `..` are refused because URL resolution would collapse them.
fn path_segment(args: &Map<String, Value>, name: &str) -> Result<String, String> {
    let raw = required_str(args, name)?;
    if raw == "." || raw == ".." {
        return Err(format!("parameter {name} is not a valid path segment"));
    }
    let mut out = String::with_capacity(raw.len());
    for b in raw.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~') {
            out.push(b as char);
        } else {
            out.push_str(&format!("%{b:02X}"));
        }
    }
    Ok(out)
}

fn optional_str<'a>(args: &'a Map<String, Value>, name: &str) -> Result<Option<&'a str>, String> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(format!("parameter {name} is not of type string")),
    }
}

/// Numbers arrive as JSON numbers, possibly with a zero fraction (`42.0`).
fn optional_u64(args: &Map<String, Value>, name: &str) -> Result<Option<u64>, String> {
    let Some(value) = args.get(name).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    if let Some(n) = value.as_u64() {
        return Ok(Some(n));
    }
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(format!("parameter {name} is not a non-negative integer")),
    }
}

fn required_u64(args: &Map<String, Value>, name: &str) -> Result<u64, String> {
    optional_u64(args, name)?.ok_or_else(|| format!("missing required parameter: {name}"))
}

fn optional_str_list(args: &Map<String, Value>, name: &str) -> Result<Option<Vec<String>>, String> {
    match args.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("parameter {name} must contain only strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(_) => Err(format!("parameter {name} is not an array")),
    }
}

/// A tool as advertised to the client, with its strings resolved once.
#[derive(Debug, Clone)]
pub struct ToolEntry {
    pub kind: ToolKind,
    pub title: String,
    pub description: String,
}

impl ToolEntry {
    pub fn to_json(&self) -> Value {
        json!({
            "name": self.kind.name(),
            "description": self.description,
            "inputSchema": self.kind.input_schema(),
            "annotations": {
                "title": self.title,
                "readOnlyHint": self.kind.read_only(),
            },
        })
    }
}

/// The tools this server run exposes.
#[derive(Debug, Clone)]
pub struct Toolset {
    read_only: bool,
    entries: Vec<ToolEntry>,
}

impl Toolset {
    pub fn new(read_only: bool, translator: &dyn Translator) -> Self {
        let entries = ToolKind::ALL
            .into_iter()
            .filter(|k| !read_only || k.read_only())
            .map(|kind| ToolEntry {
                kind,
                title: translator.translate(&kind.title_key(), kind.default_title()),
                description: translator
                    .translate(&kind.description_key(), kind.default_description()),
            })
            .collect();
        Self { read_only, entries }
    }

    pub fn read_only(&self) -> bool {
        self.read_only
    }

    pub fn get(&self, name: &str) -> Option<&ToolEntry> {
        self.entries.iter().find(|e| e.kind.name() == name)
    }

    pub fn entries(&self) -> &[ToolEntry] {
        &self.entries
    }
}

/// Successful tool result carrying `text`.
pub fn text_result(text: String) -> Value {
    json!({"content": [{"type": "text", "text": text}], "isError": false})
}

/// Tool-level failure; the JSON-RPC call itself still succeeds.
pub fn error_result(message: String) -> Value {
    json!({"content": [{"type": "text", "text": message}], "isError": true})
}

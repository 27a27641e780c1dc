//! Request routing: one handler per MCP method.

use serde_json::{json, Value};

use super::protocol::{
    error_codes, methods, CallToolParams, RequestId, Response, PROTOCOL_VERSION,
};
use super::server::{McpServer, SERVER_NAME};
use super::tools::{error_result, text_result, ToolKind};

impl McpServer {
    pub async fn dispatch(&self, id: RequestId, method: &str, params: Option<Value>) -> Response {
        match method {
            methods::INITIALIZE => Response::success(id, self.initialize_result()),
            methods::PING => Response::success(id, json!({})),
            methods::TOOLS_LIST => Response::success(id, self.tools_list_result()),
            methods::TOOLS_CALL => self.tools_call(id, params).await,
            other => Response::error(
                Some(id),
                error_codes::METHOD_NOT_FOUND,
                format!("method not found: {other}"),
            ),
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": self.version()},
        })
    }

    fn tools_list_result(&self) -> Value {
        let tools: Vec<Value> = self.tools().entries().iter().map(|t| t.to_json()).collect();
        json!({ "tools": tools })
    }

    async fn tools_call(&self, id: RequestId, params: Option<Value>) -> Response {
        let params = match params.map(serde_json::from_value::<CallToolParams>) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return Response::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    format!("invalid tools/call params: {e}"),
                )
            }
            None => {
                return Response::error(
                    Some(id),
                    error_codes::INVALID_PARAMS,
                    "tools/call requires params",
                )
            }
        };

        let Some(entry) = self.tools().get(&params.name) else {
            let message = match ToolKind::from_name(&params.name) {
                Some(_) if self.tools().read_only() => {
                    format!("tool {} is not available in read-only mode", params.name)
                }
                _ => format!("unknown tool: {}", params.name),
            };
            return Response::error(Some(id), error_codes::INVALID_PARAMS, message);
        };
        let kind = entry.kind;
        let args = params.arguments.unwrap_or_default();

        let request = match kind.build_request(&args) {
            Ok(req) => req,
            Err(msg) => return Response::success(id, error_result(msg)),
        };

        let client = match self.clients().client().await {
            Ok(c) => c,
            Err(e) => {
                return Response::success(
                    id,
                    error_result(format!("failed to get GitHub client: {e:#}")),
                )
            }
        };

        self.logger().in_scope(|| {
            tracing::debug!(
                target: "ghmcp::mcp",
                tool = kind.name(),
                method = request.method.as_str(),
                path = %request.path,
                "calling GitHub"
            )
        });
        let result = match client.request(request).await {
            Ok(value) => match serde_json::to_string(&value) {
                Ok(text) => text_result(text),
                Err(e) => {
                    return Response::error(
                        Some(id),
                        error_codes::INTERNAL_ERROR,
                        format!("failed to marshal result: {e}"),
                    )
                }
            },
            Err(e) => error_result(format!("{}: {e:#}", kind.failure_context())),
        };
        Response::success(id, result)
    }
}

use crate::methods::{self, MethodContext};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

static RID: AtomicU64 = AtomicU64::new(1);

fn next_rid() -> String {
    let n = RID.fetch_add(1, Ordering::Relaxed);
    format!("r-{n:06}")
}

#[derive(Debug, Serialize, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Option<Value>,
    id: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcResponse {
    fn ok(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    fn error(id: Option<Value>, code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(JsonRpcError {
                code,
                message,
                data,
            }),
            id,
        }
    }
}

pub struct Server;

/// One newline-delimited frame read off the transport.
#[derive(Debug, PartialEq, Eq)]
pub enum Frame {
    Line(String),
    /// Line longer than the limit; only its length is known.
    TooLong(usize),
    InvalidUtf8,
}

/// Reads the next frame, holding at most `max + 1` bytes of it in memory.
/// `None` at end of input.
pub async fn read_frame<R>(reader: &mut R, max: usize) -> std::io::Result<Option<Frame>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut len = 0usize;
    let mut saw_bytes = false;

    loop {
        let (used, found_newline) = {
            let chunk = reader.fill_buf().await?;
            if chunk.is_empty() {
                if !saw_bytes {
                    return Ok(None);
                }
                break;
            }
            saw_bytes = true;

            let (content, found) = match chunk.iter().position(|b| *b == b'\n') {
                Some(i) => (&chunk[..i], true),
                None => (chunk, false),
            };
            len += content.len();
            let room = (max + 1).saturating_sub(buf.len());
            buf.extend_from_slice(&content[..content.len().min(room)]);
            (content.len() + usize::from(found), found)
        };
        reader.consume(used);
        if found_newline {
            break;
        }
    }

    if buf.len() == len && buf.last() == Some(&b'\r') {
        buf.pop();
        len -= 1;
    }
    if len > max {
        return Ok(Some(Frame::TooLong(len)));
    }
    Ok(Some(match String::from_utf8(buf) {
        Ok(line) => Frame::Line(line),
        Err(_) => Frame::InvalidUtf8,
    }))
}

impl Server {
    pub async fn run(ctx: MethodContext) -> Result<()> {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        Self::serve(&ctx, stdin, stdout).await
    }

    /// Line-delimited JSON-RPC loop. A bad line or a failing request only
    /// produces an error response; the loop ends when input does.
    pub async fn serve<R, W>(ctx: &MethodContext, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        while let Some(frame) = read_frame(&mut reader, ctx.cfg.max_msg_bytes).await? {
            let resp = match frame {
                Frame::Line(line) => handle_line(ctx, &line).await,
                Frame::TooLong(len) => Some(limit_exceeded(&next_rid(), len, ctx.cfg.max_msg_bytes)),
                Frame::InvalidUtf8 => {
                    let rid = next_rid();
                    tracing::warn!(event = "invalid_utf8", rid = %rid);
                    Some(JsonRpcResponse::error(
                        None,
                        -32700,
                        "Parse error: line is not valid UTF-8".to_string(),
                        None,
                    ))
                }
            };
            if let Some(resp) = resp {
                let mut resp_json = serde_json::to_string(&resp)?;
                resp_json.push('\n');
                writer.write_all(resp_json.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        Ok(())
    }
}

fn limit_exceeded(rid: &str, len: usize, max: usize) -> JsonRpcResponse {
    tracing::warn!(
        target: "promptlens_server",
        event = "limit_exceeded",
        rid = %rid,
        bytes_in = len,
        max = max
    );
    JsonRpcResponse::error(
        None,
        -32600,
        format!("message bytes={} > max={}", len, max),
        Some(serde_json::json!({ "code": "E_LIMIT_EXCEEDED" })),
    )
}

/// Handles one input line. `None` for blank lines and notifications.
pub async fn handle_line(ctx: &MethodContext, line: &str) -> Option<JsonRpcResponse> {
    let rid = next_rid();

    if line.len() > ctx.cfg.max_msg_bytes {
        return Some(limit_exceeded(&rid, line.len(), ctx.cfg.max_msg_bytes));
    }

    if line.trim().is_empty() {
        return None;
    }

    let req: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!(event = "json_parse_error", rid = %rid, error = %e);
            return Some(JsonRpcResponse::error(
                None,
                -32700,
                format!("Parse error: {}", e),
                None,
            ));
        }
    };

    // notifications carry no id and get no response
    let is_notification = req.id.is_none();

    let start = std::time::Instant::now();
    tracing::info!(
        event = "request_start",
        rid = %rid,
        rpc_id = ?req.id,
        method = %req.method
    );

    let result = methods::handle_call(ctx, &req.method, req.params.as_ref()).await;
    let dur = start.elapsed().as_millis() as u64;

    let resp = match result {
        Ok(value) => {
            tracing::info!(
                event = "request_done",
                rid = %rid,
                method = %req.method,
                duration_ms = dur,
                outcome = "ok"
            );
            JsonRpcResponse::ok(req.id, value)
        }
        Err(e) => {
            tracing::info!(
                event = "request_done",
                rid = %rid,
                method = %req.method,
                duration_ms = dur,
                outcome = "error",
                code = e.rpc_code(),
                error = %e.message()
            );
            JsonRpcResponse::error(req.id, e.rpc_code(), e.message(), e.data())
        }
    };

    if is_notification {
        None
    } else {
        Some(resp)
    }
}

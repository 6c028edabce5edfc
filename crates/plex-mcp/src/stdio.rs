//! Line-delimited JSON-RPC over stdin/stdout
//!
//! stdout carries protocol messages only; logs must go to stderr.

use plex_core::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, info};

use crate::handler::McpHandler;
use crate::protocol::{JsonRpcError, JsonRpcResponse};

/// Serve MCP over the process's stdin/stdout until EOF
pub async fn run_stdio(handler: McpHandler) -> Result<()> {
    info!("Serving MCP over stdio");
    let stdin = BufReader::with_capacity(8192, tokio::io::stdin());
    let stdout = BufWriter::with_capacity(8192, tokio::io::stdout());
    serve_lines(&handler, stdin, stdout).await
}

/// Read one message per line from `reader`, write one response per line to `writer`
pub async fn serve_lines<R, W>(handler: &McpHandler, mut reader: R, mut writer: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handler.handle_text(line.trim_end_matches(['\n', '\r'])).await,
            Err(e) => {
                debug!("Rejecting line that is not UTF-8: {}", e);
                Some(JsonRpcResponse::failure(None, JsonRpcError::parse_error(e)))
            }
        };
        let Some(response) = response else {
            continue;
        };

        let json = serde_json::to_string(&response)?;
        debug!("Sending response ({} bytes)", json.len());
        writer.write_all(json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }

    info!("stdin closed, stopping");
    Ok(())
}

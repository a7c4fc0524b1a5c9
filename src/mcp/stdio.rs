//! Newline-delimited JSON transport.

use std::io;

use mockable::Clock;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use super::McpServer;
use crate::board::ports::BoardRepository;

/// Serves requests from stdin until it closes, writing responses to stdout.
///
/// # Errors
///
/// Returns an I/O error when stdin or stdout fails.
pub async fn run_stdio<R, C>(server: &McpServer<R, C>) -> io::Result<()>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
{
    serve(
        server,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
}

/// Serves one request per input line, awaiting each to completion before
/// reading the next. Blank lines are skipped.
///
/// # Errors
///
/// Returns an I/O error when reading or writing fails.
pub async fn serve<R, C, I, O>(server: &McpServer<R, C>, input: I, mut output: O) -> io::Result<()>
where
    R: BoardRepository,
    C: Clock + Send + Sync,
    I: AsyncBufRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(response) = server.handle_line(&line).await else {
            continue;
        };
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        output.write_all(&encoded).await?;
        output.flush().await?;
    }
    tracing::info!("input closed, shutting down");
    Ok(())
}

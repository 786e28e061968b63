//! Frame Module
//!
//! Length-prefixed message framing for the raw socket protocol: each message
//! is a 4-byte big-endian length followed by that many bytes of UTF-8 text.
//! Both requests and responses use the same framing.

use std::io;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// == Frame Limits ==
/// Upper bound on a single frame's payload. Guards against hostile or
/// corrupted length prefixes; generous enough for a maximum-size entry plus
/// command overhead.
pub const MAX_FRAME_BYTES: usize = 4 * 1024 * 1024;

// == Read Frame ==
/// Reads one framed message.
///
/// Returns `Ok(None)` on a clean disconnect (EOF before any length byte).
/// EOF mid-frame, an oversized length prefix, or invalid UTF-8 are errors.
pub async fn read_frame<S>(stream: &mut S) -> io::Result<Option<String>>
where
    S: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    match stream.read_exact(&mut len_buf).await {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e),
    }

    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds limit", len),
        ));
    }

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload).await?;

    String::from_utf8(payload)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

// == Write Frame ==
/// Writes one framed message: 4-byte big-endian length, then the payload.
pub async fn write_frame<S>(stream: &mut S, payload: &str) -> io::Result<()>
where
    S: AsyncWrite + Unpin,
{
    let bytes = payload.as_bytes();
    stream.write_all(&(bytes.len() as u32).to_be_bytes()).await?;
    stream.write_all(bytes).await?;
    stream.flush().await
}

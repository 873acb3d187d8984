//! Length-prefixed frames over a byte stream.
//!
//! ```text
//! [0..2] : payload length (u16 BE)
//! [2..]  : payload (one encoded line)
//! ```
//!
//! Reads loop until the whole frame is assembled; a frame is only handed
//! out complete. Writes go out as a single buffer, so two frames written
//! through the same writer never interleave.

use bytes::{BufMut, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use chat_core::Message;

use crate::error::ProtocolError;
use crate::line_codec;
use crate::wire_types::{FRAME_HEADER_LEN, MAX_FRAME_LEN};

/// Write one frame carrying `payload`.
///
/// Oversized payloads are rejected before anything hits the wire. A failed
/// write is reported, never retried.
pub async fn write_frame<W>(writer: &mut W, payload: &[u8]) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    if payload.len() > MAX_FRAME_LEN {
        return Err(ProtocolError::FrameTooLarge(payload.len()));
    }

    let mut buf = BytesMut::with_capacity(FRAME_HEADER_LEN + payload.len());
    buf.put_u16(payload.len() as u16);
    buf.extend_from_slice(payload);

    writer.write_all(&buf).await?;
    writer.flush().await?;
    Ok(())
}

/// Read one complete frame.
///
/// - `Ok(Some(payload))`: a full frame arrived.
/// - `Ok(None)`: the peer closed the stream cleanly, between frames.
/// - `Err(_)`: transport fault, or the stream ended mid-frame.
pub async fn read_frame<R>(reader: &mut R) -> Result<Option<Vec<u8>>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; FRAME_HEADER_LEN];

    // A zero-byte read before any header byte is an orderly close.
    if reader.read(&mut len_buf[..1]).await? == 0 {
        return Ok(None);
    }
    reader.read_exact(&mut len_buf[1..]).await?;

    let frame_len = u16::from_be_bytes(len_buf) as usize;
    let mut payload = vec![0u8; frame_len];
    reader.read_exact(&mut payload).await?;

    Ok(Some(payload))
}

/// Encode `msg` and write it as one frame.
pub async fn send_message<W>(writer: &mut W, msg: &Message) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
{
    let mut payload = Vec::with_capacity(msg.body.len() + 16);
    line_codec::encode(msg, &mut payload)?;
    write_frame(writer, &payload).await
}

/// Read one frame and decode it.
///
/// `Ok(None)` means the peer closed the stream cleanly.
pub async fn recv_message<R>(reader: &mut R) -> Result<Option<Message>, ProtocolError>
where
    R: AsyncRead + Unpin,
{
    match read_frame(reader).await? {
        Some(payload) => line_codec::decode(&payload).map(Some),
        None => Ok(None),
    }
}

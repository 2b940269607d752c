//! Length-prefixed MessagePack framing for `ChaincodeMessage`s.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, ShimError};
use crate::rpc::model::ChaincodeMessage;

pub const MAX_FRAME_LEN: usize = 4 * 1024 * 1024;

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    Ok(rmp_serde::to_vec_named(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(rmp_serde::from_slice(bytes)?)
}

pub async fn write_message<W>(writer: &mut W, msg: &ChaincodeMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = encode(msg)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(ShimError::FrameTooLarge(body.len()));
    }
    writer.write_u32(body.len() as u32).await?;
    writer.write_all(&body).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads the next frame. `Ok(None)` means the peer closed the stream
/// between frames.
pub async fn read_message<R>(reader: &mut R) -> Result<Option<ChaincodeMessage>>
where
    R: AsyncRead + Unpin,
{
    let len = match reader.read_u32().await {
        Ok(len) => len as usize,
        Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    if len > MAX_FRAME_LEN {
        return Err(ShimError::FrameTooLarge(len));
    }
    let mut buf = vec![0; len];
    reader.read_exact(&mut buf).await?;
    Ok(Some(decode(&buf)?))
}

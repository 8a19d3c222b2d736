use bytes::{Buf, BytesMut};
use std::io::{self, Cursor};
use tokio_util::codec::{Decoder, Encoder};
use tracing::trace;

use crate::frame::{self, Frame};
use crate::Error;

/// Largest buffered frame accepted before the decoder gives up, matching the server's own
/// `proto-max-bulk-len` default.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 512 * 1024 * 1024;

/// Turns a byte stream into [`Frame`]s and back.
#[derive(Debug, Clone)]
pub struct FrameCodec {
    max_frame_size: usize,
}

impl FrameCodec {
    pub fn new(max_frame_size: usize) -> Self {
        Self { max_frame_size }
    }
}

impl Default for FrameCodec {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FRAME_SIZE)
    }
}

impl Decoder for FrameCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if src.is_empty() {
            return Ok(None);
        }

        // Partial replies only go through the cheap check, the frame is built once it is whole.
        let mut cursor = Cursor::new(&src[..]);
        match Frame::check(&mut cursor) {
            Ok(()) => {}
            Err(frame::Error::Incomplete) => {
                // A reply that keeps growing past the limit is never going to fit.
                if src.len() > self.max_frame_size {
                    return Err(frame::Error::TooLarge(self.max_frame_size).into());
                }
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        }

        cursor.set_position(0);
        let frame = Frame::parse(&mut cursor)?;

        let position = cursor.position() as usize;
        trace!(bytes = position, data_type = %frame.data_type(), "decoded frame");

        // Remove the parsed frame from the buffer.
        src.advance(position);

        Ok(Some(frame))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        match self.decode(src)? {
            Some(frame) => Ok(Some(frame)),
            None if src.is_empty() => Ok(None),
            None => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("connection closed with {} bytes of a partial frame", src.len()),
            )
            .into()),
        }
    }
}

impl Encoder<Frame> for FrameCodec {
    type Error = Error;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<(), Self::Error> {
        frame.write_to(dst);
        Ok(())
    }
}

use crate::commands::{into_string, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns all field names in the hash stored at key.
///
/// Ref: <https://redis.io/docs/latest/commands/hkeys/>
#[derive(Debug, PartialEq)]
pub struct HKeys {
    pub key: String,
}

impl Command for HKeys {
    type Output = Vec<String>;

    fn name(&self) -> &'static str {
        "HKEYS"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("HKEYS").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        match frame {
            Frame::Array(frames) | Frame::Set(frames) => {
                frames.into_iter().map(into_string).collect()
            }
            frame => unexpected("array", frame),
        }
    }
}

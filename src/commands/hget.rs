use bytes::Bytes;

use crate::commands::{into_optional_bytes, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns the value associated with field in the hash stored at key.
///
/// Ref: <https://redis.io/docs/latest/commands/hget/>
#[derive(Debug, PartialEq)]
pub struct HGet {
    pub key: String,
    pub field: String,
}

impl Command for HGet {
    type Output = Option<Bytes>;

    fn name(&self) -> &'static str {
        "HGET"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("HGET")
            .arg(&self.key)
            .arg(&self.field)
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_optional_bytes(frame)
    }
}

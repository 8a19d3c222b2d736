use bytes::Bytes;

use crate::commands::{into_bytes, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns the substring of the string value stored at key, determined by the offsets start and
/// end (both are inclusive). Negative offsets can be used in order to provide an offset starting
/// from the end of the string. So -1 means the last character, -2 the penultimate and so forth.
/// A missing key yields an empty string.
///
/// Ref: <https://redis.io/docs/latest/commands/getrange/>
#[derive(Debug, PartialEq)]
pub struct GetRange {
    pub key: String,
    pub start: i64,
    pub end: i64,
}

impl Command for GetRange {
    type Output = Bytes;

    fn name(&self) -> &'static str {
        "GETRANGE"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("GETRANGE")
            .arg(&self.key)
            .arg(self.start.to_string())
            .arg(self.end.to_string())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_bytes(frame)
    }
}

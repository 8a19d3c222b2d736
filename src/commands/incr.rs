use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Increments the number stored at key by one.
///
/// Ref: <https://redis.io/docs/latest/commands/incr/>
#[derive(Debug, PartialEq)]
pub struct Incr {
    pub key: String,
}

impl Command for Incr {
    type Output = i64;

    fn name(&self) -> &'static str {
        "INCR"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("INCR").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_integer(frame)
    }
}

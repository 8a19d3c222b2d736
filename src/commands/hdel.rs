use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Removes the specified fields from the hash stored at key. Returns the number of fields that
/// were removed.
///
/// Ref: <https://redis.io/docs/latest/commands/hdel/>
#[derive(Debug, PartialEq)]
pub struct HDel {
    pub key: String,
    pub fields: Vec<String>,
}

impl Command for HDel {
    type Output = i64;

    fn name(&self) -> &'static str {
        "HDEL"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("HDEL")
            .arg(&self.key)
            .args(&self.fields)
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_integer(frame)
    }
}

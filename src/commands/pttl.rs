use std::time::Duration;

use crate::commands::ttl::ttl_result;
use crate::commands::{Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::TtlResult;
use crate::Result;

/// Like TTL this command returns the remaining time to live of a key that has an expire set, with
/// the sole difference that TTL returns the amount of remaining time in seconds while PTTL returns
/// it in milliseconds.
///
/// Ref: <https://redis.io/docs/latest/commands/pttl/>
#[derive(Debug, PartialEq)]
pub struct Pttl {
    pub key: String,
}

impl Command for Pttl {
    type Output = TtlResult;

    fn name(&self) -> &'static str {
        "PTTL"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("PTTL").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        ttl_result(frame, Duration::from_millis)
    }
}

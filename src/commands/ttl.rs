use std::time::Duration;

use crate::commands::{into_integer, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::TtlResult;
use crate::Result;

/// TTL returns the remaining time to live of a key that has a timeout. This introspection
/// capability allows a Redis client to check how many seconds a given key will continue to be part
/// of the dataset.
///
/// Ref: <https://redis.io/docs/latest/commands/ttl>
#[derive(Debug, PartialEq)]
pub struct Ttl {
    pub key: String,
}

impl Command for Ttl {
    type Output = TtlResult;

    fn name(&self) -> &'static str {
        "TTL"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("TTL").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        ttl_result(frame, Duration::from_secs)
    }
}

/// `-2` means the key does not exist, `-1` that it exists without an expire.
pub(crate) fn ttl_result(frame: Frame, unit: fn(u64) -> Duration) -> Result<TtlResult> {
    match into_integer(frame)? {
        -2 => Ok(TtlResult::NotFound),
        -1 => Ok(TtlResult::Never),
        n if n >= 0 => Ok(TtlResult::Expires(unit(n as u64))),
        n => unexpected("TTL of -2, -1 or positive", Frame::Integer(n)),
    }
}

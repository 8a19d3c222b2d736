use std::time::{Duration, UNIX_EPOCH};

use crate::commands::{into_integer, unexpected, Command, RequestBuilder};
use crate::frame::Frame;
use crate::types::ExpireTimeResult;
use crate::Result;

/// Returns the absolute Unix timestamp (since January 1, 1970) in seconds at which the given key
/// will expire.
///
/// Ref: <https://redis.io/docs/latest/commands/expiretime/>
#[derive(Debug, PartialEq)]
pub struct ExpireTime {
    pub key: String,
}

/// Same as [`ExpireTime`] with millisecond resolution.
///
/// Ref: <https://redis.io/docs/latest/commands/pexpiretime/>
#[derive(Debug, PartialEq)]
pub struct PExpireTime {
    pub key: String,
}

impl Command for ExpireTime {
    type Output = ExpireTimeResult;

    fn name(&self) -> &'static str {
        "EXPIRETIME"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("EXPIRETIME").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        expire_time_result(frame, Duration::from_secs)
    }
}

impl Command for PExpireTime {
    type Output = ExpireTimeResult;

    fn name(&self) -> &'static str {
        "PEXPIRETIME"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("PEXPIRETIME").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        expire_time_result(frame, Duration::from_millis)
    }
}

fn expire_time_result(frame: Frame, unit: fn(u64) -> Duration) -> Result<ExpireTimeResult> {
    match into_integer(frame)? {
        -2 => Ok(ExpireTimeResult::NotFound),
        -1 => Ok(ExpireTimeResult::Never),
        n if n >= 0 => Ok(ExpireTimeResult::At(UNIX_EPOCH + unit(n as u64))),
        n => unexpected("timestamp, -2 or -1", Frame::Integer(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn expiretime() {
        let cmd = ExpireTime {
            key: String::from("key1"),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("EXPIRETIME")),
                Frame::Bulk(Bytes::from("key1")),
            ])
        );
        assert_eq!(
            cmd.from_frame(Frame::Integer(33177117420)).unwrap(),
            ExpireTimeResult::At(UNIX_EPOCH + Duration::from_secs(33177117420))
        );
    }

    #[test]
    fn pexpiretime_special_values() {
        let cmd = PExpireTime {
            key: String::from("key1"),
        };
        assert_eq!(
            cmd.from_frame(Frame::Integer(-1)).unwrap(),
            ExpireTimeResult::Never
        );

        let cmd = PExpireTime {
            key: String::from("key1"),
        };
        assert_eq!(
            cmd.from_frame(Frame::Integer(-2)).unwrap(),
            ExpireTimeResult::NotFound
        );
    }
}

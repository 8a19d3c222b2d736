use crate::commands::{into_bool, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Set a timeout on key, in seconds. Returns false when the key does not exist.
///
/// Ref: <https://redis.io/docs/latest/commands/expire/>
#[derive(Debug, PartialEq)]
pub struct Expire {
    pub key: String,
    pub seconds: u64,
}

/// Set a timeout on key, in milliseconds.
///
/// Ref: <https://redis.io/docs/latest/commands/pexpire/>
#[derive(Debug, PartialEq)]
pub struct PExpire {
    pub key: String,
    pub milliseconds: u64,
}

impl Command for Expire {
    type Output = bool;

    fn name(&self) -> &'static str {
        "EXPIRE"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("EXPIRE")
            .arg(&self.key)
            .arg(self.seconds.to_string())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_bool(frame)
    }
}

impl Command for PExpire {
    type Output = bool;

    fn name(&self) -> &'static str {
        "PEXPIRE"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("PEXPIRE")
            .arg(&self.key)
            .arg(self.milliseconds.to_string())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_bool(frame)
    }
}

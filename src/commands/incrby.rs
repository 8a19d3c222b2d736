use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Increments the number stored at key by increment. If the key does not exist, it is set to 0
/// before performing the operation.
///
/// Ref: <https://redis.io/docs/latest/commands/incrby/>
#[derive(Debug, PartialEq)]
pub struct IncrBy {
    pub key: String,
    pub increment: i64,
}

impl Command for IncrBy {
    type Output = i64;

    fn name(&self) -> &'static str {
        "INCRBY"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("INCRBY")
            .arg(&self.key)
            .arg(self.increment.to_string())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_integer(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn negative_increment() {
        let cmd = IncrBy {
            key: String::from("key1"),
            increment: -5,
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("INCRBY")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from("-5")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(5)).unwrap(), 5);
    }
}

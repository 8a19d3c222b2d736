use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Decrements the number stored at key by decrement.
///
/// Ref: <https://redis.io/docs/latest/commands/decrby/>
#[derive(Debug, PartialEq)]
pub struct DecrBy {
    pub key: String,
    pub decrement: i64,
}

impl Command for DecrBy {
    type Output = i64;

    fn name(&self) -> &'static str {
        "DECRBY"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("DECRBY")
            .arg(&self.key)
            .arg(self.decrement.to_string())
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
    fn decrby() {
        let cmd = DecrBy {
            key: String::from("key1"),
            decrement: 3,
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("DECRBY")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from("3")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(7)).unwrap(), 7);
    }
}

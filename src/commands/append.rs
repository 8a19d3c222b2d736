use bytes::Bytes;

use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// If `key` already exists and is a string, this command appends the `value` at the end of the
/// string. If `key` does not exist it is created and set as an empty string, so APPEND will be
/// similar to SET in this special case. Returns the length of the string after the append.
///
/// Ref: <https://redis.io/docs/latest/commands/append/>
#[derive(Debug, PartialEq)]
pub struct Append {
    pub key: String,
    pub value: Bytes,
}

impl Command for Append {
    type Output = i64;

    fn name(&self) -> &'static str {
        "APPEND"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("APPEND")
            .arg(&self.key)
            .arg_bytes(self.value.clone())
            .build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_integer(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append() {
        let cmd = Append {
            key: String::from("key1"),
            value: Bytes::from(" World"),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("APPEND")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from(" World")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(11)).unwrap(), 11);
    }
}

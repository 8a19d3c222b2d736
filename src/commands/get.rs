use bytes::Bytes;

use crate::commands::{into_optional_bytes, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Get the value of `key`. If the key does not exist the special value `nil` is returned.
///
/// Ref: <https://redis.io/docs/latest/commands/get/>
#[derive(Debug, PartialEq)]
pub struct Get {
    pub key: String,
}

impl Command for Get {
    type Output = Option<Bytes>;

    fn name(&self) -> &'static str {
        "GET"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("GET").arg(&self.key).build()
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_optional_bytes(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn existing_key() {
        let cmd = Get {
            key: String::from("key1"),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("GET")),
                Frame::Bulk(Bytes::from("key1")),
            ])
        );

        let result = cmd.from_frame(Frame::Bulk(Bytes::from("1"))).unwrap();

        assert_eq!(result, Some(Bytes::from("1")));
    }

    #[test]
    fn missing_key() {
        let cmd = Get {
            key: String::from("key1"),
        };

        let result = cmd.from_frame(Frame::Null).unwrap();

        assert_eq!(result, None);
    }

    #[test]
    fn wrong_reply_type() {
        let cmd = Get {
            key: String::from("key1"),
        };

        let result = cmd.from_frame(Frame::Integer(1));

        assert!(matches!(result, Err(Error::UnexpectedResponse { .. })));
    }
}

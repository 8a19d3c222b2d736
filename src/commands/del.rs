use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Removes the specified keys. A key is ignored if it does not exist. Returns the number of keys
/// that were removed.
///
/// Ref: <https://redis.io/docs/latest/commands/del/>
#[derive(Debug, PartialEq)]
pub struct Del {
    pub keys: Vec<String>,
}

impl Command for Del {
    type Output = i64;

    fn name(&self) -> &'static str {
        "DEL"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("DEL").args(&self.keys).build()
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
    fn multiple_keys() {
        let cmd = Del {
            keys: vec![String::from("key1"), String::from("key2")],
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("DEL")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from("key2")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(1)).unwrap(), 1);
    }
}

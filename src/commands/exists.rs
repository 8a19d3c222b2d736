use crate::commands::{into_integer, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns how many of the given keys exist. A key mentioned multiple times is counted multiple
/// times.
///
/// Ref: <https://redis.io/docs/latest/commands/exists/>
#[derive(Debug, PartialEq)]
pub struct Exists {
    pub keys: Vec<String>,
}

impl Command for Exists {
    type Output = i64;

    fn name(&self) -> &'static str {
        "EXISTS"
    }

    fn to_frame(&self) -> Frame {
        RequestBuilder::new("EXISTS").args(&self.keys).build()
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
    fn repeated_keys() {
        let cmd = Exists {
            keys: vec![String::from("key1"), String::from("key1")],
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("EXISTS")),
                Frame::Bulk(Bytes::from("key1")),
                Frame::Bulk(Bytes::from("key1")),
            ])
        );
        assert_eq!(cmd.from_frame(Frame::Integer(2)).unwrap(), 2);
    }
}

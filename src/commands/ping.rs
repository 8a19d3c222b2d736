use crate::commands::{into_string, Command, RequestBuilder};
use crate::frame::Frame;
use crate::Result;

/// Returns `PONG` if no argument is provided, otherwise return a copy of the argument as a bulk.
///
/// Ref: <https://redis.io/docs/latest/commands/ping/>
#[derive(Debug, PartialEq)]
pub struct Ping {
    pub message: Option<String>,
}

impl Command for Ping {
    type Output = String;

    fn name(&self) -> &'static str {
        "PING"
    }

    fn to_frame(&self) -> Frame {
        let request = RequestBuilder::new("PING");
        match &self.message {
            Some(message) => request.arg(message).build(),
            None => request.build(),
        }
    }

    fn from_frame(self, frame: Frame) -> Result<Self::Output> {
        into_string(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn without_message() {
        let cmd = Ping { message: None };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![Frame::Bulk(Bytes::from("PING"))])
        );
        assert_eq!(
            cmd.from_frame(Frame::Simple("PONG".to_string())).unwrap(),
            "PONG"
        );
    }

    #[test]
    fn with_message() {
        let cmd = Ping {
            message: Some("hello world".to_string()),
        };

        assert_eq!(
            cmd.to_frame(),
            Frame::Array(vec![
                Frame::Bulk(Bytes::from("PING")),
                Frame::Bulk(Bytes::from("hello world")),
            ])
        );
        assert_eq!(
            cmd.from_frame(Frame::Bulk(Bytes::from("hello world")))
                .unwrap(),
            "hello world"
        );
    }
}
